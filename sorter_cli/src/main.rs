mod cli;
mod commands;
mod error_fmt;

use clap::Parser;
use eyre::{Result, WrapErr};
use sorter_config::Config;
use sorter_core::Machine;
use sorter_traits::Transport;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{ConfigStage, exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "command failed");
        if cli::json_mode() {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Nearest { value, series } = cli.cmd {
        let _guard = init_tracing(cli.json, cli.log_level.as_deref(), None)?;
        return commands::run_nearest(value, series.into());
    }

    let cfg = load_config(&cli.config, cli.cups.as_deref())?;
    // Held until return so the file writer flushes.
    let _guard = init_tracing(cli.json, cli.log_level.as_deref(), Some(&cfg.logging))?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    #[cfg(all(feature = "hardware", target_os = "linux"))]
    {
        let bus = sorter_hardware::I2cBus::open(cfg.bus.i2c_bus)
            .wrap_err_with(|| format!("opening i2c-{}", cfg.bus.i2c_bus))?;
        execute(&cli.cmd, &cfg, bus, "i2c")
    }
    #[cfg(not(all(feature = "hardware", target_os = "linux")))]
    {
        let bus = sorter_hardware::SimulatedBus::new();
        // Test hook: reject the first bus write.
        if std::env::var_os("SORTER_TEST_FAIL_WRITE").is_some() {
            bus.fail_next_write();
        }
        execute(&cli.cmd, &cfg, bus, "sim")
    }
}

fn execute<T: Transport + Clone>(cmd: &Commands, cfg: &Config, bus: T, backend: &str) -> Result<()> {
    let mut machine =
        Machine::from_config(cfg, bus).wrap_err(ConfigStage("assembling machine from config"))?;
    match cmd {
        Commands::Sort { values } => commands::run_sort(&mut machine, values),
        Commands::Wheel { targets } => commands::run_wheel(&mut machine, targets),
        Commands::Feed { cycles, count } => commands::run_feed(&mut machine, *cycles, *count),
        Commands::SelfCheck => commands::self_check(&machine, backend),
        Commands::Nearest { value, series } => commands::run_nearest(*value, (*series).into()),
    }
}

fn load_config(path: &Path, cups_csv: Option<&Path>) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading config {}", path.display()))
        .wrap_err(ConfigStage("reading config"))?;
    let mut cfg = sorter_config::load_toml(&text).wrap_err(ConfigStage("parsing config"))?;
    if let Some(csv) = cups_csv {
        cfg.cups = sorter_config::load_cups_csv(csv).wrap_err(ConfigStage("loading cup CSV"))?;
        cfg.series = None;
    }
    cfg.validate().wrap_err(ConfigStage("validating config"))?;
    Ok(cfg)
}

fn init_tracing(
    json: bool,
    level: Option<&str>,
    logging: Option<&sorter_config::Logging>,
) -> Result<Option<WorkerGuard>> {
    let level = level
        .or_else(|| logging.and_then(|l| l.level.as_deref()))
        .unwrap_or("info");
    let make_filter = || {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .wrap_err_with(|| format!("invalid log level {level:?}"))
    };

    // Console logs go to stderr; stdout carries command output.
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let mut guard = None;
    let file = match logging.and_then(|l| l.file.as_deref()) {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file {file:?} has no file name"))?;
            let appender = match logging.and_then(|l| l.rotation.as_deref()) {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, worker) = tracing_appender::non_blocking(appender);
            guard = Some(worker);
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(make_filter()?)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console.with_filter(make_filter()?))
        .with(file)
        .try_init()
        .wrap_err("installing tracing subscriber")?;
    Ok(guard)
}
