//! Human-readable error descriptions, exit codes and structured JSON errors.

use std::fmt;

/// Context marking an error raised while loading or applying configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConfigStage(pub &'static str);

impl fmt::Display for ConfigStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use sorter_core::error::{BuildError, SorterError};

    let root = err.root_cause().to_string();

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingTransport => {
                "What happened: No bus was provided to the machine.\nLikely causes: The I2C bus failed to open or was not wired into the builder.\nHow to fix: Check `[bus] i2c_bus` and that /dev/i2c-N exists.".to_string()
            }
            BuildError::MissingCups => {
                "What happened: No cup table was provided to the machine.\nLikely causes: Neither [[cups]] nor [series] produced a table.\nHow to fix: Add [[cups]] entries or a [series] section to the config.".to_string()
            }
            BuildError::TooManyCups { cups, slots } => format!(
                "What happened: {cups} cups configured for a {slots}-slot wheel.\nLikely causes: `wheel.cups` is smaller than the cup list.\nHow to fix: Raise wheel.cups or remove cups."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SorterError>() {
        return match se {
            SorterError::InvalidArgument(msg) => format!(
                "What happened: Invalid argument ({msg}).\nLikely causes: A cup number outside the wheel or a feed count outside 1..=4.\nHow to fix: Run `sorter self-check` to see the wheel size, then retry."
            ),
            SorterError::Unencodable { steps, encoding } => format!(
                "What happened: A {steps}-position move does not fit the {encoding} encoding.\nLikely causes: wheel.cups is too large for the selected encoding.\nHow to fix: Reduce wheel.cups or set wheel.encoding = \"direction_bit\" if the firmware supports it."
            ),
            SorterError::Transport(msg) | SorterError::TransportFault(msg) => format!(
                "What happened: Bus write failed ({msg}).\nLikely causes: Controller not powered, wrong address, or loose I2C wiring.\nHow to fix: Check [bus] wheel_channel/feed_channel and the SDA/SCL wiring, then retry."
            ),
            SorterError::InvalidWireByte(_) => format!(
                "What happened: {se}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    if err.downcast_ref::<toml::de::Error>().is_some() {
        return format!(
            "What happened: Config file is not valid TOML for the sorter.\nLikely causes: Typo, wrong type or missing [wheel] section.\nHow to fix: Fix the TOML and try again. Parser said: {root}"
        );
    }

    let lower = root.to_ascii_lowercase();

    // Cup CSV header special-case
    if lower.contains("cup csv must have headers") {
        return "Invalid headers in cup CSV. Expected 'min,max'.".to_string();
    }

    if let Some(stage) = err.downcast_ref::<ConfigStage>() {
        return format!(
            "What happened: Configuration is invalid or incomplete ({stage}).\nLikely causes: {root}\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 invalid argument, 4 transport, 5 config, 1 otherwise.
/// Usage errors exit with 2 from clap itself.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use sorter_core::error::SorterError;

    if err.downcast_ref::<ConfigStage>().is_some() {
        return 5;
    }
    match err.downcast_ref::<SorterError>() {
        Some(SorterError::InvalidArgument(_) | SorterError::Unencodable { .. }) => 3,
        Some(SorterError::Transport(_) | SorterError::TransportFault(_)) => 4,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    use sorter_core::error::SorterError;

    if err.downcast_ref::<ConfigStage>().is_some() {
        return "Config";
    }
    match err.downcast_ref::<SorterError>() {
        Some(SorterError::InvalidArgument(_)) => "InvalidArgument",
        Some(SorterError::Unencodable { .. }) => "Unencodable",
        Some(SorterError::Transport(_)) => "Transport",
        Some(SorterError::TransportFault(_)) => "TransportFault",
        Some(SorterError::InvalidWireByte(_)) => "InvalidWireByte",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;
    use sorter_core::error::SorterError;

    #[test]
    fn config_stage_wins_over_inner_error() {
        let err: eyre::Report = Err::<(), _>(eyre::Report::new(SorterError::InvalidArgument(
            "cup min 5 exceeds max 1".into(),
        )))
        .wrap_err(ConfigStage("assembling machine"))
        .unwrap_err();
        assert_eq!(exit_code_for_error(&err), 5);
    }

    #[test]
    fn transport_codes() {
        let err = eyre::Report::new(SorterError::TransportFault("nack".into()));
        assert_eq!(exit_code_for_error(&err), 4);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "TransportFault");
        assert_eq!(v["exit_code"], 4);
        assert!(v["message"].as_str().unwrap().contains("Bus write failed"));
    }

    #[test]
    fn generic_errors_exit_one() {
        let err = eyre::eyre!("something else");
        assert_eq!(exit_code_for_error(&err), 1);
        assert!(humanize(&err).starts_with("Something went wrong."));
    }
}
