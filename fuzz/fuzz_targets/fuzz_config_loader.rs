#![no_main]
use libfuzzer_sys::fuzz_target;
use sorter_hardware::SimulatedBus;

fuzz_target!(|data: &str| {
    // Parse and validate errors are fine, panics are not.
    let Ok(cfg) = toml::from_str::<sorter_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    // A validated config must always assemble.
    if let Err(e) = sorter_core::Machine::from_config(&cfg, SimulatedBus::new()) {
        panic!("validated config failed to assemble: {e:?}");
    }
});
