#![no_main]
use keymatch::matching::{StrategyDefinition, StrategyRegistry};
use libfuzzer_sys::fuzz_target;

/// Fuzz strategy definitions loaded from YAML.
///
/// Registration must either succeed or return an error, never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(definition) = serde_yaml::from_str::<StrategyDefinition>(s) {
            let mut registry = StrategyRegistry::with_builtins();
            let _ = registry.register_definitions(&[definition]);
        }
    }
});
