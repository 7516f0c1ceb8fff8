#![no_main]
use keymatch::matching::{SignatureComparator, StrategyVersion};
use libfuzzer_sys::fuzz_target;

/// Fuzz signature parsing and scoring.
///
/// Any signature that parses is compared against itself under every
/// built-in strategy; scores must stay within 0.0 - 1.0.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(signature) = keymatch::model::parse_signature_str(s) else {
        return;
    };
    let comparator = SignatureComparator::new();
    for version in StrategyVersion::all() {
        let result = comparator.compare(&signature, &signature, &version.strategy());
        assert!((0.0..=1.0).contains(&result.overall_similarity));
    }
});
