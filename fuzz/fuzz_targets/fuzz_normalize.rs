#![no_main]

use libfuzzer_sys::fuzz_target;
use omicsjoin::identifier::{is_canonical, RuleSet};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(rules) = RuleSet::from_pairs("fuzz", &[("_T$", ""), ("_A$", ".N")]) else {
        return;
    };

    // A successful normalization is canonical and a fixed point
    if let Ok(id) = rules.normalize(raw) {
        assert!(is_canonical(&id));
        assert_eq!(rules.normalize(&id).ok(), Some(id));
    }
});
