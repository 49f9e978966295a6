use super::*;
use std::collections::HashMap;

fn tumor_normal_underscore() -> RuleSet {
    RuleSet::new("underscore")
        .with_replace("_T$", "")
        .unwrap()
        .with_replace("_A$", ".N")
        .unwrap()
}

#[test]
fn test_underscore_convention() {
    let rules = tumor_normal_underscore();
    let ids = rules.normalize_all(["P1_T", "P1_A", "P2_T"]).unwrap();
    assert_eq!(ids, vec!["P1", "P1.N", "P2"]);
}

#[test]
fn test_trailing_n_convention() {
    let rules = RuleSet::new("trailing-n")
        .with_replace("([^.])N$", "$1.N")
        .unwrap();
    assert_eq!(rules.normalize("05CO006N").unwrap(), "05CO006.N");
    assert_eq!(rules.normalize("05CO006").unwrap(), "05CO006");
    assert_eq!(rules.normalize("05CO006.N").unwrap(), "05CO006.N");
}

#[test]
fn test_mark_normal_is_idempotent() {
    let rules = RuleSet::new("normal-file").with_mark_normal();
    assert_eq!(rules.normalize("C3L-00001").unwrap(), "C3L-00001.N");
    assert_eq!(rules.normalize("C3L-00001.N").unwrap(), "C3L-00001.N");
}

#[test]
fn test_lookup_passes_unknown_labels() {
    let mut map = HashMap::new();
    map.insert("CPT0001".to_string(), "C3L-00001".to_string());
    let rules = RuleSet::new("aliquots").with_lookup(map);
    assert_eq!(rules.normalize("CPT0001").unwrap(), "C3L-00001");
    assert_eq!(rules.normalize("C3N-00002").unwrap(), "C3N-00002");
}

#[test]
fn test_prepend_runs_first() {
    let mut map = HashMap::new();
    map.insert("A1".to_string(), "P9-T".to_string());
    let mut rules = RuleSet::new("umich").with_replace("-T$", "").unwrap();
    rules.prepend(Rule::Lookup(map));
    assert_eq!(rules.len(), 2);
    assert_eq!(rules.normalize("A1").unwrap(), "P9");
}

#[test]
fn test_non_canonical_is_reported() {
    let rules = tumor_normal_underscore();
    let err = rules.normalize("P1_X").unwrap_err();
    match err {
        IdentifierError::NonCanonical {
            raw,
            normalized,
            rules,
        } => {
            assert_eq!(raw, "P1_X");
            assert_eq!(normalized, "P1_X");
            assert_eq!(rules, "underscore");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(rules.normalize("").is_err());
    assert!(rules.normalize(".N").is_err());
}

#[test]
fn test_invalid_pattern() {
    let err = RuleSet::new("bad").with_replace("(unclosed", "").unwrap_err();
    assert!(matches!(err, IdentifierError::InvalidPattern { .. }));
}

#[test]
fn test_from_pairs() {
    let rules = RuleSet::from_pairs("pairs", &[("-T$", ""), ("-N$", ".N")]).unwrap();
    assert_eq!(normalize("C3L-1-N", &rules).unwrap(), "C3L-1.N");
}

#[test]
fn test_sample_status() {
    assert_eq!(sample_status("P1"), SampleStatus::Tumor);
    assert_eq!(sample_status("P1.N"), SampleStatus::Normal);
    assert_eq!(patient_core("P1.N"), "P1");
    assert_eq!(SampleStatus::Normal.to_string(), "Normal");
    assert!(is_canonical("C3L-00001.N"));
    assert!(!is_canonical("C3L_00001"));
    assert!(!is_canonical("P1.N.N"));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Labels following the underscore convention normalize to the grammar, idempotently
        #[test]
        fn test_normalize_idempotent(core in "[A-Za-z0-9-]{1,12}", suffix in prop::sample::select(vec!["_T", "_A", ""])) {
            let rules = tumor_normal_underscore();
            let raw = format!("{}{}", core, suffix);
            let once = rules.normalize(&raw).unwrap();
            prop_assert!(is_canonical(&once));
            let twice = rules.normalize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Trailing-N relabeling is stable on already normalized labels
        #[test]
        fn test_trailing_n_idempotent(core in "[A-Za-z0-9]{1,12}", normal in any::<bool>()) {
            let rules = RuleSet::new("trailing-n").with_replace("([^.])N$", "$1.N").unwrap();
            let raw = if normal { format!("{}N", core) } else { core };
            let once = rules.normalize(&raw).unwrap();
            prop_assert_eq!(rules.normalize(&once).unwrap(), once);
        }
    }
}
