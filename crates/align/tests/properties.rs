// Property-based tests for normalization and alignment.
// CI: 128 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use assaymatch_align::engine::align;
use assaymatch_align::model::Table;
use assaymatch_align::normalize::normalize_text;
use assaymatch_align::scorer::{ScorerKind, WRatio};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Assay-like text: words from a small vocabulary plus the odd Unicode
/// variant the normalizer has to handle.
fn arb_description() -> impl Strategy<Value = Option<String>> {
    let word = prop_oneof![
        Just("binding"),
        Just("receptor"),
        Just("³H"),
        Just("3H"),
        Just("Naloxone"),
        Just("D2"),
        Just("5\u{2013}HT2A"),
        Just("assay"),
        Just("(human)"),
        Just("\u{00A0}"),
    ];
    prop_oneof![
        8 => prop::collection::vec(word, 0..6).prop_map(|w| Some(w.join(" "))),
        1 => Just(None),
    ]
}

fn arb_table() -> impl Strategy<Value = Table> {
    prop::collection::vec(arb_description(), 0..8).prop_map(|values| {
        let mut t = Table::new(vec!["key".to_string(), "row".to_string()]);
        for (i, v) in values.into_iter().enumerate() {
            t.push_row(vec![v, Some(i.to_string())]);
        }
        t
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn normalize_is_idempotent(s in "\\PC{0,40}") {
        let once = normalize_text(Some(&s));
        prop_assert_eq!(normalize_text(Some(&once)), once);
    }

    #[test]
    fn normalize_idempotent_on_descriptions(s in arb_description()) {
        let once = normalize_text(s.as_deref());
        prop_assert_eq!(normalize_text(Some(&once)), once);
    }

    #[test]
    fn one_decision_per_reference_row(
        reference in arb_table(),
        curated in arb_table(),
        threshold in 0u8..=100,
    ) {
        let out = align(&reference, &curated, "key", "key", threshold, &WRatio, None).unwrap();
        prop_assert_eq!(out.decisions.len(), reference.len());
        let accepted = out.decisions.iter().filter(|d| d.matched.is_some()).count();
        prop_assert_eq!(out.aligned.len(), accepted);
        for d in &out.decisions {
            prop_assert!(d.score <= 100);
            if d.matched.is_some() {
                prop_assert!(d.score >= threshold);
            }
        }
    }

    #[test]
    fn alignment_is_deterministic(
        reference in arb_table(),
        curated in arb_table(),
        kind in prop::sample::select(ScorerKind::ALL.to_vec()),
    ) {
        let a = align(&reference, &curated, "key", "key", 60, kind.scorer(), None).unwrap();
        let b = align(&reference, &curated, "key", "key", 60, kind.scorer(), None).unwrap();
        prop_assert_eq!(a.decisions, b.decisions);
        prop_assert_eq!(a.aligned, b.aligned);
    }

    #[test]
    fn raising_threshold_never_adds_matches(
        reference in arb_table(),
        curated in arb_table(),
        lo in 0u8..=100,
        hi in 0u8..=100,
    ) {
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        let low = align(&reference, &curated, "key", "key", lo, &WRatio, None).unwrap();
        let high = align(&reference, &curated, "key", "key", hi, &WRatio, None).unwrap();
        prop_assert!(high.aligned.len() <= low.aligned.len());
    }

    #[test]
    fn empty_curated_never_matches(reference in arb_table()) {
        let curated = Table::new(vec!["key".to_string()]);
        let out = align(&reference, &curated, "key", "key", 0, &WRatio, None).unwrap();
        prop_assert!(out.aligned.is_empty());
        for d in &out.decisions {
            prop_assert_eq!(d.score, 0);
            prop_assert!(d.matched.is_none());
        }
    }

    #[test]
    fn only_first_duplicate_is_reachable(reference in arb_table(), text in arb_description()) {
        let mut curated = Table::new(vec!["key".to_string(), "row".to_string()]);
        curated.push_row(vec![text.clone(), Some("first".to_string())]);
        curated.push_row(vec![text, Some("second".to_string())]);
        let out = align(&reference, &curated, "key", "key", 0, &WRatio, None).unwrap();
        for row in &out.aligned.rows {
            prop_assert_eq!(row.get(1), Some("first"));
        }
    }
}
