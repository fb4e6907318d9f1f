use std::path::PathBuf;

use assaymatch_align::engine::{align, run, AlignInput, AlignOptions};
use assaymatch_align::model::{MatchDecision, Table};
use assaymatch_align::scorer::{ScorerKind, WRatio};
use assaymatch_align::{AlignConfig, AlignError, Dataset};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(name: &str) -> Table {
    let path = fixtures_dir().join(name);
    let mut reader = csv::Reader::from_path(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record.unwrap();
        table.push_row(
            record
                .iter()
                .map(|f| (!f.is_empty()).then(|| f.to_string()))
                .collect(),
        );
    }
    table.normalize_headers();
    table
}

fn table(key: &str, values: &[Option<&str>]) -> Table {
    let mut t = Table::new(vec![key.to_string(), "n".to_string()]);
    for (i, v) in values.iter().enumerate() {
        t.push_row(vec![v.map(String::from), Some(i.to_string())]);
    }
    t
}

fn ids(aligned: &Table) -> Vec<&str> {
    aligned
        .rows
        .iter()
        .map(|r| r.get(0).unwrap_or(""))
        .collect()
}

// -------------------------------------------------------------------------
// Fixture run
// -------------------------------------------------------------------------

#[test]
fn fixture_alignment() {
    let curated = load_fixture("curated.csv");
    let reference = load_fixture("reference.csv");

    let out = align(
        &reference,
        &curated,
        "Assay Description",
        "chembl_assay_description",
        81,
        &WRatio,
        None,
    )
    .unwrap();

    assert_eq!(out.decisions.len(), reference.len());
    assert_eq!(out.candidate_pool, 5);
    assert_eq!(out.shadowed, 1);
    assert_eq!(
        ids(&out.aligned),
        vec!["CHEMBL400", "CHEMBL100", "CHEMBL300", "CHEMBL500", "CHEMBL100"]
    );
    assert_eq!(out.aligned.columns, curated.columns);

    let d = &out.decisions;
    assert_eq!(d[1].query, "3H-Naloxone binding assay");
    assert_eq!(d[1].matched.as_deref(), Some("3H Naloxone Binding Assay"));
    assert_eq!(d[1].score, 100);
    assert_eq!(d[2].matched, None);
    assert!(d[2].score < 81);
    assert_eq!(d[4].matched.as_deref(), Some("Cyclooxygenase-2 enzyme inhibition"));
    assert_eq!(
        d[5],
        MatchDecision {
            query: String::new(),
            matched: None,
            score: 0,
        }
    );
}

#[test]
fn duplicate_curated_text_is_shadowed() {
    let curated = load_fixture("curated.csv");
    let reference = load_fixture("reference.csv");
    let out = align(
        &reference,
        &curated,
        "Assay Description",
        "chembl_assay_description",
        0,
        &WRatio,
        None,
    )
    .unwrap();
    assert!(ids(&out.aligned).iter().all(|id| *id != "CHEMBL301"));
}

#[test]
fn run_summary_and_json() {
    let curated = load_fixture("curated.csv");
    let reference = load_fixture("reference.csv");
    let result = run(
        &AlignInput {
            reference: &reference,
            reference_key: "Assay Description",
            curated: &curated,
            curated_key: "chembl_assay_description",
        },
        &AlignOptions::default(),
        None,
    )
    .unwrap();

    assert_eq!(result.summary.reference_rows, 7);
    assert_eq!(result.summary.matched, 5);
    assert_eq!(result.summary.unmatched, 2);
    assert_eq!(result.summary.exact, 5);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["meta"]["scorer"], "wratio");
    assert_eq!(json["meta"]["threshold"], 81);
    assert_eq!(json["decisions"][5]["matched"], serde_json::Value::Null);
    assert_eq!(json["aligned"][0]["chembl_id"], "CHEMBL400");
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn tritium_notation_matches_exactly() {
    let curated = table("c", &[Some("³H Naloxone Binding Assay")]);
    let reference = table("r", &[Some("3H-Naloxone binding assay")]);
    let out = align(&reference, &curated, "r", "c", 100, &WRatio, None).unwrap();
    assert_eq!(out.decisions[0].score, 100);
    assert_eq!(out.decisions[0].matched.as_deref(), Some("3H Naloxone Binding Assay"));
    assert_eq!(out.aligned.len(), 1);
}

#[test]
fn unrelated_receptor_is_rejected() {
    let curated = table("c", &[Some("Dopamine D2 receptor binding")]);
    let reference = table("r", &[Some("Serotonin 5-HT2A receptor binding")]);
    let out = align(&reference, &curated, "r", "c", 81, &WRatio, None).unwrap();
    assert!(out.decisions[0].score < 81);
    assert_eq!(out.decisions[0].matched, None);
    assert!(out.aligned.is_empty());
}

#[test]
fn greek_receptor_subtypes_resolve_to_their_own_row() {
    let pairs = [
        ("κ opioid receptor binding", "μ opioid receptor binding"),
        ("Adrenergic α1 receptor", "Adrenergic β1 receptor"),
    ];
    for (a, b) in pairs {
        for (first, second) in [(a, b), (b, a)] {
            let curated = table("c", &[Some(first), Some(second)]);
            let reference = table("r", &[Some(second), Some(first)]);
            let out = align(&reference, &curated, "r", "c", 81, &WRatio, None).unwrap();

            assert_eq!(out.decisions[0].matched.as_deref(), Some(second));
            assert_eq!(out.decisions[0].score, 100);
            assert_eq!(out.decisions[1].matched.as_deref(), Some(first));
            assert_eq!(out.decisions[1].score, 100);
            // Second column holds the curated row position
            assert_eq!(out.aligned.rows[0].get(1), Some("1"));
            assert_eq!(out.aligned.rows[1].get(1), Some("0"));
        }
    }
}

#[test]
fn empty_curated_table() {
    let curated = table("c", &[]);
    let reference = table("r", &[Some("a"), Some("b")]);
    let out = align(&reference, &curated, "r", "c", 81, &WRatio, None).unwrap();
    assert_eq!(out.decisions.len(), 2);
    for d in &out.decisions {
        assert_eq!(d.matched, None);
        assert_eq!(d.score, 0);
    }
    assert!(out.aligned.is_empty());
    assert_eq!(out.aligned.columns, curated.columns);
}

#[test]
fn empty_reference_table() {
    let curated = table("c", &[Some("a")]);
    let reference = table("r", &[]);
    let out = align(&reference, &curated, "r", "c", 81, &WRatio, None).unwrap();
    assert!(out.decisions.is_empty());
    assert!(out.aligned.is_empty());
}

#[test]
fn missing_curated_key_reported_first() {
    let curated = table("c", &[Some("a")]);
    let reference = table("r", &[Some("a")]);
    let err = align(&reference, &curated, "nope", "also_nope", 81, &WRatio, None).unwrap_err();
    assert!(matches!(
        err,
        AlignError::MissingColumn { dataset: Dataset::Curated, .. }
    ));
}

// -------------------------------------------------------------------------
// Config-driven run
// -------------------------------------------------------------------------

#[test]
fn config_options_drive_run() {
    let config = AlignConfig::from_toml(
        r#"
threshold = 100
scorer = "ratio"
[curated]
key = "chembl_assay_description"
[reference]
key = "Assay Description"
"#,
    )
    .unwrap();
    let options = config.options().unwrap();
    assert_eq!(options.scorer, ScorerKind::Ratio);

    let curated = load_fixture("curated.csv");
    let reference = load_fixture("reference.csv");
    let result = run(
        &AlignInput {
            reference: &reference,
            reference_key: config.reference_key(),
            curated: &curated,
            curated_key: config.curated_key(),
        },
        &options,
        None,
    )
    .unwrap();
    assert_eq!(result.meta.scorer, "ratio");
    assert!(result.decisions.iter().all(|d| d.matched.is_none() || d.score == 100));
}
