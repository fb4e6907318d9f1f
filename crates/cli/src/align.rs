//! `assaymatch align` and `assaymatch validate`.

use std::path::{Path, PathBuf};

use assaymatch_align::engine::{run, AlignInput, AlignObserver};
use assaymatch_align::model::{AlignSummary, MatchDecision};
use assaymatch_align::{AlignConfig, Dataset};
use assaymatch_io::{load_table, write_csv, write_decisions_csv};

use crate::{AlignArgs, CliError};

const SCORES_SUFFIX: &str = "_Matched_Assay_Scores.csv";
const MERGED_SUFFIX: &str = "_Merged_File1_by_File2_FuzzyMatched.csv";

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Logs one line per reference row as decisions come out of the engine.
struct ProgressLog;

impl AlignObserver for ProgressLog {
    fn on_start(&mut self, reference_rows: usize, candidate_pool: usize) {
        log::info!(
            "matching {reference_rows} File 2 rows against {candidate_pool} unique File 1 descriptions"
        );
    }

    fn on_decision(&mut self, _index: usize, decision: &MatchDecision) {
        match &decision.matched {
            Some(matched) => log::info!(
                "[MATCH] '{}' → '{}' (score: {})",
                decision.query,
                matched,
                decision.score
            ),
            None => log::info!(
                "[NO-MATCH] '{}' (best score: {})",
                decision.query,
                decision.score
            ),
        }
    }

    fn on_finish(&mut self, summary: &AlignSummary) {
        if summary.unmatched > 0 {
            log::info!("{} File 2 rows left unmatched", summary.unmatched);
        }
    }
}

// ---------------------------------------------------------------------------
// Config + flags
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<AlignConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(AlignConfig::from_toml_in(&text, base_dir)?)
}

/// Command-line flags win over config values.
fn merge_args(config: &mut AlignConfig, args: &AlignArgs) {
    if let Some(ref f) = args.file1 {
        config.curated.file = Some(f.clone());
    }
    if let Some(ref f) = args.file2 {
        config.reference.file = Some(f.clone());
    }
    if let Some(ref k) = args.file1_key {
        config.curated.key = Some(k.clone());
    }
    if let Some(ref k) = args.file2_key {
        config.reference.key = Some(k.clone());
    }
    if let Some(ref s) = args.sheet1 {
        config.curated.sheet = Some(s.clone());
    }
    if let Some(ref s) = args.sheet2 {
        config.reference.sheet = Some(s.clone());
    }
    if args.threshold.is_some() {
        config.threshold = args.threshold;
    }
    if args.scorer.is_some() {
        config.scorer = args.scorer;
    }
    if let Some(ref p) = args.outprefix {
        config.output.prefix = Some(p.clone());
    }
}

fn required_file(config: &AlignConfig, dataset: Dataset) -> Result<PathBuf, CliError> {
    let (file, flag, section) = match dataset {
        Dataset::Curated => (&config.curated.file, "--file1", "[curated]"),
        Dataset::Reference => (&config.reference.file, "--file2", "[reference]"),
    };
    file.clone().ok_or_else(|| {
        CliError::args(format!("no {} given", dataset.file_label()))
            .with_hint(format!("pass {flag} or set `file` under {section} in the config"))
    })
}

/// Output paths for a prefix: (scores, merged).
fn output_paths(prefix: &str) -> (PathBuf, PathBuf) {
    (
        PathBuf::from(format!("{prefix}{SCORES_SUFFIX}")),
        PathBuf::from(format!("{prefix}{MERGED_SUFFIX}")),
    )
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_align(args: AlignArgs) -> Result<(), CliError> {
    let mut config = match args.config {
        Some(ref path) => load_config(path)?,
        None => AlignConfig::default(),
    };
    merge_args(&mut config, &args);
    config.validate()?;
    let options = config.options()?;

    let file1 = required_file(&config, Dataset::Curated)?;
    let file2 = required_file(&config, Dataset::Reference)?;

    let curated = load_table(&file1, config.curated.sheet.as_deref())?;
    let reference = load_table(&file2, config.reference.sheet.as_deref())?;

    let input = AlignInput {
        reference: &reference,
        reference_key: config.reference_key(),
        curated: &curated,
        curated_key: config.curated_key(),
    };
    let mut progress = ProgressLog;
    let result = run(&input, &options, Some(&mut progress))?;

    let prefix = config.output_prefix();
    let (scores_path, merged_path) = output_paths(prefix);
    if let Some(dir) = scores_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|e| CliError::io(format!("cannot create {}: {e}", dir.display())))?;
    }

    write_decisions_csv(&result.decisions, &scores_path)?;
    log::info!("wrote match scores to {}", scores_path.display());

    if result.summary.matched > 0 {
        write_csv(&result.aligned, &merged_path)?;
        log::info!("wrote merged table to {}", merged_path.display());
    } else {
        log::warn!(
            "no matches ≥ {}; {} not written",
            options.threshold,
            merged_path.display()
        );
    }

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    // Human summary to stderr
    if !args.quiet {
        let s = &result.summary;
        eprintln!(
            "{} of {} File 2 rows matched ({} exact, {} unmatched) using {} at threshold {}",
            s.matched, s.reference_rows, s.exact, s.unmatched, result.meta.scorer, result.meta.threshold,
        );
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let options = config.options()?;

    eprintln!(
        "{}: threshold {}, scorer {}, output prefix '{}'",
        config.name.as_deref().unwrap_or("config"),
        options.threshold,
        options.scorer,
        config.output_prefix(),
    );

    for (dataset, ds, key) in [
        (Dataset::Curated, &config.curated, config.curated_key()),
        (Dataset::Reference, &config.reference, config.reference_key()),
    ] {
        match ds.file {
            Some(ref file) => {
                let table = load_table(file, ds.sheet.as_deref())?;
                table.require_column(key, dataset)?;
                eprintln!(
                    "  {}: {} ({} rows), key column '{}' found",
                    dataset.file_label(),
                    file.display(),
                    table.len(),
                    key
                );
            }
            None => eprintln!("  {}: no file set, key column '{}'", dataset.file_label(), key),
        }
    }

    eprintln!("config OK");
    Ok(())
}
