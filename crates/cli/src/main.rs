// assaymatch CLI - align a curated assay table to a reference table by description text

mod align;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use assaymatch_align::{AlignError, ScorerKind};
use assaymatch_io::IoError;

use exit_codes::{EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "assaymatch")]
#[command(about = "Fuzzy-align a curated assay table (File 1) to a reference table (File 2)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reorder File 1 rows to follow File 2 by best-matching assay description
    #[command(after_help = "\
Examples:
  assaymatch align --file1 chembl.xlsx --file2 drugmatrix.csv
  assaymatch align --file1 chembl.csv --file2 drugmatrix.csv --threshold 90 --outprefix out/run1
  assaymatch align --config drugmatrix.toml --json > result.json
  assaymatch align --config drugmatrix.toml --scorer token_set_ratio --quiet

Writes {prefix}_Matched_Assay_Scores.csv (one row per File 2 row) and,
when anything matched, {prefix}_Merged_File1_by_File2_FuzzyMatched.csv.")]
    Align(AlignArgs),

    /// Check a config file (and the key columns of any files it names) without aligning
    #[command(after_help = "\
Examples:
  assaymatch validate --config drugmatrix.toml")]
    Validate {
        /// Path to the TOML config file
        #[arg(long, short = 'c')]
        config: PathBuf,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct AlignArgs {
    /// TOML config file; flags below override its values
    #[arg(long, short = 'c', env = "ASSAYMATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// File 1: curated table whose rows are reordered (CSV/TSV/Excel)
    #[arg(long)]
    pub file1: Option<PathBuf>,

    /// File 2: reference table that dictates the output order
    #[arg(long)]
    pub file2: Option<PathBuf>,

    /// Key column in File 1 [default: chembl_assay_description]
    #[arg(long)]
    pub file1_key: Option<String>,

    /// Key column in File 2 [default: "Assay Description"]
    #[arg(long)]
    pub file2_key: Option<String>,

    /// Minimum score (0-100, inclusive) for a match to be accepted [default: 81]
    #[arg(long, short = 't')]
    pub threshold: Option<u32>,

    /// Similarity scorer [default: wratio]
    #[arg(long, value_parser = parse_scorer)]
    pub scorer: Option<ScorerKind>,

    /// Output path prefix; parent directories are created [default: demo_output]
    #[arg(long, short = 'o')]
    pub outprefix: Option<String>,

    /// Worksheet to read from File 1 when it is an Excel file
    #[arg(long)]
    pub sheet1: Option<String>,

    /// Worksheet to read from File 2 when it is an Excel file
    #[arg(long)]
    pub sheet2: Option<String>,

    /// Print the full result as JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn parse_scorer(s: &str) -> Result<ScorerKind, String> {
    s.parse::<ScorerKind>().map_err(|e| {
        let names: Vec<&str> = ScorerKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("{e} (expected one of: {})", names.join(", "))
    })
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand = show usage
            eprintln!("Usage: assaymatch <command> [options]");
            eprintln!("       assaymatch --help for more information");
            Ok(())
        }
        Some(Commands::Align(args)) => {
            init_logging(args.quiet);
            align::cmd_align(args)
        }
        Some(Commands::Validate { config }) => {
            init_logging(false);
            align::cmd_validate(config)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<AlignError> for CliError {
    fn from(err: AlignError) -> Self {
        let hint = match &err {
            AlignError::MissingColumn { dataset, available, .. } => Some(format!(
                "{} columns are: {}; pass --{}-key to pick one",
                dataset.file_label(),
                available.join(", "),
                match dataset {
                    assaymatch_align::Dataset::Curated => "file1",
                    assaymatch_align::Dataset::Reference => "file2",
                }
            )),
            AlignError::UnknownScorer(_) => {
                let names: Vec<&str> = ScorerKind::ALL.iter().map(|k| k.as_str()).collect();
                Some(format!("scorers: {}", names.join(", ")))
            }
            _ => None,
        };
        Self { code: EXIT_USAGE, message: err.to_string(), hint }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        match &err {
            IoError::Read { .. } | IoError::Write { .. } => CliError::io(err.to_string()),
            IoError::Parse { .. } => CliError::parse(err.to_string()),
            IoError::UnknownSheet { .. } => CliError::args(err.to_string())
                .with_hint("use --sheet1/--sheet2 (or `sheet` in the config) with one of the listed names"),
        }
    }
}
