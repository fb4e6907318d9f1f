//! `assaymatch-align`: fuzzy alignment of two assay-description tables.
//!
//! Pure engine crate: receives pre-loaded tables, returns the curated rows
//! reordered to follow the reference table plus one audit decision per
//! reference row. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod scorer;
pub mod similarity;
pub mod summary;

pub use config::AlignConfig;
pub use engine::{align, run, AlignInput, AlignObserver, AlignOptions, Alignment};
pub use error::{AlignError, Dataset};
pub use model::{AlignResult, MatchDecision, Row, Table};
pub use scorer::{Scorer, ScorerKind};
