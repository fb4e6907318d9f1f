use crate::error::{AlignError, Dataset};
use crate::index::CandidateIndex;
use crate::matcher::{best_match, BestMatch};
use crate::model::{AlignMeta, AlignResult, AlignSummary, MatchDecision, Table};
use crate::normalize::normalize_text;
use crate::scorer::{Scorer, ScorerKind};
use crate::summary::compute_summary;

/// Default acceptance threshold, inclusive.
pub const DEFAULT_THRESHOLD: u8 = 81;

// ---------------------------------------------------------------------------
// Options + input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignOptions {
    pub threshold: u8,
    pub scorer: ScorerKind,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            scorer: ScorerKind::default(),
        }
    }
}

/// Pre-loaded tables plus the key column of each.
pub struct AlignInput<'a> {
    pub reference: &'a Table,
    pub reference_key: &'a str,
    pub curated: &'a Table,
    pub curated_key: &'a str,
}

/// Progress hooks. Every method has a no-op default.
pub trait AlignObserver {
    fn on_start(&mut self, _reference_rows: usize, _candidate_pool: usize) {}
    /// Called once per reference row, in reference order.
    fn on_decision(&mut self, _index: usize, _decision: &MatchDecision) {}
    fn on_finish(&mut self, _summary: &AlignSummary) {}
}

/// Raw output of one alignment pass.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Curated rows in reference order; curated schema.
    pub aligned: Table,
    /// One decision per reference row, same order.
    pub decisions: Vec<MatchDecision>,
    pub candidate_pool: usize,
    pub shadowed: usize,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Resolve every reference row to its best curated counterpart.
///
/// Inputs are read-only. Rows scoring at or above `threshold` copy the
/// matched curated row into the output; the rest only leave an audit entry
/// with no match text. An empty curated table is not an error.
pub fn align(
    reference: &Table,
    curated: &Table,
    reference_key: &str,
    curated_key: &str,
    threshold: u8,
    scorer: &dyn Scorer,
    mut observer: Option<&mut (dyn AlignObserver + '_)>,
) -> Result<Alignment, AlignError> {
    if threshold > 100 {
        return Err(AlignError::InvalidThreshold(threshold as u32));
    }

    let index = CandidateIndex::build(curated, curated_key)?;
    let ref_col = reference.require_column(reference_key, Dataset::Reference)?;

    log::debug!(
        "matching {} reference rows against {} candidates (scorer {}, threshold >= {threshold})",
        reference.len(),
        index.len(),
        scorer.name(),
    );
    if index.shadowed() > 0 {
        log::warn!(
            "{} curated rows share a normalized key with an earlier row and are unreachable",
            index.shadowed()
        );
    }
    if let Some(obs) = observer.as_deref_mut() {
        obs.on_start(reference.len(), index.len());
    }

    let queries: Vec<String> = reference
        .rows
        .iter()
        .map(|row| normalize_text(row.get(ref_col)))
        .collect();
    let best = score_all(&queries, index.keys(), scorer);

    let mut aligned = Table::new(curated.columns.clone());
    let mut decisions = Vec::with_capacity(queries.len());

    for (i, (query, found)) in queries.into_iter().zip(best).enumerate() {
        let accepted = found.candidate.filter(|_| found.score >= threshold);
        let decision = match accepted.and_then(|pos| index.row_at(pos)) {
            Some(row) => {
                aligned.rows.push(row.clone());
                MatchDecision {
                    query,
                    matched: Some(found.text),
                    score: found.score,
                }
            }
            None => MatchDecision {
                query,
                matched: None,
                score: found.score,
            },
        };

        log::debug!(
            "row {i}: {:?} -> {:?} (score {})",
            decision.query,
            decision.matched,
            decision.score
        );
        if let Some(obs) = observer.as_deref_mut() {
            obs.on_decision(i, &decision);
        }
        decisions.push(decision);
    }

    Ok(Alignment {
        aligned,
        decisions,
        candidate_pool: index.len(),
        shadowed: index.shadowed(),
    })
}

#[cfg(not(feature = "parallel"))]
fn score_all(queries: &[String], pool: &[String], scorer: &dyn Scorer) -> Vec<BestMatch> {
    queries.iter().map(|q| best_match(q, pool, scorer)).collect()
}

/// Rows are independent and the pool is read-only, so rows fan out freely.
/// `collect` keeps reference order.
#[cfg(feature = "parallel")]
fn score_all(queries: &[String], pool: &[String], scorer: &dyn Scorer) -> Vec<BestMatch> {
    use rayon::prelude::*;
    queries.par_iter().map(|q| best_match(q, pool, scorer)).collect()
}

/// Run an alignment and wrap it with metadata and summary.
pub fn run(
    input: &AlignInput<'_>,
    options: &AlignOptions,
    mut observer: Option<&mut (dyn AlignObserver + '_)>,
) -> Result<AlignResult, AlignError> {
    let alignment = align(
        input.reference,
        input.curated,
        input.reference_key,
        input.curated_key,
        options.threshold,
        options.scorer.scorer(),
        observer.as_deref_mut(),
    )?;

    let summary = compute_summary(&alignment.decisions, alignment.candidate_pool);
    log::debug!(
        "{} of {} reference rows matched ({} exact)",
        summary.matched,
        summary.reference_rows,
        summary.exact
    );
    if let Some(obs) = observer.as_deref_mut() {
        obs.on_finish(&summary);
    }

    Ok(AlignResult {
        meta: AlignMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            scorer: options.scorer.to_string(),
            threshold: options.threshold,
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        aligned: alignment.aligned,
        decisions: alignment.decisions,
    })
}
