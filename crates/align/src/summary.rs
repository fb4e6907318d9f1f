use crate::model::{AlignSummary, MatchDecision};

/// Compute summary statistics from the decision log.
pub fn compute_summary(decisions: &[MatchDecision], candidate_pool: usize) -> AlignSummary {
    let mut matched = 0;
    let mut exact = 0;
    let mut score_total: u64 = 0;

    for d in decisions.iter().filter(|d| d.is_match()) {
        matched += 1;
        score_total += d.score as u64;
        if d.score == 100 {
            exact += 1;
        }
    }

    AlignSummary {
        reference_rows: decisions.len(),
        candidate_pool,
        matched,
        unmatched: decisions.len() - matched,
        exact,
        mean_score: (matched > 0).then(|| score_total as f64 / matched as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(matched: Option<&str>, score: u8) -> MatchDecision {
        MatchDecision {
            query: "q".into(),
            matched: matched.map(String::from),
            score,
        }
    }

    #[test]
    fn summary_counts() {
        let decisions = vec![
            decision(Some("a"), 100),
            decision(Some("b"), 90),
            decision(None, 40),
            decision(None, 0),
        ];
        let s = compute_summary(&decisions, 7);
        assert_eq!(s.reference_rows, 4);
        assert_eq!(s.candidate_pool, 7);
        assert_eq!(s.matched, 2);
        assert_eq!(s.unmatched, 2);
        assert_eq!(s.exact, 1);
        assert_eq!(s.mean_score, Some(95.0));
    }

    #[test]
    fn no_matches_has_no_mean() {
        let s = compute_summary(&[decision(None, 12)], 3);
        assert_eq!(s.matched, 0);
        assert_eq!(s.mean_score, None);
    }
}
