use crate::scorer::Scorer;

/// Best candidate for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMatch {
    /// Pool position of the winner; `None` when the pool was empty.
    pub candidate: Option<usize>,
    pub text: String,
    pub score: u8,
}

impl BestMatch {
    fn none() -> Self {
        Self {
            candidate: None,
            text: String::new(),
            score: 0,
        }
    }
}

/// Score `query` against every pool entry and keep the highest.
///
/// Ties go to the earliest entry in pool order. A perfect 100 ends the scan
/// since nothing later can beat it. Empty pool yields `("", 0)`.
pub fn best_match(query: &str, pool: &[String], scorer: &dyn Scorer) -> BestMatch {
    let mut best: Option<(usize, u8)> = None;

    for (pos, candidate) in pool.iter().enumerate() {
        let score = scorer.score(query, candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((pos, score));
            if score == 100 {
                break;
            }
        }
    }

    match best {
        Some((pos, score)) => BestMatch {
            candidate: Some(pos),
            text: pool[pos].clone(),
            score,
        },
        None => BestMatch::none(),
    }
}
