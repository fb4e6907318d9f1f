//! Fuzzy ratio primitives.
//!
//! All scores are integers in `[0, 100]`. `ratio` is the InDel-normalized
//! similarity `2 * LCS / (len_a + len_b)` over characters; the partial and
//! token variants build on it the way common fuzzy-matching libraries do, so
//! thresholds tuned against those libraries carry over.
//!
//! Functions here take text as given. Callers that want case and punctuation
//! insensitivity run [`full_process`] first (the `wratio` scorer does).

/// Lowercase, replace every non-alphanumeric character (underscore excepted)
/// with a space, and trim. With `force_ascii`, Latin-1 supplement characters
/// (U+0080 to U+00FF, e.g. `³`, `µ`, NBSP) are dropped first; Greek and other
/// scripts are kept so receptor subtypes like `κ` and `μ` stay distinct.
pub fn full_process(s: &str, force_ascii: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if force_ascii && ('\u{80}'..='\u{FF}').contains(&c) {
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            out.extend(c.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// Round half to even, clamped to the score range.
fn intr(x: f64) -> u8 {
    let rounded = if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        x.round()
    };
    rounded.clamp(0.0, 100.0) as u8
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Similarity in `[0.0, 1.0]`.
fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs_len(a, b) as f64 / total as f64
}

pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    intr(100.0 * ratio_chars(&a, &b))
}

// ---------------------------------------------------------------------------
// Matching blocks
// ---------------------------------------------------------------------------

/// A run of equal characters: `a[a_start..a_start+len] == b[b_start..b_start+len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Longest common substring inside the given windows. Ties resolve to the
/// earliest start in `a`, then in `b`.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
    let mut best = Block {
        a_start: alo,
        b_start: blo,
        len: 0,
    };
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];
    for i in alo..ahi {
        for j in blo..bhi {
            let k = if a[i] == b[j] { prev[j - blo] + 1 } else { 0 };
            cur[j - blo + 1] = k;
            if k > best.len {
                best = Block {
                    a_start: i + 1 - k,
                    b_start: j + 1 - k,
                    len: k,
                };
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

/// Recursive longest-match decomposition, sorted, adjacent runs merged,
/// terminated by a zero-length sentinel at `(a.len(), b.len())`.
pub(crate) fn matching_blocks(a: &[char], b: &[char]) -> Vec<Block> {
    let mut queue = vec![(0, a.len(), 0, b.len())];
    let mut found = Vec::new();
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let m = longest_match(a, b, alo, ahi, blo, bhi);
        if m.len == 0 {
            continue;
        }
        found.push(m);
        if alo < m.a_start && blo < m.b_start {
            queue.push((alo, m.a_start, blo, m.b_start));
        }
        let (a_end, b_end) = (m.a_start + m.len, m.b_start + m.len);
        if a_end < ahi && b_end < bhi {
            queue.push((a_end, ahi, b_end, bhi));
        }
    }
    found.sort_by_key(|blk| (blk.a_start, blk.b_start));

    let mut merged: Vec<Block> = Vec::with_capacity(found.len() + 1);
    for blk in found {
        if let Some(last) = merged.last_mut() {
            if last.a_start + last.len == blk.a_start && last.b_start + last.len == blk.b_start {
                last.len += blk.len;
                continue;
            }
        }
        merged.push(blk);
    }
    merged.push(Block {
        a_start: a.len(),
        b_start: b.len(),
        len: 0,
    });
    merged
}

// ---------------------------------------------------------------------------
// Partial + token variants
// ---------------------------------------------------------------------------

/// Best `ratio` of the shorter string against equally long windows of the
/// longer one, anchored at each matching block.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let mut best = 0.0f64;
    for blk in matching_blocks(shorter, longer) {
        let start = blk.b_start.saturating_sub(blk.a_start);
        let end = (start + shorter.len()).min(longer.len());
        let start = start.min(end);
        let r = ratio_chars(shorter, &longer[start..end]);
        if r > 0.995 {
            return 100;
        }
        best = best.max(r);
    }
    intr(100.0 * best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort(a: &str, b: &str, partial: bool) -> u8 {
    let (sa, sb) = (sorted_tokens(a), sorted_tokens(b));
    if partial {
        partial_ratio(&sa, &sb)
    } else {
        ratio(&sa, &sb)
    }
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}

fn token_set(a: &str, b: &str, partial: bool) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    use std::collections::BTreeSet;
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join_tokens(ta.intersection(&tb).copied());
    let only_a = join_tokens(ta.difference(&tb).copied());
    let only_b = join_tokens(tb.difference(&ta).copied());

    let combined_a = format!("{sect} {only_a}").trim().to_string();
    let combined_b = format!("{sect} {only_b}").trim().to_string();

    let f = if partial { partial_ratio } else { ratio };
    f(&sect, &combined_a)
        .max(f(&sect, &combined_b))
        .max(f(&combined_a, &combined_b))
}

/// `ratio` after sorting whitespace-separated tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    token_sort(a, b, false)
}

pub fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    token_sort(a, b, true)
}

/// Compares the shared-token core against each side's remainder, so extra
/// words on one side cost little.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    token_set(a, b, false)
}

pub fn partial_token_set_ratio(a: &str, b: &str) -> u8 {
    token_set(a, b, true)
}

/// Weighted combination of the ratio family over fully processed text.
pub fn wratio(a: &str, b: &str) -> u8 {
    let p1 = full_process(a, true);
    let p2 = full_process(b, true);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    const UNBASE_SCALE: f64 = 0.95;
    let base = ratio(&p1, &p2) as f64;

    let (l1, l2) = (p1.chars().count() as f64, p2.chars().count() as f64);
    let len_ratio = l1.max(l2) / l1.min(l2);

    if len_ratio < 1.5 {
        let tsor = token_sort_ratio(&p1, &p2) as f64 * UNBASE_SCALE;
        let tser = token_set_ratio(&p1, &p2) as f64 * UNBASE_SCALE;
        return intr(base.max(tsor).max(tser));
    }

    let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
    let partial = partial_ratio(&p1, &p2) as f64 * partial_scale;
    let ptsor = partial_token_sort_ratio(&p1, &p2) as f64 * UNBASE_SCALE * partial_scale;
    let ptser = partial_token_set_ratio(&p1, &p2) as f64 * UNBASE_SCALE * partial_scale;
    intr(base.max(partial).max(ptsor).max(ptser))
}
