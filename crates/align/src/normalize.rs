//! Text canonicalization for key cells and header names.

/// Canonicalize a key cell for comparison.
///
/// Null cells become the empty string. Whitespace runs (including
/// non-breaking variants) collapse to one ASCII space, superscript tritium
/// `³H` becomes `3H`, and en-dash / minus sign become `-`. Idempotent.
pub fn normalize_text(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return String::new();
    };

    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out.replace("³H", "3H")
        .replace(['\u{2013}', '\u{2212}'], "-")
}

/// Clean a column header: trim, turn NBSP into a space, drop embedded
/// CR/LF characters.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .replace('\u{00A0}', " ")
        .replace(['\r', '\n'], "")
        .trim()
        .to_string()
}
