/// Surface-variant aliases mapped to one canonical spelling. Applied to the
/// whole cleaned string, not to substrings.
const ALIASES: &[(&str, &str)] = &[
    ("telecoms", "telecommunications"),
    ("telecom", "telecommunications"),
    ("crypto", "cryptocurrency"),
    ("biotech", "biotechnology"),
    ("tech", "technology"),
    ("u.s.", "united states"),
    ("vietnamese", "vietnam"),
    ("russian", "russia"),
    ("chinese", "china"),
    ("iranian", "iran"),
    ("north korean", "north korea"),
    ("south korean", "south korea"),
    ("european", "europe"),
];

/// Canonicalize an entity's surface text into its comparison key.
///
/// Lower-cases, collapses whitespace runs, strips characters outside the
/// allow-list (word characters, space, dot, hyphen), then resolves known
/// aliases. Idempotent: normalizing an already-normalized string is a no-op.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut cleaned = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for ch in lowered.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == '-') {
            continue;
        }
        if pending_space && !cleaned.is_empty() {
            cleaned.push(' ');
        }
        pending_space = false;
        cleaned.push(ch);
    }

    for (variant, canonical) in ALIASES {
        if cleaned == *variant {
            return (*canonical).to_string();
        }
    }

    cleaned
}
