use regex::Regex;

/// Minimum sentence length (chars) for entity recognition.
pub const MIN_ENTITY_SENTENCE_LEN: usize = 10;
/// Minimum sentence length (chars) for relation extraction. Relations need
/// more context than mentions, so the bar is higher.
pub const MIN_RELATION_SENTENCE_LEN: usize = 15;

/// Splits combined document text into candidate sentences.
///
/// Boundaries are sentence-ending punctuation followed by whitespace, or the
/// `|` field separator the upstream crawler uses to join usage entries.
/// Fragments shorter than the requested minimum are dropped before any
/// downstream stage sees them; very short fragments produce unreliable matches.
#[derive(Debug, Clone)]
pub struct Segmenter {
    boundary: Regex,
}

impl Segmenter {
    /// The boundary pattern is fixed; compilation failure would be a
    /// programming error, surfaced once at construction.
    pub fn new() -> crate::Result<Self> {
        Ok(Self {
            boundary: Regex::new(r"[.!?]\s+|\s*\|\s*")?,
        })
    }

    /// Lazy, restartable walk over trimmed sentences of at least `min_len`
    /// characters. Call again with the same text to restart.
    pub fn sentences<'t>(
        &'t self,
        text: &'t str,
        min_len: usize,
    ) -> impl Iterator<Item = &'t str> + 't {
        self.boundary
            .split(text)
            .map(str::trim)
            .filter(move |s| s.chars().count() >= min_len)
    }
}

/// Truncate to at most `max` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg() -> Segmenter {
        Segmenter::new().unwrap()
    }

    #[test]
    fn truncation_is_char_boundary_safe() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 5), "ab");
        assert_eq!(truncate_chars("描述文字", 2), "描述");
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        let text = "APT29 targeted the energy sector. They deployed Mimikatz everywhere! Was it attributed? Yes it was attributed.";
        let s = seg();
        let got: Vec<_> = s.sentences(text, MIN_ENTITY_SENTENCE_LEN).collect();
        assert_eq!(
            got,
            vec![
                "APT29 targeted the energy sector",
                "They deployed Mimikatz everywhere",
                "Was it attributed",
                "Yes it was attributed."
            ]
        );
    }

    #[test]
    fn splits_on_field_separator() {
        let text = "used Mimikatz for dumping | targeted healthcare providers";
        let s = seg();
        let got: Vec<_> = s.sentences(text, MIN_ENTITY_SENTENCE_LEN).collect();
        assert_eq!(
            got,
            vec!["used Mimikatz for dumping", "targeted healthcare providers"]
        );
    }

    #[test]
    fn drops_short_fragments() {
        // 9 chars: below both thresholds.
        let text = "Mimikatz. The group used Mimikatz again today.";
        let s = seg();
        let entity_pass: Vec<_> = s.sentences(text, MIN_ENTITY_SENTENCE_LEN).collect();
        assert_eq!(entity_pass, vec!["The group used Mimikatz again today."]);

        let short_only = "short bit";
        assert_eq!(
            seg()
                .sentences(short_only, MIN_ENTITY_SENTENCE_LEN)
                .count(),
            0
        );
    }

    #[test]
    fn restartable() {
        let s = seg();
        let text = "First sentence here. Second sentence here.";
        let a: Vec<_> = s.sentences(text, MIN_ENTITY_SENTENCE_LEN).collect();
        let b: Vec<_> = s.sentences(text, MIN_ENTITY_SENTENCE_LEN).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }
}
