use std::collections::HashSet;

use crate::corpus::DocumentRecord;
use crate::entity::{EntityLabel, EntityMention};
use crate::normalize::normalize;
use crate::rules::RuleSet;
use crate::segment::{truncate_chars, Segmenter, MIN_ENTITY_SENTENCE_LEN};

/// Maximum length of the context sentence stored on a mention.
const MAX_CONTEXT_LEN: usize = 250;

/// Applies the ordered entity rule table to every surviving sentence of a
/// document. All matching rules fire, so the same span may be tagged under
/// more than one label.
pub struct EntityRecognizer<'a> {
    rules: &'a RuleSet,
    segmenter: &'a Segmenter,
}

impl<'a> EntityRecognizer<'a> {
    #[must_use]
    pub fn new(rules: &'a RuleSet, segmenter: &'a Segmenter) -> Self {
        Self { rules, segmenter }
    }

    /// Recognize mentions in one document. The dedup set is scoped to this
    /// call: repeating a `(normalized, label)` pair inside one document is
    /// suppressed, but the same entity recurs freely across documents.
    pub fn recognize(&self, doc: &DocumentRecord) -> Vec<EntityMention> {
        let mut mentions = Vec::new();
        let mut seen: HashSet<(String, EntityLabel)> = HashSet::new();

        let text = doc.combined_text();
        for sentence in self.segmenter.sentences(&text, MIN_ENTITY_SENTENCE_LEN) {
            for rule in &self.rules.entity_rules {
                for m in rule.pattern.find_iter(sentence) {
                    let entity_text = m.as_str().trim().to_string();
                    let normalized = normalize(&entity_text);

                    if !seen.insert((normalized.clone(), rule.label)) {
                        continue;
                    }

                    let std_id = if rule.label == EntityLabel::Vulnerability {
                        entity_text.to_uppercase()
                    } else {
                        String::new()
                    };

                    mentions.push(EntityMention {
                        row_id: doc.row_id,
                        entity_text,
                        label: rule.label,
                        normalized,
                        std_id,
                        context_sentence: truncate_chars(sentence, MAX_CONTEXT_LEN).to_string(),
                        source_url: doc.source_url.clone(),
                        group_name: doc.group_name.clone(),
                    });
                }
            }
        }

        tracing::debug!(
            row_id = doc.row_id,
            group = %doc.group_name,
            mentions = mentions.len(),
            "recognized entities"
        );
        mentions
    }

    /// Recognize mentions across the whole corpus, in document order.
    pub fn recognize_all(&self, documents: &[DocumentRecord]) -> Vec<EntityMention> {
        documents.iter().flat_map(|d| self.recognize(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(row_id: usize, group: &str, description: &str) -> DocumentRecord {
        DocumentRecord {
            row_id,
            group_name: group.to_string(),
            source_url: "https://example.org".to_string(),
            description: description.to_string(),
            usage_text: String::new(),
        }
    }

    fn recognize(doc: &DocumentRecord) -> Vec<EntityMention> {
        let rules = RuleSet::builtin().unwrap();
        let segmenter = Segmenter::new().unwrap();
        EntityRecognizer::new(&rules, &segmenter).recognize(doc)
    }

    #[test]
    fn recognizes_labeled_mentions() {
        let got = recognize(&doc(
            1,
            "APT28",
            "APT28 has used Mimikatz to target the healthcare industry.",
        ));

        assert!(got
            .iter()
            .any(|m| m.entity_text == "Mimikatz" && m.label == EntityLabel::ToolMalware));
        assert!(got
            .iter()
            .any(|m| m.entity_text == "healthcare" && m.label == EntityLabel::Industry));
        assert!(got
            .iter()
            .any(|m| m.entity_text == "APT28" && m.label == EntityLabel::ActorGroup));
    }

    #[test]
    fn duplicate_mentions_within_a_document_are_suppressed() {
        let repeated =
            "The actors deployed Mimikatz on every host. Later the actors deployed Mimikatz again.";
        let got = recognize(&doc(1, "G", repeated));
        let mimikatz: Vec<_> = got.iter().filter(|m| m.normalized == "mimikatz").collect();
        assert_eq!(mimikatz.len(), 1);
    }

    #[test]
    fn same_entity_recurs_across_documents() {
        let rules = RuleSet::builtin().unwrap();
        let segmenter = Segmenter::new().unwrap();
        let recognizer = EntityRecognizer::new(&rules, &segmenter);

        let docs = vec![
            doc(1, "A", "The group deployed Mimikatz during the intrusion."),
            doc(2, "B", "Analysts also observed Mimikatz in this campaign."),
        ];
        let got = recognizer.recognize_all(&docs);
        let mimikatz: Vec<_> = got.iter().filter(|m| m.normalized == "mimikatz").collect();
        assert_eq!(mimikatz.len(), 2);
        assert_ne!(mimikatz[0].row_id, mimikatz[1].row_id);
    }

    #[test]
    fn vulnerability_mentions_carry_an_upper_cased_std_id() {
        let got = recognize(&doc(
            1,
            "G",
            "The campaign exploited cve-2021-44228 on public servers.",
        ));
        let vuln = got
            .iter()
            .find(|m| m.label == EntityLabel::Vulnerability)
            .unwrap();
        assert_eq!(vuln.std_id, "CVE-2021-44228");
        // Other labels keep it empty.
        assert!(got
            .iter()
            .filter(|m| m.label != EntityLabel::Vulnerability)
            .all(|m| m.std_id.is_empty()));
    }

    #[test]
    fn short_sentences_yield_no_mentions() {
        // "Mimikatz." alone is 9 chars, below the entity threshold.
        let got = recognize(&doc(1, "G", "Mimikatz."));
        assert!(got.is_empty());
    }

    #[test]
    fn a_span_may_carry_multiple_labels() {
        // "Democratic National Committee" is both an Event and a Victim rule.
        let got = recognize(&doc(
            1,
            "G",
            "The Democratic National Committee intrusion was widely reported.",
        ));
        let labels: HashSet<_> = got
            .iter()
            .filter(|m| m.entity_text == "Democratic National Committee")
            .map(|m| m.label)
            .collect();
        assert!(labels.contains(&EntityLabel::Event));
        assert!(labels.contains(&EntityLabel::Victim));
    }

    #[test]
    fn context_sentence_is_truncated() {
        let long_tail = "x".repeat(400);
        let text = format!("The actors deployed Mimikatz with {long_tail} extra.");
        let got = recognize(&doc(1, "G", &text));
        let m = got.iter().find(|m| m.normalized == "mimikatz").unwrap();
        assert_eq!(m.context_sentence.chars().count(), 250);
    }
}
