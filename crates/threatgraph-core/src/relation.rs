use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::corpus::DocumentRecord;
use crate::entity::{EntityLabel, EntityMention};
use crate::rules::RuleSet;
use crate::segment::{truncate_chars, Segmenter, MIN_RELATION_SENTENCE_LEN};

/// Maximum length of an evidence sentence carried on a triple.
const MAX_EVIDENCE_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Uses,
    Targets,
    OperatesIn,
    Attacks,
    ExploitsSoftware,
    ExploitsVulnerability,
    Involves,
}

impl RelationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uses => "uses",
            Self::Targets => "targets",
            Self::OperatesIn => "operates_in",
            Self::Attacks => "attacks",
            Self::ExploitsSoftware => "exploits_software",
            Self::ExploitsVulnerability => "exploits_vulnerability",
            Self::Involves => "involves",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uses" => Ok(Self::Uses),
            "targets" => Ok(Self::Targets),
            "operates_in" => Ok(Self::OperatesIn),
            "attacks" => Ok(Self::Attacks),
            "exploits_software" => Ok(Self::ExploitsSoftware),
            "exploits_vulnerability" => Ok(Self::ExploitsVulnerability),
            "involves" => Ok(Self::Involves),
            _ => Err(crate::Error::InvalidRelationKind(s.to_string())),
        }
    }
}

/// A head-relation-tail assertion with the first evidence sentence seen.
/// Deduplicated globally over the whole corpus by the literal
/// `head|relation|tail` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationTriple {
    pub head: String,
    pub relation: RelationKind,
    pub tail: String,
    pub evidence: String,
}

impl RelationTriple {
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!("{}|{}|{}", self.head, self.relation, self.tail)
    }
}

/// How entity presence in a sentence is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-insensitive substring containment. Known to false-positive on
    /// short entity strings embedded in longer words; kept as the default
    /// for compatibility with existing outputs.
    #[default]
    Substring,
    /// Substring containment with word boundaries on both sides. Stricter,
    /// fewer false positives, different node/edge counts.
    WordBoundary,
}

/// Projection of a mention kept in the cross-corpus entity index.
#[derive(Debug, Clone)]
struct IndexedEntity {
    text: String,
    label: EntityLabel,
}

/// Re-scans sentences for trigger phrases and cross-references the entities
/// visible in each sentence into typed triples.
pub struct RelationExtractor<'a> {
    rules: &'a RuleSet,
    segmenter: &'a Segmenter,
    mode: MatchMode,
}

impl<'a> RelationExtractor<'a> {
    #[must_use]
    pub fn new(rules: &'a RuleSet, segmenter: &'a Segmenter) -> Self {
        Self {
            rules,
            segmenter,
            mode: MatchMode::default(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Extract triples for the whole corpus. The entity index is built once
    /// from all mentions; the seen-set spans every document.
    pub fn extract(
        &self,
        documents: &[DocumentRecord],
        mentions: &[EntityMention],
    ) -> Vec<RelationTriple> {
        let index = build_entity_index(mentions);

        let mut triples = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for doc in documents {
            let text = doc.combined_text();
            for sentence in self.segmenter.sentences(&text, MIN_RELATION_SENTENCE_LEN) {
                self.extract_sentence(sentence, &doc.group_name, &index, &mut seen, &mut triples);
            }
        }

        tracing::info!(triples = triples.len(), "relation extraction complete");
        triples
    }

    fn extract_sentence(
        &self,
        sentence: &str,
        group_name: &str,
        index: &BTreeMap<String, Vec<IndexedEntity>>,
        seen: &mut HashSet<String>,
        triples: &mut Vec<RelationTriple>,
    ) {
        let sentence_lower = sentence.to_lowercase();

        let found: Vec<&IndexedEntity> = index
            .iter()
            .filter(|(key, _)| self.occurs_in(&sentence_lower, key))
            .flat_map(|(_, entries)| entries.iter())
            .collect();

        // A relation needs at least two participants.
        if found.len() < 2 {
            return;
        }

        let evidence = truncate_chars(sentence, MAX_EVIDENCE_LEN).to_string();

        for rule in &self.rules.relation_rules {
            if !rule.trigger.is_match(sentence) {
                continue;
            }
            for entity in &found {
                if rule.eligible.contains(&entity.label) {
                    push_deduped(
                        RelationTriple {
                            head: group_name.to_string(),
                            relation: rule.kind,
                            tail: entity.text.clone(),
                            evidence: evidence.clone(),
                        },
                        seen,
                        triples,
                    );
                }
            }
        }

        // Events invert direction: the event is the head, regardless of
        // any trigger phrase.
        for entity in &found {
            if entity.label == EntityLabel::Event {
                push_deduped(
                    RelationTriple {
                        head: entity.text.clone(),
                        relation: RelationKind::Involves,
                        tail: group_name.to_string(),
                        evidence: evidence.clone(),
                    },
                    seen,
                    triples,
                );
            }
        }
    }

    fn occurs_in(&self, sentence_lower: &str, key: &str) -> bool {
        match self.mode {
            MatchMode::Substring => sentence_lower.contains(key),
            MatchMode::WordBoundary => contains_word(sentence_lower, key),
        }
    }
}

/// First writer wins: a triple already seen keeps its original evidence.
fn push_deduped(
    triple: RelationTriple,
    seen: &mut HashSet<String>,
    triples: &mut Vec<RelationTriple>,
) {
    if seen.insert(triple.dedup_key()) {
        triples.push(triple);
    }
}

fn build_entity_index(mentions: &[EntityMention]) -> BTreeMap<String, Vec<IndexedEntity>> {
    let mut index: BTreeMap<String, Vec<IndexedEntity>> = BTreeMap::new();
    for mention in mentions {
        index
            .entry(mention.entity_text.to_lowercase())
            .or_default()
            .push(IndexedEntity {
                text: mention.entity_text.clone(),
                label: mention.label,
            });
    }
    index
}

/// Substring occurrence where both ends fall on non-word characters or the
/// string boundary.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric() && c != '_');
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric() && c != '_');
        if before_ok && after_ok {
            return true;
        }
        from = end;
    }
    false
}
