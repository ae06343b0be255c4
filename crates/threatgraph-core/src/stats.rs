use std::collections::BTreeMap;

use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityLabel, EntityMention};
use crate::graph::KnowledgeGraph;
use crate::relation::{RelationKind, RelationTriple};

/// Pure aggregations over the final mention and triple tables. Nothing here
/// mutates upstream data; every function can run repeatedly over the same
/// snapshot, and zero-row inputs yield empty tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsReporter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: EntityLabel,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCount {
    pub group_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopEntity {
    pub normalized: String,
    pub count: usize,
    /// Every label this normalized form was tagged with, in first-seen order.
    pub labels: Vec<EntityLabel>,
}

/// One row of the per-group x per-label count matrix, shaped for tabular
/// export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub group_name: String,
    pub label: EntityLabel,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationCount {
    pub relation: RelationKind,
    pub count: usize,
}

impl StatsReporter {
    /// Mention frequency by label, most frequent first.
    #[must_use]
    pub fn label_counts(mentions: &[EntityMention]) -> Vec<LabelCount> {
        let mut counts: BTreeMap<&'static str, (EntityLabel, usize)> = BTreeMap::new();
        for m in mentions {
            counts.entry(m.label.as_str()).or_insert((m.label, 0)).1 += 1;
        }
        let mut rows: Vec<LabelCount> = counts
            .into_values()
            .map(|(label, count)| LabelCount { label, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.label.as_str().cmp(b.label.as_str())));
        rows
    }

    /// Mention frequency by originating group, most frequent first.
    #[must_use]
    pub fn group_counts(mentions: &[EntityMention]) -> Vec<GroupCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for m in mentions {
            *counts.entry(m.group_name.as_str()).or_default() += 1;
        }
        let mut rows: Vec<GroupCount> = counts
            .into_iter()
            .map(|(group, count)| GroupCount {
                group_name: group.to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.group_name.cmp(&b.group_name)));
        rows
    }

    /// The `k` most frequent normalized entities with the set of labels
    /// each carries.
    #[must_use]
    pub fn top_entities(mentions: &[EntityMention], k: usize) -> Vec<TopEntity> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut labels: BTreeMap<&str, Vec<EntityLabel>> = BTreeMap::new();
        for m in mentions {
            *counts.entry(m.normalized.as_str()).or_default() += 1;
            let seen = labels.entry(m.normalized.as_str()).or_default();
            if !seen.contains(&m.label) {
                seen.push(m.label);
            }
        }

        let mut rows: Vec<TopEntity> = counts
            .into_iter()
            .map(|(normalized, count)| TopEntity {
                normalized: normalized.to_string(),
                count,
                labels: labels.remove(normalized).unwrap_or_default(),
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.normalized.cmp(&b.normalized)));
        rows.truncate(k);
        rows
    }

    /// The `k` most frequent normalized entities carrying `label`.
    #[must_use]
    pub fn top_entities_for_label(
        mentions: &[EntityMention],
        label: EntityLabel,
        k: usize,
    ) -> Vec<TopEntity> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for m in mentions.iter().filter(|m| m.label == label) {
            *counts.entry(m.normalized.as_str()).or_default() += 1;
        }
        let mut rows: Vec<TopEntity> = counts
            .into_iter()
            .map(|(normalized, count)| TopEntity {
                normalized: normalized.to_string(),
                count,
                labels: vec![label],
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.normalized.cmp(&b.normalized)));
        rows.truncate(k);
        rows
    }

    /// Per-group x per-label matrix, one row per populated cell, ordered by
    /// group then label.
    #[must_use]
    pub fn group_label_matrix(mentions: &[EntityMention]) -> Vec<SummaryRow> {
        let mut counts: BTreeMap<(&str, &'static str), (EntityLabel, usize)> = BTreeMap::new();
        for m in mentions {
            counts
                .entry((m.group_name.as_str(), m.label.as_str()))
                .or_insert((m.label, 0))
                .1 += 1;
        }
        counts
            .into_iter()
            .map(|((group, _), (label, count))| SummaryRow {
                group_name: group.to_string(),
                label,
                count,
            })
            .collect()
    }

    /// Triple frequency by relation kind, most frequent first.
    #[must_use]
    pub fn relation_counts(triples: &[RelationTriple]) -> Vec<RelationCount> {
        let mut counts: BTreeMap<&'static str, (RelationKind, usize)> = BTreeMap::new();
        for t in triples {
            counts
                .entry(t.relation.as_str())
                .or_insert((t.relation, 0))
                .1 += 1;
        }
        let mut rows: Vec<RelationCount> = counts
            .into_values()
            .map(|(relation, count)| RelationCount { relation, count })
            .collect();
        rows.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.relation.as_str().cmp(b.relation.as_str()))
        });
        rows
    }

    /// The `k` best-connected graph nodes by total degree.
    #[must_use]
    pub fn top_degree_nodes(graph: &KnowledgeGraph, k: usize) -> Vec<(String, usize)> {
        let pg = graph.to_petgraph();
        let mut rows: Vec<(String, usize)> = pg
            .node_indices()
            .map(|idx| {
                let degree = pg.neighbors_directed(idx, Direction::Outgoing).count()
                    + pg.neighbors_directed(idx, Direction::Incoming).count();
                (pg[idx].clone(), degree)
            })
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows.truncate(k);
        rows
    }
}
