use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityLabel, EntityMention};
use crate::relation::{RelationKind, RelationTriple};
use crate::segment::truncate_chars;

/// Edge evidence is trimmed harder than triple evidence; the rendering
/// collaborator only shows it in tooltips.
const MAX_EDGE_EVIDENCE_LEN: usize = 100;

/// A graph node, keyed by the raw entity text.
///
/// Known limitation: identity is the case-sensitive surface form, so two
/// differently-cased spellings of the same entity become distinct nodes.
/// Downstream consumers depend on those node-count semantics, so this is
/// reproduced deliberately rather than keyed on `normalized`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: EntityLabel,
    pub group: String,
    pub normalized: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: RelationKind,
    pub evidence: String,
}

/// Deduplicated node/edge view of the extracted corpus, serialized as one
/// object with `nodes` and `links` sequences for the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    #[serde(rename = "links")]
    pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    /// Merge all mentions into unique nodes and all surviving triples into
    /// edges. First occurrence of a node id wins; later insertions with the
    /// same raw text are no-ops.
    #[must_use]
    pub fn assemble(mentions: &[EntityMention], triples: &[RelationTriple]) -> Self {
        let mut nodes: Vec<GraphNode> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for mention in mentions {
            if seen.insert(mention.entity_text.clone()) {
                nodes.push(GraphNode {
                    id: mention.entity_text.clone(),
                    label: mention.label,
                    group: mention.group_name.clone(),
                    normalized: mention.normalized.clone(),
                });
            }
        }

        let edges = triples
            .iter()
            .map(|t| GraphEdge {
                source: t.head.clone(),
                target: t.tail.clone(),
                relation: t.relation,
                evidence: truncate_chars(&t.evidence, MAX_EDGE_EVIDENCE_LEN).to_string(),
            })
            .collect();

        let graph = Self { nodes, edges };
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph assembled"
        );
        graph
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Materialize as a petgraph `DiGraph` for traversal and degree
    /// statistics. Edge endpoints not present in the node table (group
    /// names usually appear only as relation heads) are added as they are
    /// encountered.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<String, RelationKind> {
        let mut graph = DiGraph::new();
        let mut by_id: HashMap<&str, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            let idx = graph.add_node(node.id.clone());
            by_id.insert(node.id.as_str(), idx);
        }

        for edge in &self.edges {
            let source = *by_id
                .entry(edge.source.as_str())
                .or_insert_with(|| graph.add_node(edge.source.clone()));
            let target = *by_id
                .entry(edge.target.as_str())
                .or_insert_with(|| graph.add_node(edge.target.clone()));
            graph.add_edge(source, target, edge.relation);
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(text: &str, label: EntityLabel, group: &str) -> EntityMention {
        EntityMention {
            row_id: 1,
            entity_text: text.to_string(),
            label,
            normalized: crate::normalize::normalize(text),
            std_id: String::new(),
            context_sentence: String::new(),
            source_url: String::new(),
            group_name: group.to_string(),
        }
    }

    fn triple(head: &str, relation: RelationKind, tail: &str) -> RelationTriple {
        RelationTriple {
            head: head.to_string(),
            relation,
            tail: tail.to_string(),
            evidence: "evidence sentence".to_string(),
        }
    }

    #[test]
    fn first_writer_wins_on_node_attributes() {
        let mentions = vec![
            mention("Mimikatz", EntityLabel::ToolMalware, "APT28"),
            mention("Mimikatz", EntityLabel::Software, "APT29"),
        ];
        let graph = KnowledgeGraph::assemble(&mentions, &[]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.nodes[0].label, EntityLabel::ToolMalware);
        assert_eq!(graph.nodes[0].group, "APT28");
    }

    #[test]
    fn case_variants_become_distinct_nodes() {
        let mentions = vec![
            mention("Mimikatz", EntityLabel::ToolMalware, "APT28"),
            mention("MIMIKATZ", EntityLabel::ToolMalware, "APT28"),
        ];
        let graph = KnowledgeGraph::assemble(&mentions, &[]);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn one_edge_per_triple() {
        let mentions = vec![mention("Mimikatz", EntityLabel::ToolMalware, "APT28")];
        let triples = vec![
            triple("APT28", RelationKind::Uses, "Mimikatz"),
            triple("APT28", RelationKind::Targets, "healthcare"),
        ];
        let graph = KnowledgeGraph::assemble(&mentions, &triples);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn serializes_with_nodes_and_links_keys() {
        let graph = KnowledgeGraph::assemble(
            &[mention("Mimikatz", EntityLabel::ToolMalware, "APT28")],
            &[triple("APT28", RelationKind::Uses, "Mimikatz")],
        );
        let value = serde_json::to_value(&graph).unwrap();
        assert!(value.get("nodes").is_some());
        assert!(value.get("links").is_some());
        assert_eq!(value["links"][0]["relation"], "uses");
    }

    #[test]
    fn petgraph_view_resolves_every_edge() {
        let mentions = vec![
            mention("Mimikatz", EntityLabel::ToolMalware, "APT28"),
            mention("healthcare", EntityLabel::Industry, "APT28"),
        ];
        let triples = vec![
            triple("APT28", RelationKind::Uses, "Mimikatz"),
            triple("APT28", RelationKind::Targets, "healthcare"),
        ];
        let graph = KnowledgeGraph::assemble(&mentions, &triples);
        let pg = graph.to_petgraph();

        // Two entity nodes plus the group head added on demand.
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 2);
    }

    #[test]
    fn empty_inputs_produce_an_empty_graph() {
        let graph = KnowledgeGraph::assemble(&[], &[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.to_petgraph().node_count(), 0);
    }
}
