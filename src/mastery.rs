//! Mastery vector construction.
//!
//! Explicitly mastered nodes score 1.0. A mastered multi-part item also
//! implies partial mastery (0.8) of each component that resolves to its own
//! node ("ice-cream" -> "ice", "cream"). Merging is max-based, so an
//! inferred score never lowers an explicit one.

use crate::graph::store::LexicalGraph;
use crate::metadata::store::MetadataSnapshot;
use crate::types::{MasteryVector, NodeId};

pub const EXPLICIT_MASTERY: f64 = 1.0;
pub const INFERRED_COMPONENT_MASTERY: f64 = 0.8;

pub fn build_mastery_vector(
    explicit: &[NodeId],
    metadata: &MetadataSnapshot,
    graph: &LexicalGraph,
) -> MasteryVector {
    let mut mastery = MasteryVector::new();

    for id in explicit {
        merge(&mut mastery, id.clone(), EXPLICIT_MASTERY);
    }

    for id in explicit {
        for component in component_ids(id, metadata, graph) {
            merge(&mut mastery, component, INFERRED_COMPONENT_MASTERY);
        }
    }

    mastery
}

fn merge(mastery: &mut MasteryVector, id: NodeId, score: f64) {
    let entry = mastery.entry(id).or_insert(score);
    if score > *entry {
        *entry = score;
    }
}

/// Nodes for the hyphen-separated components of a mastered item's form
/// segment, resolved against the graph.
fn component_ids(id: &str, metadata: &MetadataSnapshot, graph: &LexicalGraph) -> Vec<NodeId> {
    let mut parts = id.splitn(3, '-');
    let (kind, lang, form) = match (parts.next(), parts.next(), parts.next()) {
        (Some(kind), Some(lang), Some(form)) => (kind, lang, form),
        _ => return Vec::new(),
    };
    if !form.contains('-') {
        return Vec::new();
    }

    form.split('-')
        .filter_map(|token| {
            let candidate = format!("{kind}-{lang}-{token}");
            if graph.resolve(&candidate).is_some() {
                return Some(candidate);
            }
            metadata.match_label(token).cloned()
        })
        .collect()
}
