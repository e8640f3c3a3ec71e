//! Lexical similarity graph: load, canonicalize, and index.
//!
//! The backing source is a JSON edge list over raw node ids. Every raw id is
//! canonicalized before insertion, so spelling variants collapse into one
//! node; duplicate edges produced by that merge keep the maximum weight.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::StoreError;
use crate::graph::canonical::canonicalize_id;
use crate::types::{ContentType, Node, NodeId};

#[derive(Debug, Deserialize)]
struct RawEdge {
    source: String,
    target: String,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    edges: Vec<RawEdge>,
}

/// Immutable, index-addressed adjacency structure shared between requests.
#[derive(Debug)]
pub struct LexicalGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl LexicalGraph {
    /// Loads and canonicalizes the similarity graph, dropping self-loops
    /// and edges below `min_similarity`.
    pub fn load(path: &Path, min_similarity: f64) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::ResourceNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: GraphDocument =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let graph = Self::from_edges(document.edges, min_similarity);
        if graph.is_empty() {
            return Err(StoreError::EmptyGraph(path.to_path_buf()));
        }
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            path = %path.display(),
            "lexical graph loaded"
        );
        Ok(graph)
    }

    fn from_edges(edges: Vec<RawEdge>, min_similarity: f64) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
        };
        // Keyed by ordered index pair; variant merging keeps the max weight.
        let mut merged: HashMap<(usize, usize), f64> = HashMap::new();

        for edge in edges {
            if !edge.weight.is_finite() || edge.weight < min_similarity {
                continue;
            }
            let weight = edge.weight.clamp(0.0, 1.0);
            let source = graph.intern(&edge.source);
            let target = graph.intern(&edge.target);
            if source == target {
                continue;
            }
            let key = (source.min(target), source.max(target));
            let entry = merged.entry(key).or_insert(weight);
            if weight > *entry {
                *entry = weight;
            }
        }

        for ((a, b), weight) in merged {
            graph.adjacency[a].push((b, weight));
            graph.adjacency[b].push((a, weight));
        }
        for neighbors in &mut graph.adjacency {
            neighbors.sort_by_key(|(idx, _)| *idx);
        }
        graph
    }

    fn intern(&mut self, raw_id: &str) -> usize {
        let id = canonicalize_id(raw_id);
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(node_from_id(&id));
        self.index.insert(id, idx);
        self.adjacency.push(Vec::new());
        idx
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Index of a canonical id, if present.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Index lookup that canonicalizes the raw id first.
    pub fn resolve(&self, raw_id: &str) -> Option<usize> {
        self.node_index(&canonicalize_id(raw_id))
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn neighbors(&self, idx: usize) -> &[(usize, f64)] {
        &self.adjacency[idx]
    }

    pub fn total_weight(&self, idx: usize) -> f64 {
        self.adjacency[idx].iter().map(|(_, w)| w).sum()
    }
}

fn node_from_id(id: &str) -> Node {
    let mut parts = id.splitn(3, '-');
    let (lang, form) = match (parts.next(), parts.next(), parts.next()) {
        (Some(_kind), Some(lang), Some(form)) => (lang, form),
        _ => ("en", id),
    };
    Node {
        id: id.to_string(),
        label: form.replace('-', " "),
        content_type: ContentType::from_node_id(id),
        language: lang.to_string(),
    }
}
