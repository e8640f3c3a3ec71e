//! Shared value types for the recommendation funnel.
//!
//! Node ids follow the `{kind}-{lang}-{form}` convention of the similarity
//! source, e.g. `word-en-color` or `grammar-en-past-tense`. The `form`
//! segment is always the canonicalized spelling.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub type NodeId = String;

/// Node mastery levels keyed by canonical id, built fresh per request.
pub type MasteryVector = HashMap<NodeId, f64>;

/// Non-negative seed weights derived from a learner's mastered items.
pub type SeedWeights = HashMap<NodeId, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    Vocabulary,
    Grammar,
}

impl ContentType {
    /// Derives the content type from a node id prefix. Unknown prefixes
    /// count as vocabulary, the dominant kind in the similarity source.
    pub fn from_node_id(id: &str) -> Self {
        if id.starts_with("grammar-") {
            ContentType::Grammar
        } else {
            ContentType::Vocabulary
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub content_type: ContentType,
    pub language: String,
}

/// Provenance of a metadata record. Consumers never branch on this; it
/// exists so degraded responses stay auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetadataSource {
    Live,
    Cached,
    ParsedFallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concreteness: Option<f64>,
    /// Lower rank = more frequent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_of_acquisition: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curriculum_level: Option<u32>,
    #[serde(default)]
    pub prerequisites: Vec<NodeId>,
    #[serde(default = "default_source")]
    pub source: MetadataSource,
}

fn default_source() -> MetadataSource {
    MetadataSource::Cached
}

impl NodeMetadata {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            concreteness: None,
            frequency_rank: None,
            frequency: None,
            age_of_acquisition: None,
            curriculum_level: None,
            prerequisites: Vec::new(),
            source: MetadataSource::Cached,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: NodeId,
    pub label: String,
    pub content_type: ContentType,
    pub language: String,
    pub diffusion_score: f64,
    pub score: f64,
    pub mastery: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curriculum_level: Option<u32>,
    pub prerequisites: Vec<NodeId>,
    pub missing_prereqs: Vec<NodeId>,
}

/// Per-request degradations and counters, accumulated alongside the result
/// rather than aborting it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Mastered-item strings that matched no graph node.
    pub unmatched_items: Vec<String>,
    pub matched_seed_count: usize,
    /// True when the live knowledge source failed or returned empty and the
    /// offline fallback path was used; prerequisite filtering is disabled
    /// in that mode.
    pub degraded_metadata: bool,
    /// Candidates resolved only through the loose fallback id rewrites.
    pub fallback_hits: usize,
    pub excluded_mastered: usize,
    pub excluded_prereqs: usize,
    pub excluded_curriculum: usize,
    pub excluded_aoa_ceiling: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub candidates: Vec<Candidate>,
    pub diagnostics: Diagnostics,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
