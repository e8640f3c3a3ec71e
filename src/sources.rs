//! Seams to the collaborators this core consumes.
//!
//! Both stores live outside the crate (conventional persistence, live
//! knowledge service); the orchestrator only needs these two capabilities.

use std::collections::HashMap;

use crate::config::RecommenderConfig;
use crate::types::{ContentType, NodeId, NodeMetadata};

/// Learner profile persistence, owned by the caller.
pub trait ProfileStore {
    /// Free-text mastered items for one profile and language.
    fn mastered_items(&self, profile_id: &str, language: &str) -> Result<Vec<String>, String>;

    fn recommender_config(&self, profile_id: &str) -> Result<RecommenderConfig, String>;
}

/// Live node metadata service. An error or an empty result sends the
/// request down the offline fallback path.
pub trait KnowledgeSource {
    fn fetch_nodes_by_type(
        &self,
        types: &[ContentType],
    ) -> Result<HashMap<NodeId, NodeMetadata>, String>;
}
