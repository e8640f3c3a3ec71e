//! Shared fixtures: a small color-themed lexical world plus in-memory
//! profile / knowledge-source doubles.

use std::collections::HashMap;

use lexirank::{
    ContentType, GraphContext, KnowledgeSource, MetadataStore, NodeMetadata, ProfileStore,
    RecommenderConfig,
};
use tempfile::TempDir;

pub const GRAPH_JSON: &str = r#"{"edges": [
    {"source": "word-en-colour", "target": "word-en-hue", "weight": 0.9},
    {"source": "word-en-hue", "target": "word-en-shade", "weight": 0.9},
    {"source": "word-en-color", "target": "word-en-paint", "weight": 0.7},
    {"source": "word-en-colour", "target": "word-en-crimson", "weight": 0.6},
    {"source": "word-en-paint", "target": "word-en-rainbow", "weight": 0.4},
    {"source": "word-en-color", "target": "word-en-mauve", "weight": 0.5},
    {"source": "word-en-color", "target": "grammar-en-adjective-order", "weight": 0.3},
    {"source": "grammar-en-adjective-order", "target": "grammar-en-past-tense", "weight": 0.5}
]}"#;

pub const METADATA_JSON: &str = r#"[
    {"id": "word-en-colour", "label": "colour", "concreteness": 4.0, "frequencyRank": 800, "ageOfAcquisition": 4.0, "curriculumLevel": 1},
    {"id": "word-en-hue", "label": "hue", "concreteness": 3.5, "frequencyRank": 6000, "ageOfAcquisition": 9.0, "curriculumLevel": 2},
    {"id": "word-en-shade", "label": "shade", "concreteness": 4.1, "frequencyRank": 3000, "ageOfAcquisition": 6.5, "curriculumLevel": 2},
    {"id": "word-en-paint", "label": "paint", "concreteness": 4.8, "frequencyRank": 1500, "ageOfAcquisition": 4.5, "curriculumLevel": 1},
    {"id": "word-en-rainbow", "label": "rainbow", "concreteness": 4.9, "frequencyRank": 4000, "ageOfAcquisition": 5.0, "curriculumLevel": 1},
    {"id": "word-en-crimson", "label": "crimson", "concreteness": 3.9, "frequencyRank": 9000, "ageOfAcquisition": 9.5, "curriculumLevel": 3, "prerequisites": ["word-en-paint"]},
    {"id": "lex-en-mauve", "label": "mauve", "concreteness": 3.8, "frequencyRank": 12000, "ageOfAcquisition": 10.0, "curriculumLevel": 3},
    {"id": "grammar-en-adjective-order", "label": "adjective order", "ageOfAcquisition": 8.0, "curriculumLevel": 2},
    {"id": "grammar-en-past-tense", "label": "past tense", "ageOfAcquisition": 6.0, "curriculumLevel": 1}
]"#;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("graph.json"), GRAPH_JSON).unwrap();
        std::fs::write(dir.path().join("metadata.json"), METADATA_JSON).unwrap();
        Self { dir }
    }

    pub fn graph_context(&self) -> GraphContext {
        GraphContext::new(self.dir.path().join("graph.json"), 0.0)
    }

    pub fn metadata_store(&self) -> MetadataStore {
        MetadataStore::new(self.dir.path().join("metadata.json"))
    }
}

pub struct FixtureProfiles {
    pub mastered: Vec<String>,
    pub config: RecommenderConfig,
}

impl FixtureProfiles {
    pub fn mastering(items: &[&str]) -> Self {
        Self {
            mastered: items.iter().map(|s| s.to_string()).collect(),
            config: RecommenderConfig::default(),
        }
    }
}

impl ProfileStore for FixtureProfiles {
    fn mastered_items(&self, _profile_id: &str, _language: &str) -> Result<Vec<String>, String> {
        Ok(self.mastered.clone())
    }

    fn recommender_config(&self, _profile_id: &str) -> Result<RecommenderConfig, String> {
        Ok(self.config.clone())
    }
}

/// Live source serving the fixture metadata (with prerequisites intact).
pub struct LiveKnowledge;

impl KnowledgeSource for LiveKnowledge {
    fn fetch_nodes_by_type(
        &self,
        _types: &[ContentType],
    ) -> Result<HashMap<String, NodeMetadata>, String> {
        let records: Vec<serde_json::Value> = serde_json::from_str(METADATA_JSON).unwrap();
        let mut nodes = HashMap::new();
        for record in records {
            let id = record["id"].as_str().unwrap().to_string();
            if id.starts_with("lex-") {
                // The legacy-prefixed record only exists in the offline cache.
                continue;
            }
            let meta: NodeMetadata = serde_json::from_value(record).unwrap();
            nodes.insert(id, meta);
        }
        Ok(nodes)
    }
}

/// Live source that is down.
pub struct UnreachableKnowledge;

impl KnowledgeSource for UnreachableKnowledge {
    fn fetch_nodes_by_type(
        &self,
        _types: &[ContentType],
    ) -> Result<HashMap<String, NodeMetadata>, String> {
        Err("connection refused".to_string())
    }
}

/// Live source that answers with nothing.
pub struct EmptyKnowledge;

impl KnowledgeSource for EmptyKnowledge {
    fn fetch_nodes_by_type(
        &self,
        _types: &[ContentType],
    ) -> Result<HashMap<String, NodeMetadata>, String> {
        Ok(HashMap::new())
    }
}
