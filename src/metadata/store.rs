//! Offline node metadata store.
//!
//! The backing source is a JSON array of records keyed by raw node id;
//! records are canonicalized on load. The store is explicitly
//! `Uninitialized` until `load` succeeds: lookups before that fail with
//! `NotInitialized` instead of silently matching nothing. Frequency ranks
//! missing from the source are derived from raw frequency where available.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use serde::Deserialize;

use crate::error::StoreError;
use crate::graph::canonical::canonicalize_id;
use crate::metadata::labels::{hyphen_join, normalize_label, singularize};
use crate::types::{MetadataSource, NodeId, NodeMetadata};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    id: String,
    label: String,
    #[serde(default)]
    concreteness: Option<f64>,
    #[serde(default)]
    frequency_rank: Option<u32>,
    #[serde(default)]
    frequency: Option<f64>,
    #[serde(default)]
    age_of_acquisition: Option<f64>,
    #[serde(default)]
    curriculum_level: Option<u32>,
    #[serde(default)]
    prerequisites: Vec<String>,
}

/// Immutable view over the loaded metadata, shared between requests.
#[derive(Debug)]
pub struct MetadataSnapshot {
    records: HashMap<NodeId, NodeMetadata>,
    label_index: HashMap<String, NodeId>,
}

impl MetadataSnapshot {
    pub fn get(&self, id: &str) -> Option<&NodeMetadata> {
        self.records.get(id)
    }

    pub fn records(&self) -> &HashMap<NodeId, NodeMetadata> {
        &self.records
    }

    /// Resolves free text to a canonical node id. Tries the normalized
    /// label, then a singularized form, then a hyphen-joined form.
    pub fn match_label(&self, free_text: &str) -> Option<&NodeId> {
        let normalized = normalize_label(free_text);
        if normalized.is_empty() {
            return None;
        }
        self.label_index
            .get(&normalized)
            .or_else(|| self.label_index.get(&singularize(&normalized)))
            .or_else(|| self.label_index.get(&hyphen_join(&normalized)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct Loaded {
    snapshot: Arc<MetadataSnapshot>,
    mtime: Option<SystemTime>,
}

pub struct MetadataStore {
    path: PathBuf,
    inner: RwLock<Option<Loaded>>,
}

impl MetadataStore {
    /// New store in the `Uninitialized` state.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: RwLock::new(None),
        }
    }

    /// Loads the backing file and moves the store to `Ready`.
    pub fn load(&self) -> Result<Arc<MetadataSnapshot>, StoreError> {
        let loaded = self.build()?;
        let snapshot = Arc::clone(&loaded.snapshot);
        *self.inner.write() = Some(loaded);
        tracing::info!(
            records = snapshot.len(),
            path = %self.path.display(),
            "metadata store loaded"
        );
        Ok(snapshot)
    }

    /// Current snapshot; fails fast when `load` has not run.
    pub fn snapshot(&self) -> Result<Arc<MetadataSnapshot>, StoreError> {
        self.inner
            .read()
            .as_ref()
            .map(|loaded| Arc::clone(&loaded.snapshot))
            .ok_or(StoreError::NotInitialized)
    }

    /// Rebuilds when the backing file's mtime changed. Returns true on
    /// rebuild; a store that was never loaded stays uninitialized.
    pub fn refresh_if_stale(&self) -> Result<bool, StoreError> {
        let current_mtime = self.backing_mtime();
        {
            let guard = self.inner.read();
            match guard.as_ref() {
                Some(loaded) if loaded.mtime == current_mtime => return Ok(false),
                None => return Ok(false),
                _ => {}
            }
        }
        let loaded = self.build()?;
        tracing::info!(path = %self.path.display(), "metadata store refreshed");
        *self.inner.write() = Some(loaded);
        Ok(true)
    }

    fn build(&self) -> Result<Loaded, StoreError> {
        let path = &self.path;
        if !path.exists() {
            return Err(StoreError::ResourceNotFound(path.clone()));
        }
        let mtime = self.backing_mtime();
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let raw_records: Vec<RawRecord> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Loaded {
            snapshot: Arc::new(build_snapshot(raw_records)),
            mtime,
        })
    }

    fn backing_mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn build_snapshot(raw_records: Vec<RawRecord>) -> MetadataSnapshot {
    let mut records: HashMap<NodeId, NodeMetadata> = HashMap::new();
    let mut order: Vec<NodeId> = Vec::with_capacity(raw_records.len());

    for raw in raw_records {
        let id = canonicalize_id(&raw.id);
        if records.contains_key(&id) {
            // Variant duplicate; the first record wins.
            continue;
        }
        let metadata = NodeMetadata {
            label: raw.label,
            concreteness: raw.concreteness,
            frequency_rank: raw.frequency_rank,
            frequency: raw.frequency,
            age_of_acquisition: raw.age_of_acquisition,
            curriculum_level: raw.curriculum_level,
            prerequisites: raw
                .prerequisites
                .iter()
                .map(|p| canonicalize_id(p))
                .collect(),
            source: MetadataSource::Cached,
        };
        order.push(id.clone());
        records.insert(id, metadata);
    }

    derive_frequency_ranks(&mut records, &order);

    let mut label_index: HashMap<String, NodeId> = HashMap::new();
    for id in &order {
        let normalized = normalize_label(&records[id].label);
        if !normalized.is_empty() {
            label_index.entry(normalized).or_insert_with(|| id.clone());
        }
    }

    MetadataSnapshot {
        records,
        label_index,
    }
}

/// Assigns sequential ranks to nodes that have a raw frequency but no rank,
/// by descending frequency; ties keep insertion order.
fn derive_frequency_ranks(records: &mut HashMap<NodeId, NodeMetadata>, order: &[NodeId]) {
    let mut unranked: Vec<(NodeId, f64)> = order
        .iter()
        .filter_map(|id| {
            let meta = &records[id];
            match (meta.frequency_rank, meta.frequency) {
                (None, Some(freq)) => Some((id.clone(), freq)),
                _ => None,
            }
        })
        .collect();
    if unranked.is_empty() {
        return;
    }

    // Stable sort: equal frequencies keep their insertion order.
    unranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (rank, (id, _)) in unranked.into_iter().enumerate() {
        if let Some(meta) = records.get_mut(&id) {
            meta.frequency_rank = Some(rank as u32 + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, label: &str) -> RawRecord {
        RawRecord {
            id: id.into(),
            label: label.into(),
            concreteness: None,
            frequency_rank: None,
            frequency: None,
            age_of_acquisition: None,
            curriculum_level: None,
            prerequisites: Vec::new(),
        }
    }

    #[test]
    fn test_uninitialized_lookup_fails_fast() {
        let store = MetadataStore::new("/nonexistent/meta.json");
        assert!(matches!(store.snapshot(), Err(StoreError::NotInitialized)));
    }

    #[test]
    fn test_ids_canonicalized_on_load() {
        let snapshot = build_snapshot(vec![record("word-en-colour", "colour")]);
        assert!(snapshot.get("word-en-color").is_some());
        assert!(snapshot.get("word-en-colour").is_none());
    }

    #[test]
    fn test_label_matching_probes_variants() {
        let snapshot = build_snapshot(vec![
            record("word-en-apple", "apple"),
            record("word-en-ice-cream", "ice-cream"),
        ]);
        assert_eq!(
            snapshot.match_label("Apples").map(String::as_str),
            Some("word-en-apple")
        );
        assert_eq!(
            snapshot.match_label("ice cream").map(String::as_str),
            Some("word-en-ice-cream")
        );
        assert!(snapshot.match_label("pomegranate").is_none());
    }

    #[test]
    fn test_rank_derivation_from_raw_frequency() {
        let mut common = record("word-en-the", "the");
        common.frequency = Some(5000.0);
        let mut rare = record("word-en-zephyr", "zephyr");
        rare.frequency = Some(3.0);
        let mut ranked = record("word-en-cat", "cat");
        ranked.frequency_rank = Some(42);
        ranked.frequency = Some(900.0);

        let snapshot = build_snapshot(vec![rare, common, ranked]);
        assert_eq!(snapshot.get("word-en-the").unwrap().frequency_rank, Some(1));
        assert_eq!(
            snapshot.get("word-en-zephyr").unwrap().frequency_rank,
            Some(2)
        );
        // Explicit ranks are never overwritten.
        assert_eq!(
            snapshot.get("word-en-cat").unwrap().frequency_rank,
            Some(42)
        );
    }

    #[test]
    fn test_rank_derivation_ties_keep_insertion_order() {
        let mut first = record("word-en-alpha", "alpha");
        first.frequency = Some(10.0);
        let mut second = record("word-en-beta", "beta");
        second.frequency = Some(10.0);

        let snapshot = build_snapshot(vec![first, second]);
        assert_eq!(
            snapshot.get("word-en-alpha").unwrap().frequency_rank,
            Some(1)
        );
        assert_eq!(
            snapshot.get("word-en-beta").unwrap().frequency_rank,
            Some(2)
        );
    }
}
