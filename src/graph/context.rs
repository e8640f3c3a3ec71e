//! Injectable owner of the long-lived graph snapshot.
//!
//! The graph is built lazily on first use and rebuilt wholesale when the
//! backing file's mtime changes. Readers always hold an `Arc` to either the
//! old or the new structure, never a partial rebuild.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::graph::store::LexicalGraph;

struct LoadedGraph {
    graph: Arc<LexicalGraph>,
    mtime: Option<SystemTime>,
}

pub struct GraphContext {
    path: PathBuf,
    min_similarity: f64,
    inner: RwLock<Option<LoadedGraph>>,
}

impl GraphContext {
    pub fn new(path: impl Into<PathBuf>, min_similarity: f64) -> Self {
        Self {
            path: path.into(),
            min_similarity,
            inner: RwLock::new(None),
        }
    }

    /// Current graph snapshot, building it on first use.
    pub fn snapshot(&self) -> Result<Arc<LexicalGraph>, StoreError> {
        if let Some(loaded) = self.inner.read().as_ref() {
            return Ok(Arc::clone(&loaded.graph));
        }
        let mut guard = self.inner.write();
        if let Some(loaded) = guard.as_ref() {
            return Ok(Arc::clone(&loaded.graph));
        }
        let loaded = self.build()?;
        let graph = Arc::clone(&loaded.graph);
        *guard = Some(loaded);
        Ok(graph)
    }

    /// Rebuilds the graph if the backing file changed since the last load.
    /// Returns true when a rebuild happened.
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
        tracing::info!(path = %self.path.display(), "lexical graph refreshed");
        *self.inner.write() = Some(loaded);
        Ok(true)
    }

    fn build(&self) -> Result<LoadedGraph, StoreError> {
        let mtime = self.backing_mtime();
        let graph = LexicalGraph::load(&self.path, self.min_similarity)?;
        Ok(LoadedGraph {
            graph: Arc::new(graph),
            mtime,
        })
    }

    fn backing_mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
    }
}
