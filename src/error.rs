use std::path::PathBuf;

/// Errors raised while building the long-lived graph / metadata stores.
///
/// Store construction failures are hard failures: they propagate to the
/// caller and are not retried within the call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backing resource not found: {0}")]
    ResourceNotFound(PathBuf),
    #[error("similarity source produced an empty graph: {0}")]
    EmptyGraph(PathBuf),
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("metadata store used before load")]
    NotInitialized,
}

/// Per-request errors from the recommendation funnel.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("profile store error: {0}")]
    Profile(String),
    #[error("personalization vector has no seeds present in the graph")]
    EmptySeedSet,
}
