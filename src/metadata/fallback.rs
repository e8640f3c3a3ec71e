//! Degraded-mode metadata resolution.
//!
//! When the live knowledge source errors or returns nothing, candidates are
//! resolved against the offline cache with progressively looser id
//! matching: exact, then the legacy `lex-`/`gram-` prefixes older cache
//! exports used, then the alternate `{lang}:{form}` namespace. Records
//! found this way carry no prerequisite data and are tagged
//! `ParsedFallback` so the degradation stays visible downstream.

use crate::metadata::store::MetadataSnapshot;
use crate::types::{MetadataSource, NodeMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMatch {
    Exact,
    LegacyPrefix,
    AlternateNamespace,
}

/// Rewrites a canonical id into the legacy-prefix form.
fn legacy_prefix(id: &str) -> Option<String> {
    id.strip_prefix("word-")
        .map(|rest| format!("lex-{rest}"))
        .or_else(|| id.strip_prefix("grammar-").map(|rest| format!("gram-{rest}")))
}

/// Rewrites a canonical id into the alternate `{lang}:{form}` namespace.
fn alternate_namespace(id: &str) -> Option<String> {
    let mut parts = id.splitn(3, '-');
    let (_kind, lang, form) = (parts.next()?, parts.next()?, parts.next()?);
    Some(format!("{lang}:{form}"))
}

/// Looks a node up in the offline cache, loosening the match stepwise.
/// Prerequisites are dropped: one-hop filtering is meaningless against
/// stale fallback data, so degraded candidates pass readiness by default.
pub fn fallback_lookup(
    cache: &MetadataSnapshot,
    id: &str,
) -> Option<(NodeMetadata, FallbackMatch)> {
    let (record, matched) = if let Some(record) = cache.get(id) {
        (record, FallbackMatch::Exact)
    } else if let Some(record) = legacy_prefix(id).and_then(|key| cache.get(&key)) {
        (record, FallbackMatch::LegacyPrefix)
    } else if let Some(record) = alternate_namespace(id).and_then(|key| cache.get(&key)) {
        (record, FallbackMatch::AlternateNamespace)
    } else {
        return None;
    };

    let mut metadata = record.clone();
    metadata.source = MetadataSource::ParsedFallback;
    metadata.prerequisites.clear();
    Some((metadata, matched))
}
