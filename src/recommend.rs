//! Recommendation orchestrator.
//!
//! Wires the funnel per request: mastered items -> seeds -> diffusion ->
//! metadata assembly (live, with offline fallback) -> calibrated scoring ->
//! readiness filter -> slot allocation. Store construction failures are
//! hard errors; everything per-request degrades into diagnostics.

use std::collections::HashMap;

use crate::allocator;
use crate::config::RecommenderConfig;
use crate::error::{RecommendError, StoreError};
use crate::graph::diffusion::{build_personalization, personalized_pagerank};
use crate::graph::{GraphContext, LexicalGraph};
use crate::mastery::build_mastery_vector;
use crate::metadata::fallback::{fallback_lookup, FallbackMatch};
use crate::metadata::labels::{hyphen_join, normalize_label};
use crate::metadata::{MetadataSnapshot, MetadataStore};
use crate::readiness;
use crate::scoring::score_candidates;
use crate::sources::{KnowledgeSource, ProfileStore};
use crate::types::{
    Candidate, ContentType, Diagnostics, MetadataSource, NodeId, NodeMetadata, Recommendation,
    SeedWeights,
};

pub struct Recommender<P, K> {
    graph: GraphContext,
    metadata: MetadataStore,
    profiles: P,
    knowledge: K,
}

impl<P: ProfileStore, K: KnowledgeSource> Recommender<P, K> {
    pub fn new(graph: GraphContext, metadata: MetadataStore, profiles: P, knowledge: K) -> Self {
        Self {
            graph,
            metadata,
            profiles,
            knowledge,
        }
    }

    /// Revalidates both long-lived stores against their backing files.
    pub fn refresh_if_stale(&self) -> Result<(), StoreError> {
        self.graph.refresh_if_stale()?;
        self.metadata.refresh_if_stale()?;
        Ok(())
    }

    pub fn recommend(
        &self,
        profile_id: &str,
        language: &str,
    ) -> Result<Recommendation, RecommendError> {
        let config = self
            .profiles
            .recommender_config(profile_id)
            .map_err(RecommendError::Profile)?
            .normalized();

        let graph = self.graph.snapshot()?;
        let metadata = self.offline_metadata()?;

        let mut diagnostics = Diagnostics::default();

        let mastered = self
            .profiles
            .mastered_items(profile_id, language)
            .map_err(RecommendError::Profile)?;
        if mastered.is_empty() {
            tracing::debug!(profile_id, "no mastered items, empty recommendation");
            return Ok(empty_recommendation(diagnostics));
        }

        let seed_ids = match_mastered_items(&mastered, language, &metadata, &graph, &mut diagnostics);
        if seed_ids.is_empty() {
            tracing::info!(
                profile_id,
                unmatched = diagnostics.unmatched_items.len(),
                "no mastered item maps to a graph node"
            );
            return Ok(empty_recommendation(diagnostics));
        }
        diagnostics.matched_seed_count = seed_ids.len();

        let seeds: SeedWeights = seed_ids.iter().map(|id| (id.clone(), 1.0)).collect();
        let personalization = match build_personalization(&graph, &seeds) {
            Ok(p) => p,
            Err(RecommendError::EmptySeedSet) => {
                return Ok(empty_recommendation(diagnostics));
            }
            Err(err) => return Err(err),
        };
        let scores = personalized_pagerank(&graph, &personalization, config.alpha);

        let mastery = build_mastery_vector(&seed_ids, &metadata, &graph);

        let mut candidates = assemble_candidates(&graph, &scores, language, &config, &seeds);
        tracing::debug!(
            profile_id,
            pool = candidates.len(),
            seeds = seed_ids.len(),
            "candidate pool generated"
        );

        let (meta_by_id, prereqs_available) =
            self.resolve_metadata(&candidates, &metadata, &mut diagnostics);
        for candidate in &mut candidates {
            if let Some(meta) = meta_by_id.get(&candidate.id) {
                if !meta.label.is_empty() {
                    candidate.label = meta.label.clone();
                }
                candidate.curriculum_level = meta.curriculum_level;
                candidate.prerequisites = meta.prerequisites.clone();
            }
            candidate.mastery = mastery.get(&candidate.id).copied().unwrap_or(0.0);
        }

        let (scored, excluded_aoa) = score_candidates(
            candidates,
            &meta_by_id,
            config.mental_age,
            config.aoa_buffer,
            &config.scoring,
        );
        diagnostics.excluded_aoa_ceiling = excluded_aoa;

        let eligible = readiness::filter_ready(
            scored,
            &mastery,
            &config,
            prereqs_available,
            &mut diagnostics,
        );

        let (mut vocab, mut grammar): (Vec<Candidate>, Vec<Candidate>) = eligible
            .into_iter()
            .partition(|c| c.content_type == ContentType::Vocabulary);
        sort_and_cap(&mut vocab, config.top_n);
        sort_and_cap(&mut grammar, config.top_n);

        let selected = allocator::allocate(
            vocab,
            grammar,
            config.daily_capacity,
            config.vocab_ratio,
            config.grammar_ratio,
        );
        debug_assert!(selected.len() <= config.daily_capacity);

        tracing::info!(
            profile_id,
            selected = selected.len(),
            degraded = diagnostics.degraded_metadata,
            "recommendation produced"
        );
        Ok(Recommendation {
            candidates: selected,
            diagnostics,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Offline metadata snapshot, loading the store on first use.
    fn offline_metadata(&self) -> Result<std::sync::Arc<MetadataSnapshot>, StoreError> {
        match self.metadata.snapshot() {
            Ok(snapshot) => Ok(snapshot),
            Err(StoreError::NotInitialized) => self.metadata.load(),
            Err(err) => Err(err),
        }
    }

    /// Fetches live metadata for the pool, falling back to the offline
    /// cache with loose id matching when the live source errors or comes
    /// back empty. The fallback carries no prerequisite data.
    fn resolve_metadata(
        &self,
        candidates: &[Candidate],
        offline: &MetadataSnapshot,
        diagnostics: &mut Diagnostics,
    ) -> (HashMap<NodeId, NodeMetadata>, bool) {
        let live = match self
            .knowledge
            .fetch_nodes_by_type(&[ContentType::Vocabulary, ContentType::Grammar])
        {
            Ok(nodes) if !nodes.is_empty() => Some(nodes),
            Ok(_) => {
                tracing::warn!("knowledge source returned no nodes, using offline fallback");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "knowledge source unavailable, using offline fallback");
                None
            }
        };

        let mut meta_by_id = HashMap::with_capacity(candidates.len());
        match live {
            Some(nodes) => {
                let live_by_id: HashMap<NodeId, NodeMetadata> = nodes
                    .into_iter()
                    .map(|(id, mut meta)| {
                        meta.source = MetadataSource::Live;
                        meta.prerequisites = meta
                            .prerequisites
                            .iter()
                            .map(|p| crate::graph::canonical::canonicalize_id(p))
                            .collect();
                        (crate::graph::canonical::canonicalize_id(&id), meta)
                    })
                    .collect();
                for candidate in candidates {
                    if let Some(meta) = live_by_id.get(&candidate.id) {
                        meta_by_id.insert(candidate.id.clone(), meta.clone());
                    } else if let Some(meta) = offline.get(&candidate.id) {
                        meta_by_id.insert(candidate.id.clone(), meta.clone());
                    }
                }
                (meta_by_id, true)
            }
            None => {
                diagnostics.degraded_metadata = true;
                for candidate in candidates {
                    if let Some((meta, matched)) = fallback_lookup(offline, &candidate.id) {
                        if matched != FallbackMatch::Exact {
                            diagnostics.fallback_hits += 1;
                        }
                        meta_by_id.insert(candidate.id.clone(), meta);
                    }
                }
                (meta_by_id, false)
            }
        }
    }
}

fn empty_recommendation(diagnostics: Diagnostics) -> Recommendation {
    Recommendation {
        candidates: Vec::new(),
        diagnostics,
        generated_at: chrono::Utc::now(),
    }
}

/// Maps free-text mastered items onto canonical graph nodes. Unmatched
/// strings are reported, never fatal.
fn match_mastered_items(
    items: &[String],
    language: &str,
    metadata: &MetadataSnapshot,
    graph: &LexicalGraph,
    diagnostics: &mut Diagnostics,
) -> Vec<NodeId> {
    let mut seen = std::collections::HashSet::new();
    let mut seeds = Vec::new();
    for item in items {
        let matched = metadata
            .match_label(item)
            .cloned()
            .or_else(|| direct_id_probe(item, language, graph));
        match matched {
            Some(id) if graph.resolve(&id).is_some() => {
                if seen.insert(id.clone()) {
                    seeds.push(id);
                }
            }
            _ => diagnostics.unmatched_items.push(item.clone()),
        }
    }
    seeds
}

/// Second-chance probe: build a node id straight from the normalized text.
fn direct_id_probe(item: &str, language: &str, graph: &LexicalGraph) -> Option<NodeId> {
    let normalized = normalize_label(item);
    if normalized.is_empty() {
        return None;
    }
    let form = hyphen_join(&normalized);
    let id = format!("word-{language}-{form}");
    graph.resolve(&id).map(|idx| graph.node(idx).id.clone())
}

/// Builds the scoring pool from the diffusion output. Seed nodes are
/// skipped here, before population statistics are taken: they carry the
/// teleport mass by construction and would skew every per-request mean and
/// std the scorer normalizes against.
fn assemble_candidates(
    graph: &LexicalGraph,
    scores: &[f64],
    language: &str,
    config: &RecommenderConfig,
    seeds: &SeedWeights,
) -> Vec<Candidate> {
    graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| !seeds.contains_key(&node.id))
        .filter(|(_, node)| node.language == language)
        .filter(|(idx, _)| scores[*idx] > 0.0)
        .filter(|(_, node)| {
            // Grammar-point labels are naturally multi-token; the
            // multiword exclusion targets vocabulary phrases only.
            !(config.exclude_multiword
                && node.content_type == ContentType::Vocabulary
                && node.label.contains(' '))
        })
        .map(|(idx, node)| Candidate {
            id: node.id.clone(),
            label: node.label.clone(),
            content_type: node.content_type,
            language: node.language.clone(),
            diffusion_score: scores[idx],
            score: 0.0,
            mastery: 0.0,
            curriculum_level: None,
            prerequisites: Vec::new(),
            missing_prereqs: Vec::new(),
        })
        .collect()
}

fn sort_and_cap(pool: &mut Vec<Candidate>, top_n: usize) {
    pool.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pool.truncate(top_n);
}
