//! # lexirank - personalized vocabulary recommendation core
//!
//! Recommends the next vocabulary words and grammar points a learner
//! profile should study, through a three-stage funnel:
//!
//! - **Diffusion** - Personalized PageRank over a precomputed lexical
//!   similarity graph, seeded by the learner's mastered items
//! - **Calibrated scoring** - diffusion score plus lexical metadata
//!   (frequency, concreteness, age of acquisition) z-scored per request and
//!   squashed into one recommend-probability
//! - **Readiness + allocation** - ZPD filtering against mastery and
//!   prerequisite thresholds, then fixed-capacity slot allocation across
//!   the vocabulary/grammar mix
//!
//! The crate is invoked in-process: profile persistence and the live
//! knowledge source are behind the [`sources`] traits, and the long-lived
//! graph/metadata stores refresh wholesale on backing-file changes via
//! [`graph::GraphContext`] and [`metadata::MetadataStore`].

pub mod allocator;
pub mod config;
pub mod error;
pub mod graph;
pub mod mastery;
pub mod metadata;
pub mod readiness;
pub mod recommend;
pub mod scoring;
pub mod sources;
pub mod types;

pub use config::{RecommenderConfig, ScoringConfig, ScoringOverrides};
pub use error::{RecommendError, StoreError};
pub use graph::{GraphContext, LexicalGraph};
pub use metadata::{MetadataSnapshot, MetadataStore};
pub use readiness::ReadinessState;
pub use recommend::Recommender;
pub use sources::{KnowledgeSource, ProfileStore};
pub use types::{
    Candidate, ContentType, Diagnostics, MasteryVector, MetadataSource, NodeMetadata,
    Recommendation, SeedWeights,
};
