//! Recommender and scoring configuration.
//!
//! Invalid values never raise: non-positive capacity and zero/negative
//! ratios fall back to safe defaults at normalization time.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DAILY_CAPACITY: usize = 20;
pub const DEFAULT_ALPHA: f64 = 0.5;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.0;
pub const DEFAULT_TOP_N: usize = 50;
pub const DEFAULT_AOA_BUFFER: f64 = 2.0;
pub const DEFAULT_MENTAL_AGE: f64 = 10.0;
pub const DEFAULT_MASTERY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_PREREQ_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommenderConfig {
    pub daily_capacity: usize,
    pub vocab_ratio: f64,
    pub grammar_ratio: f64,
    /// Teleport probability of the diffusion walk. Lower values stay closer
    /// to the learner's existing neighborhood.
    pub alpha: f64,
    pub min_similarity: f64,
    /// Drop candidates whose label contains more than one token.
    pub exclude_multiword: bool,
    /// Per-pool cap applied before slot allocation.
    pub top_n: usize,
    pub mental_age: f64,
    pub aoa_buffer: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_curriculum_level: Option<u32>,
    pub mastery_threshold: f64,
    pub prereq_threshold: f64,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            daily_capacity: DEFAULT_DAILY_CAPACITY,
            vocab_ratio: 0.5,
            grammar_ratio: 0.5,
            alpha: DEFAULT_ALPHA,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            exclude_multiword: true,
            top_n: DEFAULT_TOP_N,
            mental_age: DEFAULT_MENTAL_AGE,
            aoa_buffer: DEFAULT_AOA_BUFFER,
            max_curriculum_level: None,
            mastery_threshold: DEFAULT_MASTERY_THRESHOLD,
            prereq_threshold: DEFAULT_PREREQ_THRESHOLD,
            scoring: ScoringConfig::defaults(),
        }
    }
}

impl RecommenderConfig {
    /// Replaces out-of-range values with defaults instead of raising.
    pub fn normalized(mut self) -> Self {
        if self.daily_capacity == 0 {
            self.daily_capacity = DEFAULT_DAILY_CAPACITY;
        }
        if !(0.0..=1.0).contains(&self.alpha) || self.alpha == 0.0 {
            self.alpha = DEFAULT_ALPHA;
        }
        if self.vocab_ratio < 0.0 || !self.vocab_ratio.is_finite() {
            self.vocab_ratio = 0.0;
        }
        if self.grammar_ratio < 0.0 || !self.grammar_ratio.is_finite() {
            self.grammar_ratio = 0.0;
        }
        if self.top_n == 0 {
            self.top_n = DEFAULT_TOP_N;
        }
        if self.aoa_buffer < 0.0 || !self.aoa_buffer.is_finite() {
            self.aoa_buffer = DEFAULT_AOA_BUFFER;
        }
        // A NaN mental age would defeat the AoA hard-ceiling comparison and
        // poison every calibrated score.
        if self.mental_age <= 0.0 || !self.mental_age.is_finite() {
            self.mental_age = DEFAULT_MENTAL_AGE;
        }
        if !(0.0..=1.0).contains(&self.mastery_threshold) || self.mastery_threshold == 0.0 {
            self.mastery_threshold = DEFAULT_MASTERY_THRESHOLD;
        }
        if !(0.0..=1.0).contains(&self.prereq_threshold) || self.prereq_threshold == 0.0 {
            self.prereq_threshold = DEFAULT_PREREQ_THRESHOLD;
        }
        self
    }
}

/// Calibration coefficients for the feature scorer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub intercept: f64,
    pub beta_diffusion: f64,
    pub beta_concreteness: f64,
    pub beta_frequency: f64,
    pub beta_aoa_penalty: f64,
}

impl ScoringConfig {
    pub fn defaults() -> Self {
        Self {
            intercept: 0.0,
            beta_diffusion: 1.0,
            beta_concreteness: 0.8,
            beta_frequency: 0.3,
            beta_aoa_penalty: 2.0,
        }
    }

    /// Applies field-level overrides on top of `self`.
    pub fn merged_with(self, overrides: ScoringOverrides) -> Self {
        Self {
            intercept: overrides.intercept.unwrap_or(self.intercept),
            beta_diffusion: overrides.beta_diffusion.unwrap_or(self.beta_diffusion),
            beta_concreteness: overrides
                .beta_concreteness
                .unwrap_or(self.beta_concreteness),
            beta_frequency: overrides.beta_frequency.unwrap_or(self.beta_frequency),
            beta_aoa_penalty: overrides.beta_aoa_penalty.unwrap_or(self.beta_aoa_penalty),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOverrides {
    pub intercept: Option<f64>,
    pub beta_diffusion: Option<f64>,
    pub beta_concreteness: Option<f64>,
    pub beta_frequency: Option<f64>,
    pub beta_aoa_penalty: Option<f64>,
}
