//! Feature scorer: diffusion score + lexical metadata -> calibrated
//! recommend-probability.
//!
//! Features are z-scored against the candidate pool of the current request,
//! combined linearly with the configured betas, and squashed through a
//! sigmoid. Age-of-acquisition is both a soft penalty above the learner's
//! mental age and a hard ceiling at `mental_age + aoa_buffer`.

use std::collections::HashMap;

use crate::config::ScoringConfig;
use crate::types::{Candidate, NodeId, NodeMetadata};

/// Std fallback when a feature has fewer than two pool members.
const DEFAULT_STD: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
struct FeatureStats {
    mean: f64,
    std: f64,
}

impl FeatureStats {
    fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                mean: 0.0,
                std: DEFAULT_STD,
            };
        }
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        if samples.len() < 2 {
            return Self {
                mean,
                std: DEFAULT_STD,
            };
        }
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        let std = variance.sqrt();
        Self {
            mean,
            std: if std > 0.0 { std } else { DEFAULT_STD },
        }
    }

    /// Z-score of a sample; `None` (feature absent) sits at the population
    /// mean, i.e. zero.
    fn zscore(&self, sample: Option<f64>) -> f64 {
        match sample {
            Some(x) => (x - self.mean) / self.std,
            None => 0.0,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn log_diffusion(candidate: &Candidate) -> Option<f64> {
    (candidate.diffusion_score > 0.0).then(|| candidate.diffusion_score.ln())
}

/// Combined frequency signal: rank when present, raw frequency otherwise.
fn frequency_signal(meta: &NodeMetadata) -> Option<f64> {
    if let Some(rank) = meta.frequency_rank {
        return Some(-(rank as f64 + 1.0).log10());
    }
    meta.frequency.map(|freq| (freq + 1.0).log10())
}

/// Scores the pool, dropping candidates over the AoA hard ceiling. Returns
/// the surviving candidates (scores filled in) and the ceiling-excluded
/// count.
pub fn score_candidates(
    candidates: Vec<Candidate>,
    metadata: &HashMap<NodeId, NodeMetadata>,
    mental_age: f64,
    aoa_buffer: f64,
    config: &ScoringConfig,
) -> (Vec<Candidate>, usize) {
    let mut pool = Vec::with_capacity(candidates.len());
    let mut excluded = 0usize;
    for candidate in candidates {
        let aoa = metadata
            .get(&candidate.id)
            .and_then(|meta| meta.age_of_acquisition);
        if matches!(aoa, Some(age) if age > mental_age + aoa_buffer) {
            excluded += 1;
            continue;
        }
        pool.push(candidate);
    }

    let diffusion_samples: Vec<f64> = pool.iter().filter_map(log_diffusion).collect();
    let concreteness_samples: Vec<f64> = pool
        .iter()
        .filter_map(|c| metadata.get(&c.id).and_then(|meta| meta.concreteness))
        .collect();
    let frequency_samples: Vec<f64> = pool
        .iter()
        .filter_map(|c| metadata.get(&c.id).and_then(frequency_signal))
        .collect();

    let diffusion_stats = FeatureStats::from_samples(&diffusion_samples);
    let concreteness_stats = FeatureStats::from_samples(&concreteness_samples);
    let frequency_stats = FeatureStats::from_samples(&frequency_samples);

    for candidate in &mut pool {
        let meta = metadata.get(&candidate.id);
        let concreteness = meta.and_then(|m| m.concreteness);
        let frequency = meta.and_then(frequency_signal);
        let aoa_overshoot = meta
            .and_then(|m| m.age_of_acquisition)
            .map(|age| (age - mental_age).max(0.0))
            .unwrap_or(0.0);

        let z = config.intercept
            + config.beta_diffusion * diffusion_stats.zscore(log_diffusion(candidate))
            + config.beta_concreteness * concreteness_stats.zscore(concreteness)
            + config.beta_frequency * frequency_stats.zscore(frequency)
            - config.beta_aoa_penalty * aoa_overshoot;
        candidate.score = sigmoid(z);
    }

    (pool, excluded)
}
