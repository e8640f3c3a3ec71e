//! Readiness (ZPD) filter.
//!
//! A candidate proceeds only when it is neither already mastered, nor past
//! the curriculum ceiling, nor missing prerequisite mastery. Prerequisite
//! checking is one-hop only; the prerequisite graph carries no acyclicity
//! guarantee, and one hop never follows it far enough to care.

use serde::Serialize;

use crate::config::RecommenderConfig;
use crate::types::{Candidate, Diagnostics, MasteryVector, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadinessState {
    Eligible,
    AlreadyMastered,
    PrerequisitesUnmet(Vec<NodeId>),
    CurriculumTooAdvanced,
}

/// Classifies one candidate. `prereqs_available` is false in degraded
/// metadata mode, where prerequisite data does not exist and the check
/// passes by default.
pub fn classify(
    candidate: &Candidate,
    mastery: &MasteryVector,
    config: &RecommenderConfig,
    prereqs_available: bool,
) -> ReadinessState {
    if candidate.mastery >= config.mastery_threshold {
        return ReadinessState::AlreadyMastered;
    }

    if let (Some(ceiling), Some(level)) = (config.max_curriculum_level, candidate.curriculum_level)
    {
        if level > ceiling {
            return ReadinessState::CurriculumTooAdvanced;
        }
    }

    if prereqs_available {
        let missing: Vec<NodeId> = candidate
            .prerequisites
            .iter()
            .filter(|prereq| {
                mastery.get(*prereq).copied().unwrap_or(0.0) < config.prereq_threshold
            })
            .cloned()
            .collect();
        if !missing.is_empty() {
            return ReadinessState::PrerequisitesUnmet(missing);
        }
    }

    ReadinessState::Eligible
}

/// Keeps eligible candidates, recording missing prerequisites on the
/// candidate and exclusion counts in the diagnostics.
pub fn filter_ready(
    candidates: Vec<Candidate>,
    mastery: &MasteryVector,
    config: &RecommenderConfig,
    prereqs_available: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<Candidate> {
    let mut eligible = Vec::with_capacity(candidates.len());
    for mut candidate in candidates {
        match classify(&candidate, mastery, config, prereqs_available) {
            ReadinessState::Eligible => eligible.push(candidate),
            ReadinessState::AlreadyMastered => diagnostics.excluded_mastered += 1,
            ReadinessState::CurriculumTooAdvanced => diagnostics.excluded_curriculum += 1,
            ReadinessState::PrerequisitesUnmet(missing) => {
                candidate.missing_prereqs = missing;
                diagnostics.excluded_prereqs += 1;
                tracing::debug!(
                    id = %candidate.id,
                    missing = candidate.missing_prereqs.len(),
                    "candidate dropped on unmet prerequisites"
                );
            }
        }
    }
    eligible
}
