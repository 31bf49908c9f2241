//! Weighted composite risk score, category banding, per-vessel cache.
//!
//! The composite is `age * 0.4 + history * 0.4 + mou * 0.2`, each factor
//! clamped to 0..100 before combination and the result clamped again.
//! Same inputs always produce the same score.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::factors;
use crate::vessel::{InspectionAnalytics, InspectionSummary, VesselMaster, VesselRecord};

/// Fixed factor weights. These sum to 1.0 and are never vessel-dependent.
pub const AGE_WEIGHT: f64 = 0.4;
pub const HISTORY_WEIGHT: f64 = 0.4;
pub const MOU_WEIGHT: f64 = 0.2;

/// Half-width of the reported confidence interval, in score points.
const CONFIDENCE_MARGIN: f64 = 5.0;

/// Banded classification of the composite score.
///
/// Ordering follows severity, so category comparisons (scenario
/// improved/worsened tallies) are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    /// Category for a composite score. Thresholds are inclusive-upper:
    /// 25.0 is still LOW, 25.01 is MEDIUM.
    pub fn from_score(score: f64) -> Self {
        if score <= 25.0 {
            Self::Low
        } else if score <= 50.0 {
            Self::Medium
        } else if score <= 75.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three factors and their fixed weights, as fed to the composite.
/// Factors are kept at full precision; only the reported score rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub age_factor: f64,
    pub history_factor: f64,
    pub mou_factor: f64,
    pub age_weight: f64,
    pub history_weight: f64,
    pub mou_weight: f64,
}

/// Denormalized vessel attributes carried on each assessment so that
/// downstream consumers (matrix bucketing, fleet rules) need no second
/// lookup into the master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselSnapshot {
    pub age_years: f64,
    pub built_year: u32,
    pub vessel_type: String,
    pub flag_state: String,
    pub classification_society: String,
    pub dwt: f64,
}

/// Complete per-vessel risk assessment. Transient; recomputed per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub vessel_name: String,
    /// Composite score in 0..100, rounded to one decimal.
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    /// Score plus/minus a fixed margin, clamped to 0..100.
    pub confidence_interval: (f64, f64),
    pub factor_breakdown: FactorBreakdown,
    pub vessel_info: VesselSnapshot,
}

/// Scoring failure taxonomy. Reported per vessel; a batch never aborts
/// because one name fails to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// Vessel absent from the master dataset.
    VesselNotFound(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::VesselNotFound(name) => {
                write!(f, "vessel {} not found in master data", name)
            }
        }
    }
}

impl std::error::Error for ScoreError {}

/// Combine the three factors with the fixed weights. Inputs and output
/// are clamped to 0..100.
pub fn composite_score(age: f64, history: f64, mou: f64) -> f64 {
    let a = age.clamp(0.0, 100.0);
    let h = history.clamp(0.0, 100.0);
    let m = mou.clamp(0.0, 100.0);
    (a * AGE_WEIGHT + h * HISTORY_WEIGHT + m * MOU_WEIGHT).clamp(0.0, 100.0)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assess one vessel from its record and optional inspection summary.
/// Pure; this is the single place the composite is assembled.
pub fn compute_assessment(
    vessel: &VesselRecord,
    history: Option<&InspectionSummary>,
) -> RiskAssessment {
    let age = factors::age_factor(vessel.age_years);
    let hist = factors::history_factor(history);
    let mou = factors::mou_factor(vessel);
    let score = composite_score(age, hist, mou);

    RiskAssessment {
        vessel_name: vessel.vessel_name.clone(),
        risk_score: round1(score),
        // category comes from the unrounded composite
        risk_category: RiskCategory::from_score(score),
        confidence_interval: (
            (score - CONFIDENCE_MARGIN).max(0.0),
            (score + CONFIDENCE_MARGIN).min(100.0),
        ),
        factor_breakdown: FactorBreakdown {
            age_factor: age,
            history_factor: hist,
            mou_factor: mou,
            age_weight: AGE_WEIGHT,
            history_weight: HISTORY_WEIGHT,
            mou_weight: MOU_WEIGHT,
        },
        vessel_info: VesselSnapshot {
            age_years: vessel.age_years,
            built_year: vessel.built_year,
            vessel_type: vessel.vessel_type.clone(),
            flag_state: vessel.flag_state.clone(),
            classification_society: vessel.classification_society.clone(),
            dwt: vessel.dwt,
        },
    }
}

/// Score a vessel by name against the master and analytics datasets.
pub fn score_vessel(
    master: &VesselMaster,
    analytics: &InspectionAnalytics,
    name: &str,
) -> Result<RiskAssessment, ScoreError> {
    let vessel = master
        .get(name)
        .ok_or_else(|| ScoreError::VesselNotFound(name.to_string()))?;
    Ok(compute_assessment(vessel, analytics.get(name)))
}

/// Last-computed assessment per vessel name. Purely an optimization for
/// callers that re-request the same vessel; there is no invalidation,
/// so it is only valid while the input datasets stay untouched.
#[derive(Debug, Clone, Default)]
pub struct ScoreCache {
    entries: HashMap<String, RiskAssessment>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RiskAssessment> {
        self.entries.get(name)
    }

    pub fn store(&mut self, assessment: RiskAssessment) {
        self.entries
            .insert(assessment.vessel_name.clone(), assessment);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Score a vessel, consulting and filling the injected cache.
pub fn score_vessel_cached(
    master: &VesselMaster,
    analytics: &InspectionAnalytics,
    name: &str,
    cache: &mut ScoreCache,
) -> Result<RiskAssessment, ScoreError> {
    if let Some(hit) = cache.get(name) {
        return Ok(hit.clone());
    }
    let assessment = score_vessel(master, analytics, name)?;
    cache.store(assessment.clone());
    Ok(assessment)
}
