//! What-if scenario simulation: factor perturbation and ROI projection.
//!
//! A scenario re-scores vessels with one factor scaled down, then
//! projects the money side from the aggregate score delta. Unknown
//! scenario names produce an empty analysis rather than an error;
//! callers check `vessels_analyzed` before trusting the summary.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    composite_score, round1, round2, score_vessel, RiskCategory,
};
use crate::vessel::{InspectionAnalytics, VesselMaster};

/// Annual savings per point of average risk reduction, in dollars.
/// Rough insurance-and-incident figure, fixed by convention.
const SAVINGS_PER_RISK_POINT: f64 = 5_000.0;

/// Project horizon for the ROI percentage, in years.
const ROI_HORIZON_YEARS: f64 = 5.0;

/// Recognized mitigation scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// Crew training: scales the history factor down.
    TrainingImpact,
    /// Enhanced maintenance: scales the age factor down.
    MaintenanceImprovement,
    /// Flag state change: priced in the cost table but defines no
    /// factor perturbation, so its analysis comes back empty.
    FlagChange,
}

impl ScenarioKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "training_impact" => Some(Self::TrainingImpact),
            "maintenance_improvement" => Some(Self::MaintenanceImprovement),
            "flag_change" => Some(Self::FlagChange),
            _ => None,
        }
    }
}

/// Estimated implementation cost for a scenario, in dollars.
/// Unrecognized names get a generic placeholder budget.
pub fn scenario_cost(name: &str) -> f64 {
    match name {
        "training_impact" => 50_000.0,
        "maintenance_improvement" => 200_000.0,
        "flag_change" => 25_000.0,
        _ => 100_000.0,
    }
}

/// Scenario tuning knobs. Reduction percentages apply to whichever
/// factor the scenario perturbs; the other is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// History factor reduction for `training_impact`, in percent.
    pub defect_reduction_pct: f64,
    /// Age factor reduction for `maintenance_improvement`, in percent.
    pub age_risk_reduction_pct: f64,
    /// Vessels to analyze; `None` means every vessel with inspection data.
    pub vessels: Option<Vec<String>>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            defect_reduction_pct: 20.0,
            age_risk_reduction_pct: 15.0,
            vessels: None,
        }
    }
}

/// Per-vessel before/after comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselImpact {
    pub vessel_name: String,
    pub baseline_score: f64,
    pub modified_score: f64,
    /// Positive means the scenario improves the vessel.
    pub risk_reduction: f64,
    pub baseline_category: RiskCategory,
    pub modified_category: RiskCategory,
}

/// Category movement tallies, compared in severity order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChanges {
    pub improved: u32,
    pub unchanged: u32,
    pub worsened: u32,
}

/// Money projection from the aggregate score delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiEstimate {
    pub estimated_cost: f64,
    pub annual_savings: f64,
    /// `f64::INFINITY` when the scenario never pays back.
    pub payback_period_years: f64,
    pub roi_5yr_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Requested vessel count; also the denominator for the rates, so
    /// vessels that could not be analyzed dilute the average.
    pub total_vessels: usize,
    pub vessels_improved: usize,
    pub improvement_rate_pct: f64,
    pub average_risk_reduction: f64,
    pub total_risk_reduction: f64,
    pub category_changes: CategoryChanges,
    pub roi_estimate: RoiEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub parameters: ScenarioParams,
    pub simulation_date: DateTime<Utc>,
    pub vessels_analyzed: Vec<VesselImpact>,
    pub summary: ScenarioSummary,
}

/// ROI projection from the average per-vessel risk reduction.
pub fn estimate_roi(scenario_name: &str, average_risk_reduction: f64) -> RoiEstimate {
    let cost = scenario_cost(scenario_name);
    let annual_savings = average_risk_reduction * SAVINGS_PER_RISK_POINT;
    let payback_period_years = if annual_savings > 0.0 {
        round1(cost / annual_savings)
    } else {
        f64::INFINITY
    };
    let roi_5yr_pct = round1((annual_savings * ROI_HORIZON_YEARS - cost) / cost * 100.0);

    RoiEstimate {
        estimated_cost: cost,
        annual_savings: annual_savings.round(),
        payback_period_years,
        roi_5yr_pct,
    }
}

/// Run a scenario across the fleet or a named subset.
///
/// Vessels missing from the master are skipped, never abort the batch;
/// they still count in the summary denominators.
pub fn simulate_scenario(
    master: &VesselMaster,
    analytics: &InspectionAnalytics,
    scenario_name: &str,
    params: &ScenarioParams,
) -> ScenarioResult {
    let vessels: Vec<String> = match &params.vessels {
        Some(list) => list.clone(),
        None => analytics.names().map(str::to_string).collect(),
    };
    let kind = ScenarioKind::from_name(scenario_name);

    let mut vessels_analyzed = Vec::new();
    for name in &vessels {
        let baseline = match score_vessel(master, analytics, name) {
            Ok(assessment) => assessment,
            Err(_) => continue,
        };
        let factors = &baseline.factor_breakdown;

        let modified = match kind {
            Some(ScenarioKind::TrainingImpact) => {
                let history = factors.history_factor * (1.0 - params.defect_reduction_pct / 100.0);
                composite_score(factors.age_factor, history, factors.mou_factor)
            }
            Some(ScenarioKind::MaintenanceImprovement) => {
                let age = factors.age_factor * (1.0 - params.age_risk_reduction_pct / 100.0);
                composite_score(age, factors.history_factor, factors.mou_factor)
            }
            Some(ScenarioKind::FlagChange) | None => continue,
        };

        let modified_score = round1(modified);
        vessels_analyzed.push(VesselImpact {
            vessel_name: name.clone(),
            baseline_score: baseline.risk_score,
            modified_score,
            risk_reduction: baseline.risk_score - modified_score,
            baseline_category: baseline.risk_category,
            modified_category: RiskCategory::from_score(modified),
        });
    }

    let total = vessels.len();
    let vessels_improved = vessels_analyzed
        .iter()
        .filter(|impact| impact.risk_reduction > 0.0)
        .count();
    let total_reduction: f64 = vessels_analyzed
        .iter()
        .map(|impact| impact.risk_reduction)
        .sum();

    let mut category_changes = CategoryChanges::default();
    for impact in &vessels_analyzed {
        match impact.modified_category.cmp(&impact.baseline_category) {
            Ordering::Less => category_changes.improved += 1,
            Ordering::Equal => category_changes.unchanged += 1,
            Ordering::Greater => category_changes.worsened += 1,
        }
    }

    let average_reduction = if total > 0 {
        total_reduction / total as f64
    } else {
        0.0
    };
    let improvement_rate = if total > 0 {
        vessels_improved as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    ScenarioResult {
        scenario_name: scenario_name.to_string(),
        parameters: params.clone(),
        simulation_date: Utc::now(),
        vessels_analyzed,
        summary: ScenarioSummary {
            total_vessels: total,
            vessels_improved,
            improvement_rate_pct: round1(improvement_rate),
            average_risk_reduction: round2(average_reduction),
            total_risk_reduction: round2(total_reduction),
            category_changes,
            roi_estimate: estimate_roi(scenario_name, average_reduction),
        },
    }
}
