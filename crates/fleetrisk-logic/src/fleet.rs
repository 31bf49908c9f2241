//! Fleet-wide aggregation: statistics, recommendation triggers, report.
//!
//! Scores every vessel with inspection data, folds the successes into
//! overview numbers, and assembles the serializable fleet report that
//! external exporters consume. Unresolvable vessels are carried as
//! failures beside the results, never silently dropped mid-batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::advisory::Priority;
use crate::matrix::generate_matrix;
use crate::scoring::{round1, score_vessel, FactorBreakdown, RiskAssessment, RiskCategory, ScoreError};
use crate::vessel::{InspectionAnalytics, VesselMaster};

/// Score above which a vessel counts as high risk in the overview.
const HIGH_RISK_SCORE: f64 = 50.0;

/// Score above which a vessel counts as critical risk in the overview.
const CRITICAL_RISK_SCORE: f64 = 75.0;

/// Age beyond which a vessel counts toward the modernization trigger.
const OLD_VESSEL_AGE: f64 = 25.0;

/// History factor beyond which a vessel counts toward the training trigger.
const HIGH_HISTORY_FACTOR: f64 = 60.0;

/// Fraction of old vessels that trips the modernization recommendation.
const OLD_FLEET_FRACTION: f64 = 0.5;

/// Default length of the top-risk list in the fleet report.
pub const DEFAULT_TOP_RISK_COUNT: usize = 5;

/// Outcome of a fleet scoring sweep: successes and per-vessel failures.
/// Aggregation uses `assessments` only.
#[derive(Debug, Clone, Default)]
pub struct FleetScores {
    pub assessments: Vec<RiskAssessment>,
    pub failures: Vec<ScoreError>,
}

/// Vessel counts per risk category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryHistogram {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl CategoryHistogram {
    pub fn record(&mut self, category: RiskCategory) {
        match category {
            RiskCategory::Low => self.low += 1,
            RiskCategory::Medium => self.medium += 1,
            RiskCategory::High => self.high += 1,
            RiskCategory::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.low + self.medium + self.high + self.critical
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetOverview {
    pub total_vessels: usize,
    pub average_risk_score: f64,
    pub risk_distribution: CategoryHistogram,
    pub high_risk_vessels: usize,
    pub critical_risk_vessels: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRiskVessel {
    pub vessel_name: String,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    /// Which of the three factors contributes the largest raw value.
    pub primary_risk_factor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSummary {
    pub total_vessels_in_matrix: usize,
    pub high_risk_cells: usize,
    pub vessels_in_high_risk: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRecommendation {
    pub priority: Priority,
    pub category: String,
    pub action: String,
    pub impact: String,
    pub timeframe: String,
}

/// Complete fleet report. Plain serializable data with no framework
/// dependency; exporters turn this into JSON or CSV as they see fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    pub report_title: String,
    pub generated_at: DateTime<Utc>,
    pub fleet_overview: FleetOverview,
    pub top_risk_vessels: Vec<TopRiskVessel>,
    pub risk_matrix_summary: MatrixSummary,
    pub fleet_recommendations: Vec<FleetRecommendation>,
    pub vessel_details: Vec<RiskAssessment>,
}

/// Score every vessel with inspection data present.
pub fn score_fleet(master: &VesselMaster, analytics: &InspectionAnalytics) -> FleetScores {
    let mut scores = FleetScores::default();
    for name in analytics.names() {
        match score_vessel(master, analytics, name) {
            Ok(assessment) => scores.assessments.push(assessment),
            Err(error) => scores.failures.push(error),
        }
    }
    scores
}

/// The factor name carrying the largest raw value, ties resolved in
/// age, history, MOU order.
pub fn primary_risk_factor(factors: &FactorBreakdown) -> &'static str {
    if factors.age_factor >= factors.history_factor && factors.age_factor >= factors.mou_factor {
        "age_factor"
    } else if factors.history_factor >= factors.mou_factor {
        "history_factor"
    } else {
        "mou_factor"
    }
}

pub fn fleet_overview(assessments: &[RiskAssessment]) -> FleetOverview {
    let total_vessels = assessments.len();
    let average = if total_vessels > 0 {
        assessments.iter().map(|a| a.risk_score).sum::<f64>() / total_vessels as f64
    } else {
        0.0
    };

    let mut risk_distribution = CategoryHistogram::default();
    for assessment in assessments {
        risk_distribution.record(assessment.risk_category);
    }

    FleetOverview {
        total_vessels,
        average_risk_score: round1(average),
        risk_distribution,
        high_risk_vessels: assessments
            .iter()
            .filter(|a| a.risk_score > HIGH_RISK_SCORE)
            .count(),
        critical_risk_vessels: assessments
            .iter()
            .filter(|a| a.risk_score > CRITICAL_RISK_SCORE)
            .count(),
    }
}

/// The `count` riskiest vessels, score descending.
pub fn top_risk_vessels(assessments: &[RiskAssessment], count: usize) -> Vec<TopRiskVessel> {
    let mut ranked: Vec<&RiskAssessment> = assessments.iter().collect();
    ranked.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    ranked
        .into_iter()
        .take(count)
        .map(|assessment| TopRiskVessel {
            vessel_name: assessment.vessel_name.clone(),
            risk_score: assessment.risk_score,
            risk_category: assessment.risk_category,
            primary_risk_factor: primary_risk_factor(&assessment.factor_breakdown).to_string(),
        })
        .collect()
}

/// Rule-based fleet recommendations. Threshold triggers, nothing more.
pub fn fleet_recommendations(assessments: &[RiskAssessment]) -> Vec<FleetRecommendation> {
    let mut recommendations = Vec::new();

    let critical_count = assessments
        .iter()
        .filter(|a| a.risk_score > CRITICAL_RISK_SCORE)
        .count();
    if critical_count > 0 {
        recommendations.push(FleetRecommendation {
            priority: Priority::Critical,
            category: "Emergency Fleet Management".to_string(),
            action: format!(
                "Immediate attention required for {} critical risk vessels",
                critical_count
            ),
            impact: "Essential for continued safe operations".to_string(),
            timeframe: "Immediate".to_string(),
        });
    }

    let old_count = assessments
        .iter()
        .filter(|a| a.vessel_info.age_years > OLD_VESSEL_AGE)
        .count();
    if old_count as f64 > assessments.len() as f64 * OLD_FLEET_FRACTION {
        recommendations.push(FleetRecommendation {
            priority: Priority::High,
            category: "Fleet Modernization".to_string(),
            action: "Consider fleet renewal strategy for aging vessels".to_string(),
            impact: "15-25% fleet risk reduction".to_string(),
            timeframe: "2-5 years".to_string(),
        });
    }

    let high_defect_count = assessments
        .iter()
        .filter(|a| a.factor_breakdown.history_factor > HIGH_HISTORY_FACTOR)
        .count();
    if high_defect_count > 0 {
        recommendations.push(FleetRecommendation {
            priority: Priority::High,
            category: "Operational Excellence".to_string(),
            action: "Fleet-wide crew training and procedure standardization".to_string(),
            impact: "20-30% deficiency reduction".to_string(),
            timeframe: "3-6 months".to_string(),
        });
    }

    recommendations
}

/// Assemble the complete fleet report.
pub fn generate_fleet_report(
    master: &VesselMaster,
    analytics: &InspectionAnalytics,
    top_count: usize,
) -> FleetReport {
    let scores = score_fleet(master, analytics);
    let matrix = generate_matrix(&scores.assessments);

    FleetReport {
        report_title: "Maritime Fleet Risk Assessment Report".to_string(),
        generated_at: Utc::now(),
        fleet_overview: fleet_overview(&scores.assessments),
        top_risk_vessels: top_risk_vessels(&scores.assessments, top_count),
        risk_matrix_summary: MatrixSummary {
            total_vessels_in_matrix: matrix.total_vessels,
            high_risk_cells: matrix.high_risk_cells(),
            vessels_in_high_risk: matrix.vessels_in_high_risk(),
        },
        fleet_recommendations: fleet_recommendations(&scores.assessments),
        vessel_details: scores.assessments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vessel::{FleetKpis, InspectionSummary, PerformanceTrend, VesselRecord};

    fn record(name: &str, age_years: f64, flag: &str, society: &str) -> VesselRecord {
        VesselRecord {
            vessel_name: name.to_string(),
            age_years,
            built_year: 2026 - age_years as u32,
            vessel_type: "Bulk".to_string(),
            flag_state: flag.to_string(),
            classification_society: society.to_string(),
            dwt: 60_000.0,
        }
    }

    fn summary(name: &str, avg_deficiencies: f64, trend: PerformanceTrend) -> InspectionSummary {
        InspectionSummary {
            vessel_name: name.to_string(),
            inspections: 5,
            avg_deficiencies,
            detention_rate: 10.0,
            clean_rate: 20.0,
            performance_trend: trend,
        }
    }

    fn mixed_fleet() -> (VesselMaster, InspectionAnalytics) {
        let master = VesselMaster::from_records(vec![
            record("OLD RISKY", 33.0, "Panama", "RINA"),
            record("OLD QUIET", 28.0, "Korea", "KR"),
            record("YOUNG CLEAN", 6.0, "Japan", "DNV"),
        ]);
        let analytics = InspectionAnalytics::from_summaries(
            vec![
                summary("OLD RISKY", 9.0, PerformanceTrend::Critical),
                summary("OLD QUIET", 2.0, PerformanceTrend::Stable),
                summary("YOUNG CLEAN", 0.5, PerformanceTrend::Excellent),
                // present in analytics, missing from the master
                summary("WANDERING STAR", 4.0, PerformanceTrend::Stable),
            ],
            FleetKpis::default(),
        );
        (master, analytics)
    }

    #[test]
    fn test_score_fleet_partitions_failures() {
        let (master, analytics) = mixed_fleet();
        let scores = score_fleet(&master, &analytics);
        assert_eq!(scores.assessments.len(), 3);
        assert_eq!(scores.failures.len(), 1);
        assert_eq!(
            scores.failures[0],
            crate::scoring::ScoreError::VesselNotFound("WANDERING STAR".to_string())
        );
    }

    #[test]
    fn test_overview_counts_and_histogram() {
        let (master, analytics) = mixed_fleet();
        let scores = score_fleet(&master, &analytics);
        let overview = fleet_overview(&scores.assessments);

        assert_eq!(overview.total_vessels, 3);
        assert_eq!(overview.risk_distribution.total(), 3);
        assert!(overview.average_risk_score > 0.0);
        // only the old risky vessel clears the high-risk score bar
        assert!(overview.high_risk_vessels >= 1);
        assert!(overview.critical_risk_vessels <= overview.high_risk_vessels);
    }

    #[test]
    fn test_overview_empty_fleet() {
        let overview = fleet_overview(&[]);
        assert_eq!(overview.total_vessels, 0);
        assert_eq!(overview.average_risk_score, 0.0);
        assert_eq!(overview.risk_distribution.total(), 0);
    }

    #[test]
    fn test_top_risk_ordering_and_truncation() {
        let (master, analytics) = mixed_fleet();
        let scores = score_fleet(&master, &analytics);

        let top = top_risk_vessels(&scores.assessments, 2);
        assert_eq!(top.len(), 2);
        assert!(top[0].risk_score >= top[1].risk_score);
        assert_eq!(top[0].vessel_name, "OLD RISKY");

        let all = top_risk_vessels(&scores.assessments, 10);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_primary_risk_factor_selection() {
        let factors = FactorBreakdown {
            age_factor: 56.25,
            history_factor: 80.0,
            mou_factor: 44.0,
            age_weight: 0.4,
            history_weight: 0.4,
            mou_weight: 0.2,
        };
        assert_eq!(primary_risk_factor(&factors), "history_factor");

        let tied = FactorBreakdown {
            age_factor: 50.0,
            history_factor: 50.0,
            mou_factor: 50.0,
            age_weight: 0.4,
            history_weight: 0.4,
            mou_weight: 0.2,
        };
        assert_eq!(primary_risk_factor(&tied), "age_factor");
    }

    #[test]
    fn test_modernization_trigger_needs_majority() {
        let (master, analytics) = mixed_fleet();
        let scores = score_fleet(&master, &analytics);
        // 2 of 3 scored vessels are past 25 years
        let recs = fleet_recommendations(&scores.assessments);
        assert!(recs.iter().any(|r| r.category == "Fleet Modernization"));

        // with only the young vessel, no modernization call
        let young: Vec<RiskAssessment> = scores
            .assessments
            .iter()
            .filter(|a| a.vessel_info.age_years < 25.0)
            .cloned()
            .collect();
        let recs = fleet_recommendations(&young);
        assert!(!recs.iter().any(|r| r.category == "Fleet Modernization"));
    }

    #[test]
    fn test_training_trigger_on_high_history() {
        let (master, analytics) = mixed_fleet();
        let scores = score_fleet(&master, &analytics);
        // OLD RISKY: (70 + 2.5 - 3) * 1.5 clamps to 100, well above 60
        let recs = fleet_recommendations(&scores.assessments);
        assert!(recs
            .iter()
            .any(|r| r.category == "Operational Excellence" && r.priority == Priority::High));
    }

    #[test]
    fn test_no_recommendations_for_healthy_fleet() {
        let master = VesselMaster::from_records(vec![
            record("YOUNG A", 4.0, "Japan", "DNV"),
            record("YOUNG B", 7.0, "Korea", "KR"),
            record("YOUNG C", 9.0, "Norway", "DNV"),
        ]);
        let analytics = InspectionAnalytics::from_summaries(
            vec![
                summary("YOUNG A", 0.5, PerformanceTrend::Excellent),
                summary("YOUNG B", 1.0, PerformanceTrend::Stable),
                summary("YOUNG C", 0.8, PerformanceTrend::Improving),
            ],
            FleetKpis::default(),
        );
        let scores = score_fleet(&master, &analytics);
        assert!(fleet_recommendations(&scores.assessments).is_empty());
    }

    #[test]
    fn test_report_coherence() {
        let (master, analytics) = mixed_fleet();
        let report = generate_fleet_report(&master, &analytics, DEFAULT_TOP_RISK_COUNT);

        assert_eq!(report.report_title, "Maritime Fleet Risk Assessment Report");
        assert_eq!(report.fleet_overview.total_vessels, 3);
        assert_eq!(report.vessel_details.len(), 3);
        assert_eq!(report.risk_matrix_summary.total_vessels_in_matrix, 3);
        assert_eq!(report.risk_matrix_summary.high_risk_cells, 4);
        assert!(report.top_risk_vessels.len() <= DEFAULT_TOP_RISK_COUNT);
        assert_eq!(
            report.fleet_overview.risk_distribution.total() as usize,
            report.vessel_details.len()
        );
    }
}
