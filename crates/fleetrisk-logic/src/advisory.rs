//! Per-vessel advisory: recommendations, peer comparison, trend forecast.
//!
//! Everything here is derived from an assessment plus the reference
//! datasets; nothing feeds back into scoring. Thresholds are fixed
//! business rules, not statistical inference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    compute_assessment, round1, RiskAssessment, ScoreError,
};
use crate::vessel::{InspectionAnalytics, InspectionSummary, PerformanceTrend, VesselMaster, VesselRecord};

/// Recommendation priority, shared by vessel and fleet recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single actionable recommendation for one vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub priority: Priority,
    pub action: String,
    pub description: String,
    pub estimated_impact: String,
    pub timeframe: String,
}

/// How a vessel's risk sits against same-type peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerComparison {
    pub peer_count: usize,
    pub average_peer_risk: f64,
    /// Share of peers scoring higher, as a percentage. High percentile
    /// means most peers are riskier than this vessel.
    pub vessel_percentile: f64,
    pub outperforms_peers: bool,
}

/// Predicted direction of a vessel's risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Decreasing,
    Stable,
    SlightlyIncreasing,
    Increasing,
    RapidlyIncreasing,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTrendForecast {
    pub direction: TrendDirection,
    pub confidence: Confidence,
    pub note: Option<String>,
}

/// Full advisory bundle for one vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselAdvisory {
    pub assessment: RiskAssessment,
    pub recommendations: Vec<Recommendation>,
    pub peer_comparison: Option<PeerComparison>,
    pub risk_trend: RiskTrendForecast,
    pub assessment_date: DateTime<Utc>,
}

const HIGH_AGE_FACTOR: f64 = 70.0;
const HIGH_HISTORY_FACTOR: f64 = 60.0;
const HIGH_MOU_FACTOR: f64 = 60.0;
const CRITICAL_RISK_SCORE: f64 = 75.0;
const OLD_VESSEL_AGE: f64 = 25.0;

/// Rule-based recommendations from an assessment's factor profile.
pub fn recommendations_for(assessment: &RiskAssessment) -> Vec<Recommendation> {
    let factors = &assessment.factor_breakdown;
    let mut recommendations = Vec::new();

    if factors.age_factor > HIGH_AGE_FACTOR {
        recommendations.push(Recommendation {
            category: "Age Management".to_string(),
            priority: Priority::High,
            action: "Implement enhanced maintenance program".to_string(),
            description: "Vessel age is a significant risk factor. Enhanced maintenance and condition monitoring recommended.".to_string(),
            estimated_impact: "10-15 point risk reduction".to_string(),
            timeframe: "3-6 months".to_string(),
        });
    }

    if factors.history_factor > HIGH_HISTORY_FACTOR {
        recommendations.push(Recommendation {
            category: "Operational Excellence".to_string(),
            priority: Priority::Critical,
            action: "Crew training and procedures review".to_string(),
            description: "Historical defect patterns indicate need for improved operational procedures.".to_string(),
            estimated_impact: "15-25 point risk reduction".to_string(),
            timeframe: "1-3 months".to_string(),
        });
    }

    if factors.mou_factor > HIGH_MOU_FACTOR {
        recommendations.push(Recommendation {
            category: "Regulatory Compliance".to_string(),
            priority: Priority::Medium,
            action: "Flag state and classification review".to_string(),
            description: "Consider flag state optimization and classification society engagement.".to_string(),
            estimated_impact: "5-10 point risk reduction".to_string(),
            timeframe: "6-12 months".to_string(),
        });
    }

    if assessment.risk_score > CRITICAL_RISK_SCORE {
        recommendations.push(Recommendation {
            category: "Emergency Action".to_string(),
            priority: Priority::Critical,
            action: "Immediate risk mitigation required".to_string(),
            description: "Vessel presents critical risk. Immediate action required before next voyage.".to_string(),
            estimated_impact: "Essential for continued operation".to_string(),
            timeframe: "Immediate".to_string(),
        });
    }

    recommendations
}

/// Compare a vessel against same-type peers present in both datasets.
/// `None` when no comparable peers exist.
pub fn peer_comparison(
    master: &VesselMaster,
    analytics: &InspectionAnalytics,
    assessment: &RiskAssessment,
) -> Option<PeerComparison> {
    let mut peer_scores = Vec::new();
    for name in analytics.names() {
        if name == assessment.vessel_name {
            continue;
        }
        if let Some(record) = master.get(name) {
            if record.vessel_type == assessment.vessel_info.vessel_type {
                peer_scores.push(compute_assessment(record, analytics.get(name)).risk_score);
            }
        }
    }

    if peer_scores.is_empty() {
        return None;
    }

    let peer_count = peer_scores.len();
    let average = peer_scores.iter().sum::<f64>() / peer_count as f64;
    let riskier_peers = peer_scores
        .iter()
        .filter(|&&score| score > assessment.risk_score)
        .count();

    Some(PeerComparison {
        peer_count,
        average_peer_risk: round1(average),
        vessel_percentile: round1(riskier_peers as f64 / peer_count as f64 * 100.0),
        outperforms_peers: assessment.risk_score < average,
    })
}

/// Map the inspection performance trend onto a risk direction, then
/// apply the aging adjustment: vessels past the old-age threshold do
/// not get to keep a flat or improving outlook.
pub fn forecast_risk_trend(
    vessel: &VesselRecord,
    history: Option<&InspectionSummary>,
) -> RiskTrendForecast {
    let (direction, confidence) = match history.map(|h| h.performance_trend) {
        Some(PerformanceTrend::Excellent) => (TrendDirection::Decreasing, Confidence::High),
        Some(PerformanceTrend::Improving) => (TrendDirection::Decreasing, Confidence::Medium),
        Some(PerformanceTrend::Stable) => (TrendDirection::Stable, Confidence::Medium),
        Some(PerformanceTrend::Deteriorating) => (TrendDirection::Increasing, Confidence::High),
        Some(PerformanceTrend::Critical) => (TrendDirection::RapidlyIncreasing, Confidence::High),
        Some(PerformanceTrend::Unknown) | None => (TrendDirection::Unknown, Confidence::Low),
    };

    let mut forecast = RiskTrendForecast {
        direction,
        confidence,
        note: None,
    };

    if vessel.age_years > OLD_VESSEL_AGE
        && matches!(
            forecast.direction,
            TrendDirection::Stable | TrendDirection::Decreasing
        )
    {
        forecast.direction = TrendDirection::SlightlyIncreasing;
        forecast.note = Some("Age-related risk increase expected over time".to_string());
    }

    forecast
}

/// Assemble the full advisory for one vessel.
pub fn advise_vessel(
    master: &VesselMaster,
    analytics: &InspectionAnalytics,
    name: &str,
) -> Result<VesselAdvisory, ScoreError> {
    let vessel = master
        .get(name)
        .ok_or_else(|| ScoreError::VesselNotFound(name.to_string()))?;
    let history = analytics.get(name);
    let assessment = compute_assessment(vessel, history);

    Ok(VesselAdvisory {
        recommendations: recommendations_for(&assessment),
        peer_comparison: peer_comparison(master, analytics, &assessment),
        risk_trend: forecast_risk_trend(vessel, history),
        assessment,
        assessment_date: Utc::now(),
    })
}
