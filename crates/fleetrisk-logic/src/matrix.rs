//! 5x5 probability/severity matrix bucketing.
//!
//! Probability comes straight from the composite score; severity starts
//! there too, then shifts for vessel size. The level grid is a fixed
//! lookup, independent of any vessel data. The matrix is rebuilt
//! wholesale on every invocation, never updated incrementally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::RiskAssessment;

/// Probability axis labels, lowest likelihood first.
pub const PROBABILITY_LABELS: [&str; 5] = ["Very Low", "Low", "Medium", "High", "Very High"];

/// Severity axis labels top-down: row 0 is the most catastrophic.
pub const SEVERITY_LABELS: [&str; 5] =
    ["Catastrophic", "Major", "Moderate", "Minor", "Insignificant"];

/// Cells with a level above this count as high-risk by convention.
pub const HIGH_RISK_LEVEL: u8 = 15;

/// Deadweight above which a vessel's severity shifts up one step.
pub const LARGE_VESSEL_DWT: f64 = 100_000.0;

/// Deadweight below which a vessel's severity shifts down one step.
pub const SMALL_VESSEL_DWT: f64 = 20_000.0;

/// Probability column for a composite score: one 20-point band per
/// column, top band absorbing 100.
pub fn probability_index(risk_score: f64) -> usize {
    ((risk_score / 20.0).floor() as usize).min(4)
}

/// Severity step for a vessel: the score band, shifted by tonnage.
/// Large vessels carry more potential impact, small ones less.
pub fn severity_index(risk_score: f64, dwt: f64) -> usize {
    let base = ((risk_score / 20.0).floor() as usize).min(4);
    if dwt > LARGE_VESSEL_DWT {
        (base + 1).min(4)
    } else if dwt < SMALL_VESSEL_DWT {
        base.saturating_sub(1)
    } else {
        base
    }
}

/// Fixed risk level for a grid cell: `(5 - row) * (col + 1)`, giving
/// 1..25 with the top-left row carrying the catastrophic weights.
pub fn risk_level(row: usize, col: usize) -> u8 {
    debug_assert!(row < 5 && col < 5);
    ((5 - row) * (col + 1)) as u8
}

/// The full 5x5 level grid.
pub fn risk_level_grid() -> [[u8; 5]; 5] {
    std::array::from_fn(|row| std::array::from_fn(|col| risk_level(row, col)))
}

/// Whether a grid cell counts as high-risk.
pub fn is_high_risk_cell(row: usize, col: usize) -> bool {
    risk_level(row, col) > HIGH_RISK_LEVEL
}

/// Fleet distribution over the probability/severity grid.
///
/// `counts[row][col]` holds vessels per cell with row 0 the most
/// catastrophic severity; `vessel_distribution` holds the matching
/// vessel names. Cell counts always sum to `total_vessels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMatrix {
    pub counts: [[u32; 5]; 5],
    pub risk_levels: [[u8; 5]; 5],
    pub severity_labels: Vec<String>,
    pub probability_labels: Vec<String>,
    pub vessel_distribution: [[Vec<String>; 5]; 5],
    pub total_vessels: usize,
    pub generated_at: DateTime<Utc>,
}

impl RiskMatrix {
    /// Number of grid cells whose fixed level exceeds the high-risk
    /// threshold. A property of the grid, not the fleet.
    pub fn high_risk_cells(&self) -> usize {
        self.risk_levels
            .iter()
            .flatten()
            .filter(|&&level| level > HIGH_RISK_LEVEL)
            .count()
    }

    /// Number of vessels sitting in high-risk cells.
    pub fn vessels_in_high_risk(&self) -> u32 {
        let mut total = 0;
        for row in 0..5 {
            for col in 0..5 {
                if is_high_risk_cell(row, col) {
                    total += self.counts[row][col];
                }
            }
        }
        total
    }
}

/// Bucket every assessment into the grid. Callers pass successfully
/// scored vessels only; failures were already filtered out upstream.
pub fn generate_matrix(assessments: &[RiskAssessment]) -> RiskMatrix {
    let mut counts = [[0u32; 5]; 5];
    let mut vessel_distribution: [[Vec<String>; 5]; 5] = Default::default();

    for assessment in assessments {
        let col = probability_index(assessment.risk_score);
        let severity = severity_index(assessment.risk_score, assessment.vessel_info.dwt);
        let row = 4 - severity;
        counts[row][col] += 1;
        vessel_distribution[row][col].push(assessment.vessel_name.clone());
    }

    RiskMatrix {
        counts,
        risk_levels: risk_level_grid(),
        severity_labels: SEVERITY_LABELS.iter().map(|s| s.to_string()).collect(),
        probability_labels: PROBABILITY_LABELS.iter().map(|s| s.to_string()).collect(),
        vessel_distribution,
        total_vessels: assessments.len(),
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{compute_assessment, RiskAssessment};
    use crate::vessel::VesselRecord;

    fn assessment(name: &str, age_years: f64, dwt: f64) -> RiskAssessment {
        // mid-profile vessel so the score is driven by age
        let record = VesselRecord {
            vessel_name: name.to_string(),
            age_years,
            built_year: 2000,
            vessel_type: "Bulk".to_string(),
            flag_state: "Korea".to_string(),
            classification_society: "KR".to_string(),
            dwt,
        };
        compute_assessment(&record, None)
    }

    #[test]
    fn test_probability_index_bands() {
        assert_eq!(probability_index(0.0), 0);
        assert_eq!(probability_index(19.99), 0);
        assert_eq!(probability_index(20.0), 1);
        assert_eq!(probability_index(51.5), 2);
        assert_eq!(probability_index(79.9), 3);
        assert_eq!(probability_index(80.0), 4);
        assert_eq!(probability_index(100.0), 4);
    }

    #[test]
    fn test_severity_index_tonnage_shifts() {
        // mid-size vessel stays at the score band
        assert_eq!(severity_index(51.5, 50_000.0), 2);
        // large vessel shifts up, capped at 4
        assert_eq!(severity_index(51.5, 150_000.0), 3);
        assert_eq!(severity_index(95.0, 150_000.0), 4);
        // small vessel shifts down, floored at 0
        assert_eq!(severity_index(51.5, 10_000.0), 1);
        assert_eq!(severity_index(5.0, 10_000.0), 0);
    }

    #[test]
    fn test_risk_level_grid_fixed_values() {
        assert_eq!(risk_level(0, 0), 5);
        assert_eq!(risk_level(0, 4), 25);
        assert_eq!(risk_level(4, 0), 1);
        assert_eq!(risk_level(4, 4), 5);
        assert_eq!(risk_level(2, 2), 9);

        let grid = risk_level_grid();
        for (row, levels) in grid.iter().enumerate() {
            for (col, &level) in levels.iter().enumerate() {
                assert_eq!(level, ((5 - row) * (col + 1)) as u8);
                assert!((1..=25).contains(&level));
            }
        }
    }

    #[test]
    fn test_grid_has_four_high_risk_cells() {
        // levels above 15 on the fixed grid: 20 and 25 in the top row,
        // 16 and 20 in the second
        let matrix = generate_matrix(&[]);
        assert_eq!(matrix.high_risk_cells(), 4);
    }

    #[test]
    fn test_empty_fleet_builds_empty_matrix() {
        let matrix = generate_matrix(&[]);
        assert_eq!(matrix.total_vessels, 0);
        let total: u32 = matrix.counts.iter().flatten().sum();
        assert_eq!(total, 0);
        assert_eq!(matrix.vessels_in_high_risk(), 0);
    }

    #[test]
    fn test_cell_counts_sum_to_scored_vessels() {
        let fleet: Vec<RiskAssessment> = (0..17)
            .map(|i| {
                assessment(
                    &format!("VESSEL {}", i),
                    2.0 + i as f64 * 2.5,
                    15_000.0 + i as f64 * 12_000.0,
                )
            })
            .collect();

        for n in 0..=fleet.len() {
            let matrix = generate_matrix(&fleet[..n]);
            let total: u32 = matrix.counts.iter().flatten().sum();
            assert_eq!(total as usize, n);
            assert_eq!(matrix.total_vessels, n);
            let named: usize = matrix
                .vessel_distribution
                .iter()
                .flatten()
                .map(Vec::len)
                .sum();
            assert_eq!(named, n);
        }
    }

    #[test]
    fn test_vessel_placement() {
        // score band 2, neutral tonnage: row 4 - 2, col 2
        let a = assessment("MID", 30.0, 50_000.0);
        let col = probability_index(a.risk_score);
        let row = 4 - severity_index(a.risk_score, a.vessel_info.dwt);
        let matrix = generate_matrix(std::slice::from_ref(&a));
        assert_eq!(matrix.counts[row][col], 1);
        assert_eq!(matrix.vessel_distribution[row][col], vec!["MID".to_string()]);

        // same score, large tonnage: one row closer to catastrophic
        let big = assessment("BIG", 30.0, 180_000.0);
        let big_row = 4 - severity_index(big.risk_score, big.vessel_info.dwt);
        assert_eq!(big_row, row - 1);
    }

    #[test]
    fn test_labels_align_with_rows() {
        let matrix = generate_matrix(&[]);
        assert_eq!(matrix.severity_labels[0], "Catastrophic");
        assert_eq!(matrix.severity_labels[4], "Insignificant");
        assert_eq!(matrix.probability_labels[0], "Very Low");
        assert_eq!(matrix.probability_labels[4], "Very High");
    }
}
