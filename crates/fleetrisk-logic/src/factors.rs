//! Risk factor calculators: age banding, inspection history, MOU profile.
//!
//! Each calculator returns a factor on the 0..100 scale, clamped before
//! the scorer combines them. All modifier tables are fixed business
//! constants, not fitted parameters.

use crate::vessel::{InspectionSummary, PerformanceTrend, VesselRecord};

/// An age band: `[min_age, max_age)` with a base risk fraction.
/// `max_age == None` marks the open-ended top band.
#[derive(Debug, Clone, Copy)]
pub struct AgeBand {
    pub name: &'static str,
    pub min_age: f64,
    pub max_age: Option<f64>,
    pub base_risk: f64,
}

/// The five fixed age bands, youngest first.
pub const AGE_BANDS: [AgeBand; 5] = [
    AgeBand { name: "very_new", min_age: 0.0, max_age: Some(5.0), base_risk: 0.1 },
    AgeBand { name: "new", min_age: 5.0, max_age: Some(15.0), base_risk: 0.25 },
    AgeBand { name: "mature", min_age: 15.0, max_age: Some(25.0), base_risk: 0.5 },
    AgeBand { name: "old", min_age: 25.0, max_age: Some(35.0), base_risk: 0.75 },
    AgeBand { name: "very_old", min_age: 35.0, max_age: None, base_risk: 1.0 },
];

/// History factor assigned when a vessel has no inspection record.
pub const NO_HISTORY_FACTOR: f64 = 50.0;

/// Starting MOU risk before flag/type/class modifiers.
pub const MOU_BASE_RISK: f64 = 50.0;

/// Age-based risk factor on the 0..100 scale.
///
/// Within a bounded band the output is interpolated from half the band's
/// base value at band entry to the full base value at band exit:
/// `base * 100 * (0.5 + 0.5 * position)`. This jumps at band boundaries
/// on purpose; the banding model is discontinuous, not a smooth decay.
/// Ages in the open-ended top band, or outside every band, read as
/// maximum risk.
pub fn age_factor(age_years: f64) -> f64 {
    for band in &AGE_BANDS {
        match band.max_age {
            Some(max) => {
                if age_years >= band.min_age && age_years < max {
                    let position = (age_years - band.min_age) / (max - band.min_age);
                    return band.base_risk * 100.0 * (0.5 + 0.5 * position);
                }
            }
            None => {
                if age_years >= band.min_age {
                    return band.base_risk * 100.0;
                }
            }
        }
    }
    100.0
}

/// Multiplier applied to the raw history score for a performance trend.
pub fn trend_modifier(trend: PerformanceTrend) -> f64 {
    match trend {
        PerformanceTrend::Excellent => 0.7,
        PerformanceTrend::Improving => 0.8,
        PerformanceTrend::Stable => 1.0,
        PerformanceTrend::Deteriorating => 1.3,
        PerformanceTrend::Critical => 1.5,
        PerformanceTrend::Unknown => 1.0,
    }
}

/// Inspection-history risk factor on the 0..100 scale.
///
/// Deficiencies contribute up to 70 points (8 per average deficiency),
/// detentions up to 25, and clean inspections subtract up to 15. The sum
/// is scaled by the trend modifier and clamped. A vessel with no
/// inspections gets the neutral [`NO_HISTORY_FACTOR`].
pub fn history_factor(summary: Option<&InspectionSummary>) -> f64 {
    let summary = match summary {
        Some(s) if s.inspections > 0 => s,
        _ => return NO_HISTORY_FACTOR,
    };

    let defect_risk = (summary.avg_deficiencies * 8.0).min(70.0);
    let detention_risk = summary.detention_rate / 100.0 * 25.0;
    let clean_bonus = summary.clean_rate / 100.0 * 15.0;

    let raw = (defect_risk + detention_risk - clean_bonus)
        * trend_modifier(summary.performance_trend);
    raw.clamp(0.0, 100.0)
}

/// Flag state risk modifier. Flags of convenience carry a surcharge,
/// flags with strong maritime administrations a discount.
pub fn flag_modifier(flag_state: &str) -> f64 {
    match flag_state {
        "Panama" | "Marshall Islands" => 1.1,
        "Korea" => 0.9,
        "Japan" | "Norway" => 0.8,
        _ => 1.0,
    }
}

/// Vessel type risk modifier.
pub fn type_modifier(vessel_type: &str) -> f64 {
    match vessel_type {
        "Tanker" => 1.2,
        "PC(T)C" => 1.0,
        "Bulk" => 0.9,
        "Container" => 0.85,
        _ => 1.0,
    }
}

/// Classification society risk modifier. Established societies earn a
/// discount; RINA and unrecognized societies carry no adjustment.
pub fn class_modifier(society: &str) -> f64 {
    match society {
        "DNV" | "KR" | "ABS" | "LR" => 0.9,
        _ => 1.0,
    }
}

/// MOU/regulatory risk factor on the 0..100 scale.
///
/// Deterministic in the vessel's flag state, trade type, and class
/// society; inspection data plays no part here.
pub fn mou_factor(vessel: &VesselRecord) -> f64 {
    let score = MOU_BASE_RISK
        * flag_modifier(&vessel.flag_state)
        * type_modifier(&vessel.vessel_type)
        * class_modifier(&vessel.classification_society);
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(
        inspections: u32,
        avg_deficiencies: f64,
        detention_rate: f64,
        clean_rate: f64,
        trend: PerformanceTrend,
    ) -> InspectionSummary {
        InspectionSummary {
            vessel_name: "TEST VESSEL".to_string(),
            inspections,
            avg_deficiencies,
            detention_rate,
            clean_rate,
            performance_trend: trend,
        }
    }

    fn vessel(vessel_type: &str, flag: &str, society: &str) -> VesselRecord {
        VesselRecord {
            vessel_name: "TEST VESSEL".to_string(),
            age_years: 10.0,
            built_year: 2016,
            vessel_type: vessel_type.to_string(),
            flag_state: flag.to_string(),
            classification_society: society.to_string(),
            dwt: 50_000.0,
        }
    }

    #[test]
    fn test_age_factor_band_entry_and_exit() {
        // very_new band: half base at entry, approaching full base at exit
        assert!((age_factor(0.0) - 5.0).abs() < 1e-9);
        assert!((age_factor(2.5) - 7.5).abs() < 1e-9);
        // boundary age 5 enters the "new" band at position 0
        assert!((age_factor(5.0) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_age_factor_very_new_range() {
        // anywhere in [0, 5) the factor stays within [5, 10]
        for tenths in 0..50 {
            let age = tenths as f64 / 10.0;
            let f = age_factor(age);
            assert!(f >= 5.0 && f <= 10.0, "age {} gave {}", age, f);
        }
    }

    #[test]
    fn test_age_factor_old_band_midpoint() {
        // age 30 is halfway through the old band: 0.75 * 100 * 0.75
        assert!((age_factor(30.0) - 56.25).abs() < 1e-9);
    }

    #[test]
    fn test_age_factor_jumps_at_band_boundaries() {
        // entering "new" jumps up: just under 5 tops out near 10, 5 lands on 12.5
        assert!(age_factor(4.99) < 10.0);
        assert!((age_factor(5.0) - 12.5).abs() < 1e-9);
        // entering "old" jumps down: just under 25 tops out near 50, 25 lands on 37.5
        assert!(age_factor(24.99) > 49.9);
        assert!((age_factor(25.0) - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_age_factor_open_top_band() {
        assert!((age_factor(35.0) - 100.0).abs() < 1e-9);
        assert!((age_factor(60.0) - 100.0).abs() < 1e-9);
        assert!((age_factor(120.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_age_factor_unbandable_age_is_max_risk() {
        assert!((age_factor(-1.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_history_factor_no_record_is_neutral() {
        assert!((history_factor(None) - 50.0).abs() < 1e-9);
        let zero = summary(0, 5.0, 10.0, 20.0, PerformanceTrend::Stable);
        assert!((history_factor(Some(&zero)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_history_factor_worked_example() {
        // defect 40, detention 2.5, clean bonus 3, stable trend
        let s = summary(6, 5.0, 10.0, 20.0, PerformanceTrend::Stable);
        assert!((history_factor(Some(&s)) - 39.5).abs() < 1e-9);
    }

    #[test]
    fn test_history_factor_defect_risk_caps_at_70() {
        let s = summary(10, 20.0, 0.0, 0.0, PerformanceTrend::Stable);
        assert!((history_factor(Some(&s)) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_history_factor_trend_scales() {
        let base = summary(6, 5.0, 10.0, 20.0, PerformanceTrend::Stable);
        let worse = summary(6, 5.0, 10.0, 20.0, PerformanceTrend::Deteriorating);
        let better = summary(6, 5.0, 10.0, 20.0, PerformanceTrend::Excellent);
        assert!((history_factor(Some(&worse)) - 39.5 * 1.3).abs() < 1e-9);
        assert!((history_factor(Some(&better)) - 39.5 * 0.7).abs() < 1e-9);
        assert!(history_factor(Some(&worse)) > history_factor(Some(&base)));
    }

    #[test]
    fn test_history_factor_clamps_both_ends() {
        // 70 + 25 - 0 scaled by 1.5 would be 142.5
        let hot = summary(12, 20.0, 100.0, 0.0, PerformanceTrend::Critical);
        assert!((history_factor(Some(&hot)) - 100.0).abs() < 1e-9);
        // 0 + 0 - 15 scaled by 0.7 would be negative
        let clean = summary(8, 0.0, 0.0, 100.0, PerformanceTrend::Excellent);
        assert!((history_factor(Some(&clean)) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_modifier_table() {
        assert!((trend_modifier(PerformanceTrend::Excellent) - 0.7).abs() < f64::EPSILON);
        assert!((trend_modifier(PerformanceTrend::Improving) - 0.8).abs() < f64::EPSILON);
        assert!((trend_modifier(PerformanceTrend::Stable) - 1.0).abs() < f64::EPSILON);
        assert!((trend_modifier(PerformanceTrend::Deteriorating) - 1.3).abs() < f64::EPSILON);
        assert!((trend_modifier(PerformanceTrend::Critical) - 1.5).abs() < f64::EPSILON);
        assert!((trend_modifier(PerformanceTrend::Unknown) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mou_factor_worked_example() {
        // Panama tanker with an unlisted class society: 50 * 1.1 * 1.2
        let v = vessel("Tanker", "Panama", "RINA");
        assert!((mou_factor(&v) - 66.0).abs() < 1e-9);
    }

    #[test]
    fn test_mou_factor_discounted_profile() {
        // Japanese container ship classed by DNV: 50 * 0.8 * 0.85 * 0.9
        let v = vessel("Container", "Japan", "DNV");
        assert!((mou_factor(&v) - 30.6).abs() < 1e-9);
    }

    #[test]
    fn test_mou_factor_defaults_to_base() {
        let v = vessel("General Cargo", "Liberia", "NK");
        assert!((mou_factor(&v) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_modifier_tables() {
        assert!((flag_modifier("Marshall Islands") - 1.1).abs() < f64::EPSILON);
        assert!((flag_modifier("Korea") - 0.9).abs() < f64::EPSILON);
        assert!((flag_modifier("Norway") - 0.8).abs() < f64::EPSILON);
        assert!((flag_modifier("Liberia") - 1.0).abs() < f64::EPSILON);
        assert!((type_modifier("Tanker") - 1.2).abs() < f64::EPSILON);
        assert!((type_modifier("Container") - 0.85).abs() < f64::EPSILON);
        assert!((type_modifier("Heavy Lift") - 1.0).abs() < f64::EPSILON);
        assert!((class_modifier("KR") - 0.9).abs() < f64::EPSILON);
        assert!((class_modifier("RINA") - 1.0).abs() < f64::EPSILON);
        assert!((class_modifier("Unknown") - 1.0).abs() < f64::EPSILON);
    }
}
