//! Fleet reference data: vessel master records and inspection analytics.
//!
//! Both collections are owned by external collaborators (a vessel master
//! service and an inspection analytics pipeline) and are read-only here.
//! Lookup is by vessel name, the unique key across both datasets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Qualitative inspection performance trend for a vessel.
///
/// Unrecognized labels in source data deserialize to [`Unknown`]
/// rather than failing, and carry the neutral history modifier.
///
/// [`Unknown`]: PerformanceTrend::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum PerformanceTrend {
    Excellent,
    Improving,
    Stable,
    Deteriorating,
    Critical,
    Unknown,
}

impl PerformanceTrend {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Excellent" => Self::Excellent,
            "Improving" => Self::Improving,
            "Stable" => Self::Stable,
            "Deteriorating" => Self::Deteriorating,
            "Critical" => Self::Critical,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for PerformanceTrend {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Immutable vessel master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    /// Unique key across the master and analytics datasets.
    pub vessel_name: String,
    pub age_years: f64,
    pub built_year: u32,
    /// Trade type, e.g. "PC(T)C", "Bulk", "Container", "Tanker".
    pub vessel_type: String,
    pub flag_state: String,
    pub classification_society: String,
    /// Deadweight tonnage.
    pub dwt: f64,
}

/// Aggregated inspection statistics for one vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionSummary {
    pub vessel_name: String,
    pub inspections: u32,
    pub avg_deficiencies: f64,
    /// Detention rate as a percentage (0..100).
    pub detention_rate: f64,
    /// Clean-inspection rate as a percentage (0..100).
    pub clean_rate: f64,
    pub performance_trend: PerformanceTrend,
}

/// Fleet-wide inspection counters. Informational only; scoring never
/// reads these, they exist for logging in outer layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetKpis {
    pub total_inspections: u64,
    pub total_deficiencies: u64,
}

/// Vessel master collection keyed by vessel name.
///
/// A `BTreeMap` keeps lookup O(log n) and iteration deterministic, so
/// fleet sweeps produce identical output across runs.
#[derive(Debug, Clone, Default)]
pub struct VesselMaster {
    vessels: BTreeMap<String, VesselRecord>,
}

impl VesselMaster {
    /// Build the master from a list of records. A later duplicate name
    /// replaces an earlier one.
    pub fn from_records(records: Vec<VesselRecord>) -> Self {
        let mut vessels = BTreeMap::new();
        for record in records {
            vessels.insert(record.vessel_name.clone(), record);
        }
        Self { vessels }
    }

    pub fn get(&self, name: &str) -> Option<&VesselRecord> {
        self.vessels.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vessels.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vessels.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &VesselRecord> {
        self.vessels.values()
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }
}

/// Inspection analytics collection keyed by vessel name.
///
/// Vessels without a summary are a valid state: scoring falls back to
/// the neutral history factor for them.
#[derive(Debug, Clone, Default)]
pub struct InspectionAnalytics {
    summaries: BTreeMap<String, InspectionSummary>,
    pub fleet_kpis: FleetKpis,
}

impl InspectionAnalytics {
    pub fn from_summaries(summaries: Vec<InspectionSummary>, fleet_kpis: FleetKpis) -> Self {
        let mut map = BTreeMap::new();
        for summary in summaries {
            map.insert(summary.vessel_name.clone(), summary);
        }
        Self {
            summaries: map,
            fleet_kpis,
        }
    }

    pub fn get(&self, name: &str) -> Option<&InspectionSummary> {
        self.summaries.get(name)
    }

    /// Names of every vessel with inspection data, in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.summaries.keys().map(String::as_str)
    }

    pub fn summaries(&self) -> impl Iterator<Item = &InspectionSummary> {
        self.summaries.values()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
