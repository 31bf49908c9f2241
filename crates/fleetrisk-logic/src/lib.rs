//! Pure risk assessment logic for Fleetrisk.
//!
//! This crate contains all risk computation that is independent of any
//! dataset format, transport, or UI. Functions take plain data and return
//! results, making them unit-testable and portable across the headless
//! harness, batch reporting jobs, and any future dashboard backend.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`advisory`] | Per-vessel recommendations, peer comparison, trend forecast |
//! | [`factors`] | Age, inspection-history, and MOU risk factor calculators |
//! | [`fleet`] | Fleet-wide aggregation, recommendations, report assembly |
//! | [`matrix`] | 5x5 probability/severity matrix bucketing |
//! | [`scenario`] | What-if factor perturbation and ROI projection |
//! | [`scoring`] | Weighted composite score, categories, per-vessel cache |
//! | [`vessel`] | Vessel master and inspection analytics data model |

pub mod advisory;
pub mod factors;
pub mod fleet;
pub mod matrix;
pub mod scenario;
pub mod scoring;
pub mod vessel;
