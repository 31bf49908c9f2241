//! Fleetrisk Headless Validation Harness
//!
//! Validates the pure risk logic against the bundled demo fleet.
//! Runs entirely in-process, no files written, no networking, no UI.
//!
//! Usage:
//!   cargo run -p fleetrisk-simtest
//!   cargo run -p fleetrisk-simtest -- --verbose

use fleetrisk_logic::advisory::{advise_vessel, TrendDirection};
use fleetrisk_logic::factors::{age_factor, history_factor, mou_factor};
use fleetrisk_logic::fleet::{generate_fleet_report, score_fleet, DEFAULT_TOP_RISK_COUNT};
use fleetrisk_logic::matrix::generate_matrix;
use fleetrisk_logic::scenario::{simulate_scenario, ScenarioParams};
use fleetrisk_logic::scoring::{
    score_vessel, score_vessel_cached, RiskCategory, ScoreCache,
};
use fleetrisk_logic::vessel::{
    FleetKpis, InspectionAnalytics, InspectionSummary, VesselMaster, VesselRecord,
};
use serde::Deserialize;

// ── Demo datasets (same JSON an external loader would feed the core) ────
const VESSEL_MASTER_JSON: &str = include_str!("../../../data/vessel_master.json");
const INSPECTION_FACT_JSON: &str = include_str!("../../../data/inspection_fact.json");

#[derive(Debug, Deserialize)]
struct VesselMasterFile {
    vessels: Vec<VesselRecord>,
}

#[derive(Debug, Deserialize)]
struct InspectionFactFile {
    vessel_performance: Vec<InspectionSummary>,
    fleet_kpis: FleetKpisSection,
    compliance_kpis: ComplianceKpisSection,
}

#[derive(Debug, Deserialize)]
struct FleetKpisSection {
    total_inspections: u64,
}

#[derive(Debug, Deserialize)]
struct ComplianceKpisSection {
    total_deficiencies: u64,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Fleetrisk Validation Harness ===\n");

    let (master, analytics) = match load_datasets() {
        Ok(data) => data,
        Err(e) => {
            log::error!("dataset load failed: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Dataset sanity
    results.extend(validate_datasets(&master, &analytics));

    // 2. Factor calculators
    results.extend(validate_factors(&master, &analytics));

    // 3. Composite scoring and categories
    results.extend(validate_scoring(&master, &analytics));

    // 4. Risk matrix bucketing
    results.extend(validate_matrix(&master, &analytics));

    // 5. Scenario simulation and ROI
    results.extend(validate_scenarios(&master, &analytics));

    // 6. Fleet report and advisory
    results.extend(validate_fleet_report(&master, &analytics));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }

    print_digest(&master, &analytics);
}

fn load_datasets() -> Result<(VesselMaster, InspectionAnalytics), String> {
    let master_file: VesselMasterFile = serde_json::from_str(VESSEL_MASTER_JSON)
        .map_err(|e| format!("vessel master parse error: {}", e))?;
    let fact_file: InspectionFactFile = serde_json::from_str(INSPECTION_FACT_JSON)
        .map_err(|e| format!("inspection fact parse error: {}", e))?;

    log::info!("loaded {} vessel master records", master_file.vessels.len());
    log::info!(
        "loaded {} vessel performance summaries, {} inspections, {} deficiencies fleet-wide",
        fact_file.vessel_performance.len(),
        fact_file.fleet_kpis.total_inspections,
        fact_file.compliance_kpis.total_deficiencies
    );

    let master = VesselMaster::from_records(master_file.vessels);
    let analytics = InspectionAnalytics::from_summaries(
        fact_file.vessel_performance,
        FleetKpis {
            total_inspections: fact_file.fleet_kpis.total_inspections,
            total_deficiencies: fact_file.compliance_kpis.total_deficiencies,
        },
    );
    Ok((master, analytics))
}

// ── 1. Dataset sanity ───────────────────────────────────────────────────

fn validate_datasets(master: &VesselMaster, analytics: &InspectionAnalytics) -> Vec<TestResult> {
    println!("--- Datasets ---");
    let mut results = Vec::new();

    results.push(check(
        "master_not_empty",
        !master.is_empty(),
        format!("{} vessels", master.len()),
    ));
    results.push(check(
        "analytics_not_empty",
        !analytics.is_empty(),
        format!("{} summaries", analytics.len()),
    ));

    let bad_ages = master.records().filter(|v| v.age_years < 0.0).count();
    results.push(check(
        "ages_non_negative",
        bad_ages == 0,
        format!("{} records with negative age", bad_ages),
    ));

    let bad_rates = analytics
        .summaries()
        .filter(|s| {
            !(0.0..=100.0).contains(&s.detention_rate) || !(0.0..=100.0).contains(&s.clean_rate)
        })
        .count();
    results.push(check(
        "rates_within_percent_range",
        bad_rates == 0,
        format!("{} summaries out of range", bad_rates),
    ));

    // the demo data deliberately ships one orphan summary and one
    // uninspected vessel to exercise both degraded paths
    let orphans = analytics
        .names()
        .filter(|name| !master.contains(name))
        .count();
    results.push(check(
        "orphan_summary_present",
        orphans == 1,
        format!("{} summaries without master records", orphans),
    ));
    let uninspected = master
        .names()
        .filter(|name| analytics.get(name).is_none())
        .count();
    results.push(check(
        "uninspected_vessel_present",
        uninspected >= 1,
        format!("{} vessels without inspection data", uninspected),
    ));

    results
}

// ── 2. Factor calculators ───────────────────────────────────────────────

fn validate_factors(master: &VesselMaster, analytics: &InspectionAnalytics) -> Vec<TestResult> {
    println!("--- Factor Calculators ---");
    let mut results = Vec::new();

    results.push(check(
        "age_band_entry_half_value",
        approx(age_factor(0.0), 5.0) && approx(age_factor(5.0), 12.5),
        format!("age 0 -> {}, age 5 -> {}", age_factor(0.0), age_factor(5.0)),
    ));
    results.push(check(
        "age_old_band_midpoint",
        approx(age_factor(30.0), 56.25),
        format!("age 30 -> {}", age_factor(30.0)),
    ));
    results.push(check(
        "age_open_top_band_maxes_out",
        approx(age_factor(36.0), 100.0) && approx(age_factor(95.0), 100.0),
        format!("age 36 -> {}, age 95 -> {}", age_factor(36.0), age_factor(95.0)),
    ));

    results.push(check(
        "history_neutral_without_record",
        approx(history_factor(None), 50.0),
        format!("-> {}", history_factor(None)),
    ));
    let young_shin_history = history_factor(analytics.get("YOUNG SHIN"));
    results.push(check(
        "history_worked_example",
        approx(young_shin_history, 39.5),
        format!("YOUNG SHIN -> {}", young_shin_history),
    ));

    let young_shin_mou = master.get("YOUNG SHIN").map(mou_factor).unwrap_or(-1.0);
    results.push(check(
        "mou_worked_example",
        approx(young_shin_mou, 66.0),
        format!("YOUNG SHIN -> {}", young_shin_mou),
    ));

    let clamped = master
        .records()
        .map(|v| mou_factor(v))
        .chain(analytics.summaries().map(|s| history_factor(Some(s))))
        .all(|f| (0.0..=100.0).contains(&f));
    results.push(check(
        "factors_stay_in_range",
        clamped,
        "all factors within 0..100".to_string(),
    ));

    results
}

// ── 3. Composite scoring ────────────────────────────────────────────────

fn validate_scoring(master: &VesselMaster, analytics: &InspectionAnalytics) -> Vec<TestResult> {
    println!("--- Scoring ---");
    let mut results = Vec::new();

    match score_vessel(master, analytics, "YOUNG SHIN") {
        Ok(assessment) => {
            results.push(check(
                "composite_worked_example",
                approx(assessment.risk_score, 51.5)
                    && assessment.risk_category == RiskCategory::High,
                format!(
                    "YOUNG SHIN -> {} {}",
                    assessment.risk_score, assessment.risk_category
                ),
            ));
            let again = score_vessel(master, analytics, "YOUNG SHIN");
            results.push(check(
                "scoring_idempotent",
                again.as_ref().ok() == Some(&assessment),
                "same inputs, same assessment".to_string(),
            ));
        }
        Err(e) => results.push(check("composite_worked_example", false, e.to_string())),
    }

    // neutral history path for the uninspected vessel
    match score_vessel(master, analytics, "SILVER GULL") {
        Ok(assessment) => results.push(check(
            "uninspected_scores_neutral_history",
            approx(assessment.factor_breakdown.history_factor, 50.0),
            format!("history -> {}", assessment.factor_breakdown.history_factor),
        )),
        Err(e) => results.push(check("uninspected_scores_neutral_history", false, e.to_string())),
    }

    // the orphan summary must fail cleanly, not abort anything
    let orphan = score_vessel(master, analytics, "WANDERING STAR");
    results.push(check(
        "orphan_vessel_not_found",
        orphan.is_err(),
        format!("{:?}", orphan.err().map(|e| e.to_string())),
    ));

    let mut cache = ScoreCache::new();
    let first = score_vessel_cached(master, analytics, "HAE SHIN", &mut cache);
    let second = score_vessel_cached(master, analytics, "HAE SHIN", &mut cache);
    results.push(check(
        "cache_serves_repeat_lookups",
        first.is_ok() && first.ok() == second.ok() && cache.len() == 1,
        format!("{} entries cached", cache.len()),
    ));

    results
}

// ── 4. Risk matrix ──────────────────────────────────────────────────────

fn validate_matrix(master: &VesselMaster, analytics: &InspectionAnalytics) -> Vec<TestResult> {
    println!("--- Risk Matrix ---");
    let mut results = Vec::new();

    let scores = score_fleet(master, analytics);
    let matrix = generate_matrix(&scores.assessments);

    let cell_total: u32 = matrix.counts.iter().flatten().sum();
    results.push(check(
        "cell_counts_sum_to_scored",
        cell_total as usize == scores.assessments.len(),
        format!("{} cells vs {} scored", cell_total, scores.assessments.len()),
    ));

    results.push(check(
        "errored_vessels_excluded",
        matrix.total_vessels == analytics.len() - scores.failures.len(),
        format!(
            "{} in matrix, {} failures",
            matrix.total_vessels,
            scores.failures.len()
        ),
    ));

    results.push(check(
        "fixed_grid_high_risk_cells",
        matrix.high_risk_cells() == 4,
        format!("{} cells above level 15", matrix.high_risk_cells()),
    ));

    let levels_ok = (0..5).all(|row| {
        (0..5).all(|col| matrix.risk_levels[row][col] as usize == (5 - row) * (col + 1))
    });
    results.push(check(
        "risk_level_grid_formula",
        levels_ok,
        "(5 - row) * (col + 1) everywhere".to_string(),
    ));

    // the small, old general cargo ship drops one severity row
    let orient = scores
        .assessments
        .iter()
        .find(|a| a.vessel_name == "ORIENT PIONEER");
    let placed_down = orient.is_some_and(|a| {
        let severity = fleetrisk_logic::matrix::severity_index(a.risk_score, a.vessel_info.dwt);
        severity < fleetrisk_logic::matrix::probability_index(a.risk_score)
    });
    results.push(check(
        "small_vessel_severity_shift",
        placed_down,
        "ORIENT PIONEER sits below its score band".to_string(),
    ));

    results
}

// ── 5. Scenario simulation ──────────────────────────────────────────────

fn validate_scenarios(master: &VesselMaster, analytics: &InspectionAnalytics) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    let noop = simulate_scenario(
        master,
        analytics,
        "training_impact",
        &ScenarioParams {
            defect_reduction_pct: 0.0,
            ..ScenarioParams::default()
        },
    );
    let noop_exact = noop
        .vessels_analyzed
        .iter()
        .all(|i| i.baseline_score == i.modified_score);
    results.push(check(
        "zero_reduction_noop",
        noop_exact && !noop.vessels_analyzed.is_empty(),
        format!("{} vessels unchanged", noop.vessels_analyzed.len()),
    ));

    let training = simulate_scenario(master, analytics, "training_impact", &ScenarioParams::default());
    results.push(check(
        "training_impact_improves_fleet",
        training.summary.vessels_improved > 0 && training.summary.average_risk_reduction > 0.0,
        format!(
            "{} improved, avg reduction {}",
            training.summary.vessels_improved, training.summary.average_risk_reduction
        ),
    ));
    results.push(check(
        "training_roi_uses_cost_table",
        approx(training.summary.roi_estimate.estimated_cost, 50_000.0),
        format!("cost {}", training.summary.roi_estimate.estimated_cost),
    ));

    let maintenance = simulate_scenario(
        master,
        analytics,
        "maintenance_improvement",
        &ScenarioParams::default(),
    );
    results.push(check(
        "maintenance_improvement_runs",
        !maintenance.vessels_analyzed.is_empty()
            && approx(maintenance.summary.roi_estimate.estimated_cost, 200_000.0),
        format!(
            "{} analyzed, cost {}",
            maintenance.vessels_analyzed.len(),
            maintenance.summary.roi_estimate.estimated_cost
        ),
    ));

    let unknown = simulate_scenario(master, analytics, "crew_rotation", &ScenarioParams::default());
    if unknown.vessels_analyzed.is_empty() {
        log::warn!("scenario 'crew_rotation' produced an empty analysis");
    }
    results.push(check(
        "unknown_scenario_empty_analysis",
        unknown.vessels_analyzed.is_empty()
            && unknown.summary.roi_estimate.payback_period_years.is_infinite(),
        format!(
            "{} analyzed, payback {}",
            unknown.vessels_analyzed.len(),
            unknown.summary.roi_estimate.payback_period_years
        ),
    ));

    let flag = simulate_scenario(master, analytics, "flag_change", &ScenarioParams::default());
    results.push(check(
        "flag_change_priced_not_simulated",
        flag.vessels_analyzed.is_empty()
            && approx(flag.summary.roi_estimate.estimated_cost, 25_000.0),
        format!("cost {}", flag.summary.roi_estimate.estimated_cost),
    ));

    results
}

// ── 6. Fleet report and advisory ────────────────────────────────────────

fn validate_fleet_report(master: &VesselMaster, analytics: &InspectionAnalytics) -> Vec<TestResult> {
    println!("--- Fleet Report ---");
    let mut results = Vec::new();

    let report = generate_fleet_report(master, analytics, DEFAULT_TOP_RISK_COUNT);

    results.push(check(
        "overview_matches_details",
        report.fleet_overview.total_vessels == report.vessel_details.len()
            && report.fleet_overview.risk_distribution.total() as usize
                == report.vessel_details.len(),
        format!("{} vessels", report.fleet_overview.total_vessels),
    ));

    results.push(check(
        "matrix_summary_matches_overview",
        report.risk_matrix_summary.total_vessels_in_matrix == report.fleet_overview.total_vessels,
        format!(
            "{} in matrix",
            report.risk_matrix_summary.total_vessels_in_matrix
        ),
    ));

    let sorted = report
        .top_risk_vessels
        .windows(2)
        .all(|pair| pair[0].risk_score >= pair[1].risk_score);
    results.push(check(
        "top_risks_sorted_descending",
        sorted && report.top_risk_vessels.len() <= DEFAULT_TOP_RISK_COUNT,
        format!("{} listed", report.top_risk_vessels.len()),
    ));

    // the demo fleet carries one critical vessel, so the emergency
    // recommendation must fire
    let has_emergency = report
        .fleet_recommendations
        .iter()
        .any(|r| r.category == "Emergency Fleet Management");
    results.push(check(
        "emergency_recommendation_fires",
        has_emergency == (report.fleet_overview.critical_risk_vessels > 0),
        format!(
            "{} critical vessels",
            report.fleet_overview.critical_risk_vessels
        ),
    ));

    match advise_vessel(master, analytics, "ORIENT PIONEER") {
        Ok(advisory) => {
            results.push(check(
                "advisory_flags_critical_vessel",
                !advisory.recommendations.is_empty()
                    && advisory.risk_trend.direction == TrendDirection::RapidlyIncreasing,
                format!(
                    "{} recommendations, trend {:?}",
                    advisory.recommendations.len(),
                    advisory.risk_trend.direction
                ),
            ));
        }
        Err(e) => results.push(check("advisory_flags_critical_vessel", false, e.to_string())),
    }

    results
}

// ── Digest ──────────────────────────────────────────────────────────────

fn print_digest(master: &VesselMaster, analytics: &InspectionAnalytics) {
    let report = generate_fleet_report(master, analytics, DEFAULT_TOP_RISK_COUNT);
    let training = simulate_scenario(master, analytics, "training_impact", &ScenarioParams::default());

    println!("\n--- Fleet Digest ---");
    println!(
        "Vessels scored: {} (avg risk {})",
        report.fleet_overview.total_vessels, report.fleet_overview.average_risk_score
    );
    println!(
        "High risk: {}, critical: {}",
        report.fleet_overview.high_risk_vessels, report.fleet_overview.critical_risk_vessels
    );
    if let Some(top) = report.top_risk_vessels.first() {
        println!(
            "Top risk vessel: {} ({} {}, driven by {})",
            top.vessel_name, top.risk_score, top.risk_category, top.primary_risk_factor
        );
    }
    println!(
        "Training scenario: {} of {} vessels improve, 5-year ROI {}%",
        training.summary.vessels_improved,
        training.summary.total_vessels,
        training.summary.roi_estimate.roi_5yr_pct
    );
}
