use chrono::Utc;

use crate::corners::scan_corners;
use crate::error::AnalysisError;
use crate::latest::LatestResult;
use crate::metrics::PipelineMetrics;
use crate::models::{SetupConfig, TelemetrySample};
use crate::physics::{compute_gradient_with, fill_distance_if_missing};
use crate::recommendations::{balance_stats, recommend_for_issue, RecommendationContext};
use crate::setup_impact::compute_setup_bias;
use crate::smoothing::smooth_gradients;
use crate::suspension::summarize_suspension;
use crate::types::{AnalysisCfg, BalanceReport, BalanceStats, HandlingState};

/// Én setning som oppsummerer økten.
pub fn summary_sentence(car_name: Option<&str>, stats: &BalanceStats) -> String {
    let car = car_name.unwrap_or("the car");
    let behaviour = match stats.primary_issue {
        HandlingState::Understeer => "significant understeer",
        HandlingState::Oversteer => "significant oversteer",
        HandlingState::Neutral => "a generally balanced behaviour",
    };
    format!(
        "Analysis for {car} reveals {behaviour} over {} corners ({:.1}% understeer, {:.1}% oversteer).",
        stats.corner_count, stats.pct_understeer, stats.pct_oversteer
    )
}

/// Hele pipelinen: bias → gradient → glatting → svinger → anbefalinger.
/// Tom økt er eneste feil; alt annet rapporteres som data.
pub fn analyze_session(
    samples: &[TelemetrySample],
    setup: &SetupConfig,
    cfg: &AnalysisCfg,
) -> Result<BalanceReport, AnalysisError> {
    run(samples, setup, cfg, None)
}

/// Som `analyze_session`, men teller opp i `metrics`.
pub fn analyze_session_observed(
    samples: &[TelemetrySample],
    setup: &SetupConfig,
    cfg: &AnalysisCfg,
    metrics: &PipelineMetrics,
) -> Result<BalanceReport, AnalysisError> {
    run(samples, setup, cfg, Some(metrics))
}

fn run(
    samples: &[TelemetrySample],
    setup: &SetupConfig,
    cfg: &AnalysisCfg,
    metrics: Option<&PipelineMetrics>,
) -> Result<BalanceReport, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptySession);
    }

    // 1) distance løses én gang, på en kopi
    let mut samples = samples.to_vec();
    fill_distance_if_missing(&mut samples);

    // 2) oppsett → bias
    let bias = compute_setup_bias(setup);

    // 3) gradient per sample
    let raw: Vec<_> = samples
        .iter()
        .map(|s| compute_gradient_with(s, setup, &bias, cfg))
        .collect();

    // 4) glatting
    let points = smooth_gradients(&raw, cfg.smoothing_window, cfg);
    log::debug!(
        "gradients: {} samples, bias net {:+.4}, smoothing window {}",
        points.len(),
        bias.net(),
        cfg.smoothing_window
    );

    // 5) svinger
    let scan = scan_corners(&points, cfg);
    if scan.corners.is_empty() {
        log::warn!("no corners above {:.2} g found; balance defaults to neutral", cfg.corner_entry_g);
    }

    // 6) anbefalinger
    let suspension = summarize_suspension(&samples, cfg);
    let ctx = RecommendationContext {
        front_bottoming: suspension.as_ref().map(|s| s.front_bottoming(cfg)).unwrap_or(false),
    };
    let stats = balance_stats(&scan.corners, cfg);
    let recommendations = recommend_for_issue(stats.primary_issue, setup, cfg, &ctx);

    let low_conf = points.iter().filter(|p| p.confidence < cfg.confidence_floor).count();
    if let Some(m) = metrics {
        m.runs_total.inc();
        m.samples_total.inc_by(points.len() as u64);
        m.low_confidence_samples_total.inc_by(low_conf as u64);
        m.corners_total.inc_by(scan.corners.len() as u64);
        m.corners_discarded_total.inc_by(scan.discarded_runs as u64);
    }

    log::info!(
        "analysed {} samples: {} corners ({} discarded), {} low-confidence, primary issue {}",
        points.len(),
        scan.corners.len(),
        scan.discarded_runs,
        low_conf,
        stats.primary_issue.label()
    );

    Ok(BalanceReport {
        car_name: setup.car_name.clone(),
        generated_at: Utc::now(),
        summary: summary_sentence(setup.car_name.as_deref(), &stats),
        stats,
        points,
        corners: scan.corners,
        recommendations,
        suspension,
    })
}

/// Kjører en analyse og publiserer den i `slot` bare hvis ingen nyere kjøring
/// har startet i mellomtiden. Returnerer `Ok(true)` når resultatet ble publisert.
pub fn analyze_into_latest(
    slot: &LatestResult<BalanceReport>,
    samples: &[TelemetrySample],
    setup: &SetupConfig,
    cfg: &AnalysisCfg,
    metrics: Option<&PipelineMetrics>,
) -> Result<bool, AnalysisError> {
    let ticket = slot.begin();
    let report = run(samples, setup, cfg, metrics)?;
    let accepted = slot.publish(ticket, report);
    if !accepted {
        if let Some(m) = metrics {
            m.stale_results_total.inc();
        }
    }
    Ok(accepted)
}
