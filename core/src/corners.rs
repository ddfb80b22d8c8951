use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::types::{AnalysisCfg, AnalysisPoint, CornerSegment, HandlingState, TurnDirection};

/// Resultat av en skanning: beholdte svinger og antall forkastede (for korte) løp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerScan {
    pub corners: Vec<CornerSegment>,
    pub discarded_runs: usize,
}

/// Svingnivå-klassifisering: halve per-sample-tersklene, siden snittet allerede demper støy.
pub fn classify_corner(avg_gradient: f64, cfg: &AnalysisCfg) -> HandlingState {
    if avg_gradient > cfg.understeer_threshold / 2.0 {
        HandlingState::Understeer
    } else if avg_gradient < cfg.oversteer_threshold / 2.0 {
        HandlingState::Oversteer
    } else {
        HandlingState::Neutral
    }
}

fn aggregate(points: &[AnalysisPoint], start: usize, end: usize, cfg: &AnalysisCfg) -> CornerSegment {
    let run = &points[start..=end];

    let max_lateral_g = run
        .iter()
        .map(|p| OrderedFloat(p.source_sample.lateral_g.abs()))
        .max()
        .map(|v| v.0)
        .unwrap_or(0.0);

    let min_speed_kph = run
        .iter()
        .map(|p| OrderedFloat(p.source_sample.speed_kph.max(0.0)))
        .min()
        .map(|v| v.0)
        .unwrap_or(0.0);

    // kun samples over konfidensgulvet teller i snittet
    let confident: Vec<&AnalysisPoint> =
        run.iter().filter(|p| p.confidence >= cfg.confidence_floor).collect();
    let avg_gradient = if confident.is_empty() {
        0.0
    } else {
        confident.iter().map(|p| p.gradient).sum::<f64>() / confident.len() as f64
    };
    let avg_confidence = run.iter().map(|p| p.confidence).sum::<f64>() / run.len() as f64;

    let lat_sum: f64 = run.iter().map(|p| p.source_sample.lateral_g).sum();
    let direction = if lat_sum < 0.0 { TurnDirection::Left } else { TurnDirection::Right };

    let length_m = match (run[0].source_sample.distance_m, run[run.len() - 1].source_sample.distance_m) {
        (Some(a), Some(b)) if (b - a).is_finite() => (b - a).max(0.0),
        _ => 0.0,
    };

    CornerSegment {
        start_index: start,
        end_index: end,
        direction,
        max_lateral_g,
        min_speed_kph,
        avg_gradient,
        dominant_state: classify_corner(avg_gradient, cfg),
        sample_count: run.len(),
        confident_samples: confident.len(),
        avg_confidence,
        length_m,
    }
}

/// Skanner sekvensielt; et løp åpnes når |lateral_g| > inngangsterskel og lukkes
/// på første sample som faller til eller under den (eller ved slutten av serien).
pub fn scan_corners(points: &[AnalysisPoint], cfg: &AnalysisCfg) -> CornerScan {
    let mut scan = CornerScan::default();
    let mut open: Option<usize> = None;

    let close = |start: usize, end: usize, scan: &mut CornerScan| {
        let count = end + 1 - start;
        if count > cfg.min_corner_samples {
            scan.corners.push(aggregate(points, start, end, cfg));
        } else {
            scan.discarded_runs += 1;
        }
    };

    for (i, p) in points.iter().enumerate() {
        let above = p.source_sample.lateral_g.abs() > cfg.corner_entry_g;
        match (open, above) {
            (None, true) => open = Some(i),
            (Some(start), false) => {
                close(start, i - 1, &mut scan);
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        close(start, points.len() - 1, &mut scan);
    }

    log::debug!(
        "corner scan: {} kept, {} discarded as noise",
        scan.corners.len(),
        scan.discarded_runs
    );
    scan
}

/// Standardterskler; returnerer kun beholdte svinger i kronologisk rekkefølge.
pub fn segment_corners(points: &[AnalysisPoint]) -> Vec<CornerSegment> {
    scan_corners(points, &AnalysisCfg::default()).corners
}
