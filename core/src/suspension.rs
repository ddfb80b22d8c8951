use serde::{Deserialize, Serialize};

use crate::models::TelemetrySample;
use crate::types::AnalysisCfg;

/// Plattformvarsel når snittvandring går over dette (prosent av total vandring).
pub const RIDE_HEIGHT_ISSUE_PCT: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspensionSummary {
    pub samples: usize,
    pub avg_front_travel_pct: f64,
    pub avg_rear_travel_pct: f64,
    pub front_bumpstop_hits: usize,
    pub rear_bumpstop_hits: usize,
    pub ride_height_issues: bool,
}

impl SuspensionSummary {
    /// Fronten slår i bumpstop oftere enn grensen tillater.
    pub fn front_bottoming(&self, cfg: &AnalysisCfg) -> bool {
        self.front_bumpstop_hits > cfg.bumpstop_hit_limit
    }
}

/// Oppsummerer fjæringsvandring. `None` når ingen samples har kanalen.
pub fn summarize_suspension(samples: &[TelemetrySample], cfg: &AnalysisCfg) -> Option<SuspensionSummary> {
    let mut n = 0usize;
    let mut sum_f = 0.0;
    let mut sum_r = 0.0;
    let mut hits_f = 0usize;
    let mut hits_r = 0usize;

    for s in samples {
        let Some([lf, rf, lr, rr]) = s.suspension_travel_pct else { continue };
        let front = 0.5 * (lf + rf);
        let rear = 0.5 * (lr + rr);
        if !front.is_finite() || !rear.is_finite() {
            continue;
        }

        n += 1;
        sum_f += front;
        sum_r += rear;
        if front > cfg.bumpstop_travel_pct { hits_f += 1; }
        if rear > cfg.bumpstop_travel_pct { hits_r += 1; }
    }

    if n == 0 {
        return None;
    }

    let avg_f = sum_f / n as f64;
    let avg_r = sum_r / n as f64;
    Some(SuspensionSummary {
        samples: n,
        avg_front_travel_pct: avg_f,
        avg_rear_travel_pct: avg_r,
        front_bumpstop_hits: hits_f,
        rear_bumpstop_hits: hits_r,
        ride_height_issues: avg_f > RIDE_HEIGHT_ISSUE_PCT || avg_r > RIDE_HEIGHT_ISSUE_PCT,
    })
}
