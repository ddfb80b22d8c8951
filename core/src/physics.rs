// core/src/physics.rs
use crate::models::{SetupConfig, TelemetrySample};
use crate::setup_impact::SetupBias;
use crate::types::{AnalysisCfg, AnalysisPoint, HandlingState};

pub const G: f64 = 9.80665;          // gravitasjon (m/s²)
pub const MIN_V_MS: f64 = 1.0;       // hastighetsgulv (m/s) mot deling på ~0
pub const MIN_G_DIVISOR: f64 = 0.1;  // nevner-gulv for |lateral_g|
pub const MIN_CURVATURE: f64 = 1e-3; // 1/m, normering for krumningsavvik

// --- RoundTo trait (offentlig, brukt av anbefalingene) ---
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

#[inline]
fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }

/// Klassifisering fra gradient. Samme terskler brukes overalt (glatting inkludert).
#[inline]
pub fn classify_gradient(gradient: f64, cfg: &AnalysisCfg) -> HandlingState {
    if gradient > cfg.understeer_threshold {
        HandlingState::Understeer
    } else if gradient < cfg.oversteer_threshold {
        HandlingState::Oversteer
    } else {
        HandlingState::Neutral
    }
}

/// Predikert giring (rad/s) fra en-spors (sykkel-)modellen.
pub fn bicycle_yaw_rate(speed_ms: f64, steer_angle_deg: f64, setup: &SetupConfig) -> f64 {
    let v = speed_ms.max(MIN_V_MS);
    let road_wheel_rad = (steer_angle_deg / setup.steering_ratio()).to_radians();
    v * road_wheel_rad.tan() / setup.wheelbase()
}

/// Samme som over, i grader/s og med km/t inn (grensesnitt-enheter).
pub fn bicycle_yaw_rate_deg_s(speed_kph: f64, steer_angle_deg: f64, setup: &SetupConfig) -> f64 {
    bicycle_yaw_rate(speed_kph / 3.6, steer_angle_deg, setup).to_degrees()
}

/// Konfidens 0–100 fra to uavhengige krumningsestimat (giring vs. lateral-G).
pub fn curvature_confidence(v_ms: f64, yaw_rate_rad_s: f64, lateral_g: f64) -> f64 {
    let v = v_ms.max(MIN_V_MS);
    let k_yaw = yaw_rate_rad_s / v;
    let k_lat = lateral_g * G / (v * v);
    let scale = k_yaw.abs().max(k_lat.abs()).max(MIN_CURVATURE);
    let disagreement = (k_yaw - k_lat).abs() / scale;
    let c = 100.0 - 100.0 * disagreement;
    if c.is_finite() { clamp(c, 0.0, 100.0) } else { 0.0 }
}

fn degraded_point(sample: &TelemetrySample) -> AnalysisPoint {
    AnalysisPoint {
        source_sample: *sample,
        gradient: 0.0,
        raw_gradient: 0.0,
        state: HandlingState::Neutral,
        severity: 0.0,
        confidence: 0.0,
        theoretical_yaw_rate_deg_s: 0.0,
    }
}

/// Understeer-gradient for ett sample med gitte terskler.
///
/// Fortegnet normaliseres mot svingretningen (fortegnet til lateral-G), slik at
/// positiv verdi betyr at bilen roterer mindre enn modellen forventer.
pub fn compute_gradient_with(
    sample: &TelemetrySample,
    setup: &SetupConfig,
    bias: &SetupBias,
    cfg: &AnalysisCfg,
) -> AnalysisPoint {
    let v = sample.speed_ms().max(MIN_V_MS);
    let theoretical = bicycle_yaw_rate(v, sample.steer_angle_deg, setup);
    let measured = sample.yaw_rate_deg_s.to_radians();
    let lat = sample.lateral_g;

    let raw = if lat.abs() > cfg.min_lateral_g {
        let dir = lat.signum();
        dir * (theoretical - measured) / lat.abs().max(MIN_G_DIVISOR) + bias.net()
    } else {
        0.0
    };

    let confidence = curvature_confidence(v, measured, lat);

    if !raw.is_finite() || !theoretical.is_finite() || !lat.is_finite() || !measured.is_finite() {
        return degraded_point(sample);
    }

    let limit = cfg.gradient_clamp.abs();
    let gradient = clamp(raw, -limit, limit);

    AnalysisPoint {
        source_sample: *sample,
        gradient,
        raw_gradient: gradient,
        state: classify_gradient(gradient, cfg),
        severity: gradient.abs(),
        confidence,
        theoretical_yaw_rate_deg_s: theoretical.to_degrees(),
    }
}

/// Tynn wrapper med standard terskler.
pub fn compute_gradient(sample: &TelemetrySample, setup: &SetupConfig, bias: &SetupBias) -> AnalysisPoint {
    compute_gradient_with(sample, setup, bias, &AnalysisCfg::default())
}

/// Fyll distance fra v*dt hvis distance mangler i alle samples.
pub fn fill_distance_if_missing(samples: &mut [TelemetrySample]) {
    if samples.is_empty() || samples.iter().any(|s| s.distance_m.is_some()) {
        return;
    }

    let mut dist = 0.0;
    for i in 0..samples.len() {
        let dt = if i == 0 { 0.0 } else { (samples[i].time_s - samples[i - 1].time_s).max(0.0) };
        let v = samples[i].speed_ms();
        if dt.is_finite() && v.is_finite() {
            dist += v * dt;
        }
        samples[i].distance_m = Some(dist);
    }
}
