use serde::{Deserialize, Serialize};

use crate::physics::classify_gradient;
use crate::types::{AnalysisCfg, AnalysisPoint};

/// Vindu tvinges til oddetall slik at midtpunktet er veldefinert (0 => 1).
#[inline]
pub fn odd_window(window: usize) -> usize {
    match window {
        0 => 1,
        w if w % 2 == 0 => w + 1,
        w => w,
    }
}

/// Sentrert glidende gjennomsnitt. Vinduet krymper ved endene (ingen padding,
/// ingen wrap), så lengden ut er alltid lik lengden inn.
pub fn smooth_series(values: &[f64], window: usize) -> Vec<f64> {
    let w = odd_window(window);
    if w == 1 || values.is_empty() {
        return values.to_vec();
    }

    let k = w / 2;
    let n = values.len();
    let mut out = vec![0.0; n];

    for i in 0..n {
        let a = i.saturating_sub(k);
        let b = (i + k + 1).min(n);
        let s: f64 = values[a..b].iter().sum();
        out[i] = s / (b - a) as f64;
    }

    out
}

/// Glatter gradientserien og reklassifiserer med samme terskler som per sample.
/// Returnerer nye punkter; `raw_gradient` beholdes urørt.
pub fn smooth_gradients(points: &[AnalysisPoint], window: usize, cfg: &AnalysisCfg) -> Vec<AnalysisPoint> {
    let raw: Vec<f64> = points.iter().map(|p| p.gradient).collect();
    let smoothed = smooth_series(&raw, window);

    points
        .iter()
        .zip(smoothed)
        .map(|(p, g)| {
            let g = if g.is_finite() { g } else { 0.0 };
            AnalysisPoint {
                gradient: g,
                state: classify_gradient(g, cfg),
                severity: g.abs(),
                ..*p
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Vinkelrett avstand fra `p` til linjen gjennom `a` og `b`.
/// Degenerert korde (a == b) gir punktavstand til `a`.
fn perpendicular_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len <= f64::EPSILON {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    ((dy * p.x - dx * p.y + b.x * a.y - b.y * a.x) / len).abs()
}

fn rdp_mark(points: &[Point2], first: usize, last: usize, epsilon: f64, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }

    // første punkt med størst avstand vinner ved likhet
    let mut max_d = 0.0;
    let mut idx = first;
    for i in (first + 1)..last {
        let d = perpendicular_distance(points[i], points[first], points[last]);
        if d > max_d {
            max_d = d;
            idx = i;
        }
    }

    if max_d > epsilon {
        keep[idx] = true;
        rdp_mark(points, first, idx, epsilon, keep);
        rdp_mark(points, idx, last, epsilon, keep);
    }
}

/// Ramer-Douglas-Peucker. Endepunktene beholdes alltid; negativ eller
/// ikke-finit `epsilon` behandles som 0.
pub fn simplify_rdp(points: &[Point2], epsilon: f64) -> Vec<Point2> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let eps = if epsilon.is_finite() { epsilon.max(0.0) } else { 0.0 };

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    rdp_mark(points, 0, points.len() - 1, eps, &mut keep);

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| if k { Some(*p) } else { None })
        .collect()
}
