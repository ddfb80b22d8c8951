use crate::models::TelemetrySample;
use crate::smoothing::{simplify_rdp, Point2};

/// Baneskisse ved dødregning: kurs integreres fra giring, posisjon fra fart.
/// Første punkt ligger i origo med kurs langs +x.
pub fn reconstruct_trajectory(samples: &[TelemetrySample]) -> Vec<Point2> {
    let mut out = Vec::with_capacity(samples.len());
    if samples.is_empty() {
        return out;
    }

    let mut x = 0.0;
    let mut y = 0.0;
    let mut heading = 0.0f64; // rad
    out.push(Point2::new(x, y));

    for w in samples.windows(2) {
        let dt = (w[1].time_s - w[0].time_s).max(0.0);
        if !dt.is_finite() {
            out.push(Point2::new(x, y));
            continue;
        }

        // midtpunkt mellom to samples
        let yaw = 0.5 * (w[0].yaw_rate_deg_s + w[1].yaw_rate_deg_s);
        let v = 0.5 * (w[0].speed_ms() + w[1].speed_ms());
        if yaw.is_finite() {
            heading += yaw.to_radians() * dt;
        }
        if v.is_finite() {
            x += v * dt * heading.cos();
            y += v * dt * heading.sin();
        }
        out.push(Point2::new(x, y));
    }

    out
}

/// Forenklet baneskisse for tegning (RDP med toleranse i meter).
pub fn track_map(samples: &[TelemetrySample], tolerance_m: f64) -> Vec<Point2> {
    let full = reconstruct_trajectory(samples);
    let simplified = simplify_rdp(&full, tolerance_m);
    log::debug!("track map: {} -> {} points (eps={tolerance_m} m)", full.len(), simplified.len());
    simplified
}
