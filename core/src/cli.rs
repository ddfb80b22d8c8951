use std::fmt::Write as _;

use crate::physics::RoundTo;
use crate::types::{BalanceReport, HandlingState};

/// Tekstrapport for terminal eller logg.
pub fn format_balance_report(report: &BalanceReport) -> String {
    let mut out = String::new();
    let stats = &report.stats;

    // write! til String feiler ikke
    let _ = writeln!(out, "--- Handling Balance Report ---");
    let _ = writeln!(out, "Car: {}", report.car_name.as_deref().unwrap_or("unknown"));
    let _ = writeln!(out, "Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "{}", report.summary);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Corners: {}  Understeer: {:.1}%  Oversteer: {:.1}%  Neutral: {:.1}%",
        stats.corner_count, stats.pct_understeer, stats.pct_oversteer, stats.pct_neutral
    );
    let _ = writeln!(out, "Primary issue: {}", stats.primary_issue.label());

    if !report.corners.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Corners:");
        for (i, c) in report.corners.iter().enumerate() {
            let _ = writeln!(
                out,
                "  #{:<2} {:>5}-{:<5} {:?}  max {:.2} g  min {:.0} km/h  gradient {:+.3}  {} ({:.0}% conf)",
                i + 1,
                c.start_index,
                c.end_index,
                c.direction,
                c.max_lateral_g,
                c.min_speed_kph,
                c.avg_gradient,
                c.dominant_state.label(),
                c.avg_confidence
            );
        }
    }

    if let Some(s) = &report.suspension {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Suspension: front {:.1}%  rear {:.1}%  bump stops F/R {}/{}",
            s.avg_front_travel_pct, s.avg_rear_travel_pct, s.front_bumpstop_hits, s.rear_bumpstop_hits
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Recommendations:");
    for r in &report.recommendations {
        let unit = r.target_parameter.unit();
        let change = if (r.recommended_value - r.current_value).abs() > 1e-9 {
            format!(
                " ({} → {} {unit})",
                r.current_value.round_to(3),
                r.recommended_value.round_to(3)
            )
        } else {
            format!(" (keep {} {unit})", r.current_value.round_to(3))
        };
        let _ = writeln!(out, "  [{:?} / {:?}] {}{}", r.priority, r.group, r.title, change);
        let _ = writeln!(out, "      {}", r.expected_impact);
    }

    if stats.primary_issue == HandlingState::Neutral && report.corners.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "(no cornering detected, balance assumed neutral)");
    }

    out
}

pub fn print_balance_report(report: &BalanceReport) {
    print!("{}", format_balance_report(report));
}
