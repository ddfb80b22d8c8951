use serde::{Deserialize, Serialize};

use crate::models::SetupConfig;

// Lineær småforstyrrelsesmodell: hver faktor bidrar additivt og uavhengig.
pub const K_SPRING: f64 = 2000.0;   // N/mm per enhet bias
pub const K_ARB: f64 = 0.01;        // per klikk
pub const K_TOE: f64 = 0.1;         // per grad toe-in
pub const K_CAMBER: f64 = 0.01;     // per grad
pub const K_DIFF: f64 = 0.002;      // per % over nøytral
pub const K_BRAKE: f64 = 0.005;     // per % over nøytral

pub const DIFF_NEUTRAL_PCT: f64 = 50.0;
pub const BRAKE_NEUTRAL_PCT: f64 = 55.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SetupBias {
    pub understeer_bias: f64,
    pub oversteer_bias: f64,
}

impl SetupBias {
    /// Netto bidrag til gradienten (positiv = mer understeer).
    #[inline]
    pub fn net(&self) -> f64 {
        self.understeer_bias - self.oversteer_bias
    }
}

/// Ikke-finite oppsettsverdier bidrar med 0.
#[inline]
fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// Oppsett → (understeer-bias, oversteer-bias). Total funksjon, ingen clamping her.
pub fn compute_setup_bias(setup: &SetupConfig) -> SetupBias {
    let spring = finite_or_zero((setup.rear_spring_rate - setup.front_spring_rate) / K_SPRING);
    let arb = (setup.rear_arb as f64 - setup.front_arb as f64) * K_ARB;
    let toe = finite_or_zero(setup.front_toe_deg * K_TOE) - finite_or_zero(setup.rear_toe_deg * K_TOE);
    let camber = finite_or_zero(
        (setup.rear_camber_deg.abs() - setup.front_camber_deg.abs()) * K_CAMBER,
    );
    let brake = finite_or_zero((setup.brake_balance_pct - BRAKE_NEUTRAL_PCT) * K_BRAKE);
    let diff = finite_or_zero((setup.differential_power_pct - DIFF_NEUTRAL_PCT) * K_DIFF);

    let bias = SetupBias {
        understeer_bias: spring + arb + toe - camber + brake,
        oversteer_bias: diff,
    };
    log::debug!(
        "setup bias: spring={spring:.4} arb={arb:.4} toe={toe:.4} camber={camber:.4} brake={brake:.4} diff={diff:.4}"
    );
    bias
}
