use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{SetupConfig, TelemetrySample};
use crate::suspension::SuspensionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlingState {
    Understeer,
    Oversteer,
    Neutral,
}

impl HandlingState {
    pub fn label(&self) -> &'static str {
        match self {
            HandlingState::Understeer => "understeer",
            HandlingState::Oversteer => "oversteer",
            HandlingState::Neutral => "neutral",
        }
    }
}

/// Resultat per telemetri-sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPoint {
    pub source_sample: TelemetrySample,
    pub gradient: f64,
    pub raw_gradient: f64, // før glatting
    pub state: HandlingState,
    pub severity: f64,     // |gradient|
    pub confidence: f64,   // 0–100
    pub theoretical_yaw_rate_deg_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornerSegment {
    pub start_index: usize,
    pub end_index: usize, // inkluderende
    pub direction: TurnDirection,
    pub max_lateral_g: f64,
    pub min_speed_kph: f64,
    pub avg_gradient: f64,
    pub dominant_state: HandlingState,
    pub sample_count: usize,
    pub confident_samples: usize,
    pub avg_confidence: f64,
    pub length_m: f64,
}

/// Oppsettsparametre anbefalingene kan peke på.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupParameter {
    FrontSpringRate,
    RearSpringRate,
    FrontToe,
    RearToe,
    FrontCamber,
    RearCamber,
    FrontArb,
    RearArb,
    DifferentialPower,
    BrakeBalance,
    FrontRideHeight,
    RearRideHeight,
    FrontTyrePressure,
    RearTyrePressure,
    RearWing,
    Splitter,
    TractionControl,
    TractionControl2,
    Abs,
}

impl SetupParameter {
    /// Gyldig område `[min, max]` for parameteren.
    pub fn range(&self) -> (f64, f64) {
        use SetupParameter::*;
        match self {
            FrontSpringRate | RearSpringRate => (50.0, 300.0),
            FrontToe | RearToe => (-0.4, 0.4),
            FrontCamber | RearCamber => (-5.0, 0.0),
            FrontArb | RearArb => (0.0, 20.0),
            DifferentialPower => (0.0, 100.0),
            BrakeBalance => (45.0, 70.0),
            FrontRideHeight => (50.0, 90.0),
            RearRideHeight => (55.0, 110.0),
            FrontTyrePressure | RearTyrePressure => (20.3, 35.0),
            RearWing => (0.0, 20.0),
            Splitter => (0.0, 5.0),
            TractionControl | TractionControl2 | Abs => (0.0, 11.0),
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = self.range();
        if value.is_finite() { value.clamp(lo, hi) } else { lo }
    }

    /// Nåverdi fra oppsettet. `None` når parameteren ikke er konfigurert.
    pub fn current_value(&self, setup: &SetupConfig) -> Option<f64> {
        use SetupParameter::*;
        let v = match self {
            FrontSpringRate => setup.front_spring_rate,
            RearSpringRate => setup.rear_spring_rate,
            FrontToe => setup.front_toe_deg,
            RearToe => setup.rear_toe_deg,
            FrontCamber => setup.front_camber_deg,
            RearCamber => setup.rear_camber_deg,
            FrontArb => setup.front_arb as f64,
            RearArb => setup.rear_arb as f64,
            DifferentialPower => setup.differential_power_pct,
            BrakeBalance => setup.brake_balance_pct,
            FrontRideHeight => setup.front_ride_height_mm,
            RearRideHeight => setup.rear_ride_height_mm,
            FrontTyrePressure => return setup.tyre_pressures.front(),
            RearTyrePressure => return setup.tyre_pressures.rear(),
            RearWing => return setup.rear_wing.map(f64::from),
            Splitter => return setup.splitter.map(f64::from),
            TractionControl => return setup.traction_control.map(f64::from),
            TractionControl2 => return setup.traction_control_2.map(f64::from),
            Abs => return setup.abs.map(f64::from),
        };
        if v.is_finite() { Some(v) } else { None }
    }

    pub fn unit(&self) -> &'static str {
        use SetupParameter::*;
        match self {
            FrontSpringRate | RearSpringRate => "N/mm",
            FrontToe | RearToe | FrontCamber | RearCamber => "deg",
            DifferentialPower | BrakeBalance => "%",
            FrontRideHeight | RearRideHeight => "mm",
            FrontTyrePressure | RearTyrePressure => "psi",
            FrontArb | RearArb | RearWing | Splitter | TractionControl | TractionControl2 | Abs => "clicks",
        }
    }

    /// Hvilken gruppe justeringen hører til.
    pub fn group(&self) -> RuleGroup {
        use SetupParameter::*;
        match self {
            BrakeBalance | FrontTyrePressure | RearTyrePressure | TractionControl | TractionControl2 | Abs => {
                RuleGroup::Conservative
            }
            FrontSpringRate | RearSpringRate | FrontToe | RearToe | FrontCamber | RearCamber | FrontArb
            | RearArb | DifferentialPower => RuleGroup::Mechanical,
            FrontRideHeight | RearRideHeight | RearWing | Splitter => RuleGroup::Aerodynamic,
        }
    }
}

/// Konservativ = elektronikk, dekktrykk og bremsebalanse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleGroup {
    Conservative,
    Mechanical,
    Aerodynamic,
}

/// Rekkefølgen her er sorteringsrekkefølgen (Critical først).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Moderate,
    Minor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub target_parameter: SetupParameter,
    pub current_value: f64,
    pub recommended_value: f64,
    pub priority: Priority,
    pub group: RuleGroup,
    pub expected_impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceStats {
    pub corner_count: usize,
    pub pct_understeer: f64,
    pub pct_oversteer: f64,
    pub pct_neutral: f64,
    pub weighted_avg_gradient: f64,
    pub primary_issue: HandlingState,
}

impl Default for BalanceStats {
    fn default() -> Self {
        Self {
            corner_count: 0,
            pct_understeer: 0.0,
            pct_oversteer: 0.0,
            pct_neutral: 100.0,
            weighted_avg_gradient: 0.0,
            primary_issue: HandlingState::Neutral,
        }
    }
}

/// Samlet resultat av en analysekjøring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub car_name: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: String,
    pub stats: BalanceStats,
    pub points: Vec<AnalysisPoint>,
    pub corners: Vec<CornerSegment>,
    pub recommendations: Vec<Recommendation>,
    pub suspension: Option<SuspensionSummary>,
}

/// Justerbare terskler. Alle felt har default, så en tom JSON `{}` er gyldig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisCfg {
    pub understeer_threshold: f64,   // gradient > dette => understeer
    pub oversteer_threshold: f64,    // gradient < dette => oversteer
    pub min_lateral_g: f64,
    pub gradient_clamp: f64,         // symmetrisk ±
    pub confidence_floor: f64,
    pub smoothing_window: usize,
    pub corner_entry_g: f64,
    pub min_corner_samples: usize,
    pub understeer_pct_threshold: f64,
    pub oversteer_pct_threshold: f64,
    pub max_recommendations: usize,
    pub bumpstop_travel_pct: f64,
    pub bumpstop_hit_limit: usize,
}

impl Default for AnalysisCfg {
    fn default() -> Self {
        Self {
            understeer_threshold: 0.05,
            oversteer_threshold: -0.08,
            min_lateral_g: 0.1,
            gradient_clamp: 0.5,
            confidence_floor: 50.0,
            smoothing_window: 21,
            corner_entry_g: 0.8,
            min_corner_samples: 5,
            understeer_pct_threshold: 30.0,
            oversteer_pct_threshold: 25.0,
            max_recommendations: 6,
            bumpstop_travel_pct: 90.0,
            bumpstop_hit_limit: 5,
        }
    }
}
