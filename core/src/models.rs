use serde::{Deserialize, Serialize};

/// Ett telemetri-sample (én tidsstep). Valgfrie kanaler har faste defaults
/// som settes når samplet bygges, ikke ved hver lesing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub time_s: f64,                // sek fra start
    #[serde(default)]
    pub distance_m: Option<f64>,    // meter langs banen (utledes hvis den mangler)
    pub speed_kph: f64,             // km/t
    pub lateral_g: f64,             // g, fortegn = svingretning
    pub yaw_rate_deg_s: f64,        // grader/s, målt
    pub steer_angle_deg: f64,       // grader, ratt eller hjul avhengig av kilde
    #[serde(default)]
    pub throttle_pct: f64,          // 0–100, kun informativ
    #[serde(default)]
    pub brake_pct: f64,             // 0–100, kun informativ
    #[serde(default)]
    pub suspension_travel_pct: Option<[f64; 4]>, // FL, FR, RL, RR
}

impl TelemetrySample {
    pub fn new(
        time_s: f64,
        speed_kph: f64,
        lateral_g: f64,
        yaw_rate_deg_s: f64,
        steer_angle_deg: f64,
    ) -> Self {
        Self {
            time_s,
            distance_m: None,
            speed_kph,
            lateral_g,
            yaw_rate_deg_s,
            steer_angle_deg,
            throttle_pct: 0.0,
            brake_pct: 0.0,
            suspension_travel_pct: None,
        }
    }

    pub fn with_distance(mut self, distance_m: f64) -> Self {
        self.distance_m = Some(distance_m);
        self
    }

    pub fn with_pedals(mut self, throttle_pct: f64, brake_pct: f64) -> Self {
        self.throttle_pct = throttle_pct.clamp(0.0, 100.0);
        self.brake_pct = brake_pct.clamp(0.0, 100.0);
        self
    }

    pub fn with_suspension_travel(mut self, travel_pct: [f64; 4]) -> Self {
        self.suspension_travel_pct = Some(travel_pct);
        self
    }

    /// Fart i m/s, negative verdier behandles som 0.
    #[inline]
    pub fn speed_ms(&self) -> f64 {
        (self.speed_kph / 3.6).max(0.0)
    }
}

/// Dekktrykk per hjul (psi). Alle felt er valgfrie.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TyrePressures {
    #[serde(default)]
    pub fl: Option<f64>,
    #[serde(default)]
    pub fr: Option<f64>,
    #[serde(default)]
    pub rl: Option<f64>,
    #[serde(default)]
    pub rr: Option<f64>,
}

impl TyrePressures {
    pub fn front(&self) -> Option<f64> {
        axle_mean(self.fl, self.fr)
    }

    pub fn rear(&self) -> Option<f64> {
        axle_mean(self.rl, self.rr)
    }
}

fn axle_mean(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a.filter(|x| x.is_finite()), b.filter(|x| x.is_finite())) {
        (Some(x), Some(y)) => Some(0.5 * (x + y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Oppsett for én analyse. Felt som ikke er satt i JSON får default-verdien.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    pub car_name: Option<String>,
    pub wheelbase_m: f64,
    /// Rattutveksling. `None` => styrevinkelen er allerede hjulvinkel.
    pub steering_ratio: Option<f64>,

    pub front_spring_rate: f64, // N/mm
    pub rear_spring_rate: f64,  // N/mm

    pub front_toe_deg: f64, // positiv = toe-in
    pub rear_toe_deg: f64,
    pub front_camber_deg: f64,
    pub rear_camber_deg: f64,

    pub front_arb: i32, // klikk
    pub rear_arb: i32,

    pub differential_power_pct: f64,
    pub brake_balance_pct: f64,

    pub front_ride_height_mm: f64,
    pub rear_ride_height_mm: f64,

    pub tyre_pressures: TyrePressures,

    // ACC-ekstra: regler mot felt som mangler hoppes over
    pub rear_wing: Option<i32>,
    pub splitter: Option<i32>,
    pub traction_control: Option<i32>,
    pub traction_control_2: Option<i32>,
    pub abs: Option<i32>,
}

pub const DEFAULT_WHEELBASE_M: f64 = 2.65;

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            car_name: None,
            wheelbase_m: DEFAULT_WHEELBASE_M,
            steering_ratio: None,
            front_spring_rate: 120.0,
            rear_spring_rate: 120.0,
            front_toe_deg: 0.0,
            rear_toe_deg: 0.2,
            front_camber_deg: -3.5,
            rear_camber_deg: -2.5,
            front_arb: 5,
            rear_arb: 3,
            differential_power_pct: 50.0,
            brake_balance_pct: 55.0,
            front_ride_height_mm: 55.0,
            rear_ride_height_mm: 70.0,
            tyre_pressures: TyrePressures::default(),
            rear_wing: None,
            splitter: None,
            traction_control: None,
            traction_control_2: None,
            abs: None,
        }
    }
}

impl SetupConfig {
    /// Akselavstand med trygg fallback (må være > 0).
    pub fn wheelbase(&self) -> f64 {
        if self.wheelbase_m.is_finite() && self.wheelbase_m > 0.0 {
            self.wheelbase_m
        } else {
            DEFAULT_WHEELBASE_M
        }
    }

    /// Utveksling ratt → hjul. Mangler den (eller er ugyldig) brukes 1.0.
    pub fn steering_ratio(&self) -> f64 {
        match self.steering_ratio {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => 1.0,
        }
    }
}
