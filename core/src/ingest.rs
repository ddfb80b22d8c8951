use std::collections::HashMap;
use std::io::Read;

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_path_to_error as spte;

use crate::error::IngestError;
use crate::models::{SetupConfig, TelemetrySample, TyrePressures, DEFAULT_WHEELBASE_M};
use crate::physics::fill_distance_if_missing;

/// Tidssteg når CSV-en mangler tidskolonne (50 Hz).
pub const DEFAULT_SAMPLE_PERIOD_S: f64 = 0.02;

const RAD_TO_DEG: f64 = 57.2958;

// ──────────────────────────────────────────────────────────────────────────────
// Akselavstand per bil (ACC-navn). Ukjent bil => DEFAULT_WHEELBASE_M.
// ──────────────────────────────────────────────────────────────────────────────

static WHEELBASES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("mercedes_amg_gt3_evo", 2.665),
        ("mercedes_amg_gt2", 2.630),
        ("bmw_m4_gt3", 2.810),
        ("ferrari_488_gt3_evo", 2.650),
        ("ferrari_488_gt3", 2.650),
        ("audi_r8_lms_evo", 2.650),
        ("audi_r8_lms_evo_ii", 2.650),
        ("lamborghini_huracan_gt3_evo", 2.620),
        ("lamborghini_huracan_gt3_evo2", 2.620),
        ("porsche_911ii_gt3_r", 2.457),
        ("mclaren_720s_gt3", 2.670),
        ("bentley_continental_gt3_2018", 2.851),
        ("nissan_gt_r_nismo_gt3", 2.780),
    ])
});

pub fn wheelbase_for_car(car_name: &str) -> f64 {
    WHEELBASES
        .get(car_name.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_WHEELBASE_M)
}

// ──────────────────────────────────────────────────────────────────────────────
// CSV-telemetri
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TelemetryLoad {
    pub samples: Vec<TelemetrySample>,
    pub skipped_rows: usize,
    pub missing_optional: Vec<String>,
}

const REQUIRED: [(&str, &[&str]); 4] = [
    ("SPEED", &["speed", "speed_kph"]),
    ("STEERANGLE", &["steerangle", "steer_angle_deg", "steer"]),
    ("G_LAT", &["g_lat", "lateral_g", "latg"]),
    ("ROTY", &["roty", "yaw_rate", "yaw_rate_deg_s"]),
];

const SUSPENSION: [&str; 4] = ["susp_travel_lf", "susp_travel_rf", "susp_travel_lr", "susp_travel_rr"];

#[derive(Debug, Default)]
struct Columns {
    time: Option<usize>,
    speed: usize,
    steer: usize,
    lat: usize,
    yaw: usize,
    throttle: Option<usize>,
    brake: Option<usize>,
    distance: Option<usize>,
    suspension: Option<[usize; 4]>,
}

fn find(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| aliases.contains(&h.as_str()))
}

impl Columns {
    fn resolve(raw: &csv::StringRecord) -> Result<(Self, Vec<String>), IngestError> {
        let headers: Vec<String> = raw.iter().map(|h| h.trim().to_lowercase()).collect();

        let mut required = [0usize; 4];
        let mut missing = Vec::new();
        for (i, (name, aliases)) in REQUIRED.iter().enumerate() {
            match find(&headers, aliases) {
                Some(idx) => required[i] = idx,
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(IngestError::MissingChannels(missing));
        }

        let suspension = {
            let idx: Vec<usize> = SUSPENSION.iter().filter_map(|c| find(&headers, &[*c])).collect();
            if idx.len() == 4 { Some([idx[0], idx[1], idx[2], idx[3]]) } else { None }
        };

        let cols = Columns {
            time: find(&headers, &["time", "t", "time_s"]),
            speed: required[0],
            steer: required[1],
            lat: required[2],
            yaw: required[3],
            throttle: find(&headers, &["throttle", "throttle_pct"]),
            brake: find(&headers, &["brake", "brake_pct"]),
            distance: find(&headers, &["distance", "distance_m", "dist"]),
            suspension,
        };

        let mut missing_optional = Vec::new();
        if cols.time.is_none() { missing_optional.push("Time".to_string()); }
        if cols.throttle.is_none() { missing_optional.push("THROTTLE".to_string()); }
        if cols.brake.is_none() { missing_optional.push("BRAKE".to_string()); }
        if cols.suspension.is_none() {
            missing_optional.extend(SUSPENSION.iter().map(|c| c.to_uppercase()));
        }
        Ok((cols, missing_optional))
    }

    fn sample(&self, vals: &[f64], row: usize) -> TelemetrySample {
        let time = self.time.map(|i| vals[i]).unwrap_or(row as f64 * DEFAULT_SAMPLE_PERIOD_S);
        let mut s = TelemetrySample::new(time, vals[self.speed], vals[self.lat], vals[self.yaw], vals[self.steer])
            .with_pedals(
                self.throttle.map(|i| vals[i]).unwrap_or(0.0),
                self.brake.map(|i| vals[i]).unwrap_or(0.0),
            );
        if let Some(i) = self.distance {
            s = s.with_distance(vals[i]);
        }
        if let Some([lf, rf, lr, rr]) = self.suspension {
            s = s.with_suspension_travel([vals[lf], vals[rf], vals[lr], vals[rr]]);
        }
        s
    }
}

/// Leser telemetri fra CSV. Rader med feil antall kolonner eller ikke-numeriske /
/// ikke-finite verdier hoppes over og telles. Distance utledes hvis den mangler.
pub fn parse_telemetry_csv<R: Read>(reader: R) -> Result<TelemetryLoad, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let (cols, missing_optional) = Columns::resolve(&headers)?;

    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for (line, rec) in rdr.records().enumerate() {
        let rec = match rec {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping line {}: {}", line + 2, e);
                skipped += 1;
                continue;
            }
        };
        if rec.len() != headers.len() {
            log::warn!(
                "skipping line {}: column count mismatch (expected {}, got {})",
                line + 2,
                headers.len(),
                rec.len()
            );
            skipped += 1;
            continue;
        }

        let vals: Option<Vec<f64>> = rec
            .iter()
            .map(|f| f.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();
        let Some(vals) = vals else {
            log::warn!("skipping line {}: non-numeric value", line + 2);
            skipped += 1;
            continue;
        };

        let row = samples.len();
        samples.push(cols.sample(&vals, row));
    }

    if samples.is_empty() {
        return Err(IngestError::NoValidRows { skipped });
    }

    fill_distance_if_missing(&mut samples);
    log::info!("loaded {} telemetry samples ({} rows skipped)", samples.len(), skipped);

    Ok(TelemetryLoad { samples, skipped_rows: skipped, missing_optional })
}

// ──────────────────────────────────────────────────────────────────────────────
// ACC setup-JSON
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccSetupFile {
    car_name: String,
    basic_setup: AccBasicSetup,
    #[serde(default)]
    advanced_setup: AccAdvancedSetup,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccBasicSetup {
    alignment: AccAlignment,
    #[serde(default)]
    tyres: AccTyres,
    #[serde(default)]
    electronics: AccElectronics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccAlignment {
    static_camber: Vec<f64>,
    toe_out_linear: Vec<f64>, // radianer, positiv = toe-out
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccTyres {
    #[serde(default)]
    tyre_pressure: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct AccElectronics {
    #[serde(default, rename = "tC1")]
    tc1: Option<i32>,
    #[serde(default, rename = "tC2")]
    tc2: Option<i32>,
    #[serde(default)]
    abs: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccAdvancedSetup {
    #[serde(default)]
    mechanical_balance: AccMechanicalBalance,
    #[serde(default)]
    aero_balance: AccAeroBalance,
}

#[derive(Debug, Default, Deserialize)]
struct AccMechanicalBalance {
    #[serde(default, rename = "aRBFront")]
    arb_front: Option<i32>,
    #[serde(default, rename = "aRBRear")]
    arb_rear: Option<i32>,
    #[serde(default, rename = "brakeBias")]
    brake_bias: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccAeroBalance {
    #[serde(default)]
    ride_height: Vec<f64>,
    #[serde(default)]
    splitter: Option<i32>,
    #[serde(default)]
    rear_wing: Option<i32>,
}

/// Snitt av to hjul (indeks a, b) hvis begge finnes.
fn pair_mean(xs: &[f64], a: usize, b: usize) -> Option<f64> {
    match (xs.get(a), xs.get(b)) {
        (Some(x), Some(y)) => Some(0.5 * (x + y)),
        _ => None,
    }
}

impl AccSetupFile {
    fn into_setup(self) -> SetupConfig {
        let d = SetupConfig::default();
        let align = &self.basic_setup.alignment;
        let mech = &self.advanced_setup.mechanical_balance;
        let aero = &self.advanced_setup.aero_balance;
        let p = &self.basic_setup.tyres.tyre_pressure;

        // toe-out (rad) => toe-in (grader)
        let toe_in = |a, b| pair_mean(&align.toe_out_linear, a, b).map(|t| -t * RAD_TO_DEG);

        SetupConfig {
            wheelbase_m: wheelbase_for_car(&self.car_name),
            front_camber_deg: pair_mean(&align.static_camber, 0, 1).unwrap_or(d.front_camber_deg),
            rear_camber_deg: pair_mean(&align.static_camber, 2, 3).unwrap_or(d.rear_camber_deg),
            front_toe_deg: toe_in(0, 1).unwrap_or(d.front_toe_deg),
            rear_toe_deg: toe_in(2, 3).unwrap_or(d.rear_toe_deg),
            front_arb: mech.arb_front.unwrap_or(d.front_arb),
            rear_arb: mech.arb_rear.unwrap_or(d.rear_arb),
            brake_balance_pct: mech.brake_bias.unwrap_or(d.brake_balance_pct),
            front_ride_height_mm: pair_mean(&aero.ride_height, 0, 1).unwrap_or(d.front_ride_height_mm),
            rear_ride_height_mm: pair_mean(&aero.ride_height, 2, 3).unwrap_or(d.rear_ride_height_mm),
            tyre_pressures: TyrePressures {
                fl: p.first().copied(),
                fr: p.get(1).copied(),
                rl: p.get(2).copied(),
                rr: p.get(3).copied(),
            },
            rear_wing: aero.rear_wing,
            splitter: aero.splitter,
            traction_control: self.basic_setup.electronics.tc1,
            traction_control_2: self.basic_setup.electronics.tc2,
            abs: self.basic_setup.electronics.abs,
            car_name: Some(self.car_name),
            ..d
        }
    }
}

/// ACC setup-JSON → `SetupConfig`. Verdier tas som lagret (ingen klikk→enhet-konvertering),
/// bortsett fra toe som går fra radianer toe-out til grader toe-in.
pub fn parse_acc_setup(json: &str) -> Result<SetupConfig, IngestError> {
    let mut de = serde_json::Deserializer::from_str(json);
    let file: AccSetupFile = spte::deserialize(&mut de)?;
    Ok(file.into_setup())
}

/// Gjenkjenner ACC-format på `basicSetup`-nøkkelen.
pub fn is_acc_setup(value: &serde_json::Value) -> bool {
    value.get("basicSetup").is_some()
}
