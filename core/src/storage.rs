use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde_path_to_error as spte;

use crate::ingest::{is_acc_setup, parse_acc_setup, parse_telemetry_csv, TelemetryLoad};
use crate::models::SetupConfig;
use crate::types::BalanceReport;

/// Leser oppsett fra disk. ACC-format gjenkjennes automatisk, ellers forventes
/// `SetupConfig` som JSON. Finnes ikke filen, returneres default-oppsettet.
pub fn load_setup<P: AsRef<Path>>(path: P) -> Result<SetupConfig> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("setup file {} not found, using default setup", path.display());
        return Ok(SetupConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading setup file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("setup file {} is not valid JSON", path.display()))?;

    let setup = if is_acc_setup(&value) {
        parse_acc_setup(&contents).with_context(|| format!("parsing ACC setup {}", path.display()))?
    } else {
        let mut de = serde_json::Deserializer::from_str(&contents);
        spte::deserialize(&mut de).with_context(|| format!("parsing setup {}", path.display()))?
    };

    log::info!(
        "setup loaded from {} (car={})",
        path.display(),
        setup.car_name.as_deref().unwrap_or("unknown")
    );
    Ok(setup)
}

/// Leser telemetri-CSV fra disk.
pub fn load_telemetry<P: AsRef<Path>>(path: P) -> Result<TelemetryLoad> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening telemetry {}", path.display()))?;
    let load = parse_telemetry_csv(BufReader::new(file))
        .with_context(|| format!("parsing telemetry {}", path.display()))?;
    Ok(load)
}

/// Rapport som pretty-print JSON (eksport).
pub fn report_to_json(report: &BalanceReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Skriver rapporten til disk som JSON.
pub fn save_report<P: AsRef<Path>>(report: &BalanceReport, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = report_to_json(report)?;
    std::fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
    log::info!("report exported to {}", path.display());
    Ok(())
}
