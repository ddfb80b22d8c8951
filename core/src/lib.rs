pub mod models;
pub mod types;
pub mod error;

pub mod setup_impact;
pub mod physics;
pub mod smoothing;
pub mod corners;
pub mod suspension;
pub mod recommendations;
pub mod trajectory;

pub mod latest;
pub mod metrics;
pub mod ingest;
pub mod storage;
pub mod analyze_session;
pub mod cli;

#[cfg(feature = "python")]
mod py;

use serde_path_to_error as spte;

pub use analyze_session::{analyze_into_latest, analyze_session, analyze_session_observed};
pub use corners::{scan_corners, segment_corners};
pub use error::{AnalysisError, IngestError};
pub use latest::{LatestResult, RunTicket};
pub use metrics::PipelineMetrics;
pub use models::{SetupConfig, TelemetrySample, TyrePressures};
pub use physics::{compute_gradient, compute_gradient_with};
pub use recommendations::{generate_recommendations, generate_recommendations_with};
pub use setup_impact::{compute_setup_bias, SetupBias};
pub use smoothing::{simplify_rdp, smooth_gradients, Point2};
pub use trajectory::reconstruct_trajectory;
pub use types::{
    AnalysisCfg, AnalysisPoint, BalanceReport, BalanceStats, CornerSegment, HandlingState, Priority,
    Recommendation, RuleGroup, SetupParameter, TurnDirection,
};

fn parse_json<T: serde::de::DeserializeOwned>(what: &'static str, json: &str) -> Result<T, AnalysisError> {
    let mut de = serde_json::Deserializer::from_str(json);
    spte::deserialize(&mut de).map_err(|e| AnalysisError::parse(what, e))
}

/// JSON inn → `BalanceReport` som JSON ut. `cfg_json` kan utelates (default-terskler).
pub fn analyze_session_json(
    samples_json: &str,
    setup_json: &str,
    cfg_json: Option<&str>,
) -> Result<String, AnalysisError> {
    let samples: Vec<TelemetrySample> = parse_json("samples", samples_json)?;
    let setup: SetupConfig = parse_json("setup", setup_json)?;
    let cfg: AnalysisCfg = match cfg_json {
        Some(s) if !s.trim().is_empty() => parse_json("cfg", s)?,
        _ => AnalysisCfg::default(),
    };

    let report = analyze_session(&samples, &setup, &cfg)?;
    Ok(serde_json::to_string(&report)?)
}
