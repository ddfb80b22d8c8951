use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Forutsetning brutt: kalleren skal aldri sende en tom økt.
    #[error("telemetry session is empty")]
    EmptySession,

    #[error("parse error ({what}) at {path}: {message}")]
    Parse {
        what: &'static str,
        path: String,
        message: String,
    },

    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AnalysisError {
    pub(crate) fn parse(what: &'static str, err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        AnalysisError::Parse {
            what,
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required telemetry channels: {}", .0.join(", "))]
    MissingChannels(Vec<String>),

    #[error("no valid telemetry rows ({skipped} skipped)")]
    NoValidRows { skipped: usize },

    #[error("setup json error at {path}: {message}")]
    SetupJson { path: String, message: String },
}

impl From<serde_path_to_error::Error<serde_json::Error>> for IngestError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        IngestError::SetupJson {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}
