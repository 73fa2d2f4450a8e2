use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop an export from being ingested.
///
/// Malformed session metadata is not represented here: it only costs the
/// session names and is logged instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("export is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export must be a JSON object keyed by session")]
    NotAnObject,

    #[error("{key} does not match the attempt schema: {source}")]
    Session {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
