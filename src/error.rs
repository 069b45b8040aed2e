use crate::model::PipelineRef;
use thiserror::Error;

/// Failures raised while loading or analyzing a pipeline network.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("connection references {pipeline}, but only {available} {kind} pipelines exist")]
    UnknownPipeline {
        pipeline: PipelineRef,
        kind: &'static str,
        available: usize,
    },
    #[error("invalid pipeline key '{0}', expected '<deployed|empty>-<index>'")]
    InvalidKey(String),
    #[error("failed to read network data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse network data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures reported by external collaborators (geocoder, clipboard).
#[derive(Debug, Error)]
pub enum CollabError {
    #[error("no address found for {lat:.6}, {lng:.6}")]
    NoAddress { lat: f64, lng: f64 },
    #[error("geocoding failed: {0}")]
    Geocode(String),
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
}
