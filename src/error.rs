use thiserror::Error;

/// Preconditions for committing a crop.
///
/// Surfaced as silent no-ops in the UI (the Apply button is only reachable
/// while both preconditions hold) but kept as typed errors so the engine
/// stays honest about them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CropError {
    #[error("no active crop region")]
    NoRegion,
    #[error("no source image loaded")]
    NoSourceImage,
}

/// Errors while bringing a screenshot into the editor.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("could not fetch image: {0}")]
    Fetch(String),
}

/// Errors while flattening and saving the canvas.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no canvas capture available to export")]
    NoCapture,
    #[error("failed to encode {format}: {source}")]
    Encode {
        format: &'static str,
        source: image::ImageError,
    },
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the generation service. One request is one attempt; the
/// caller shows the message and moves on, no automatic retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("generation service error: {0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("response contained no usable content")]
    EmptyResponse,
}

/// Errors from the preset/settings store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize store entry: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to access store: {0}")]
    Io(#[from] std::io::Error),
}
