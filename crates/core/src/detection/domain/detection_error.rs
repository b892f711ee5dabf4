use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// The model never became usable: loading failed or the loader went away.
    #[error("face detection model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("face detection failed: {0}")]
    Inference(String),
}
