use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuffingError {
    /// A solve input outside its domain. Raised before any integration.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The integrated state stopped being finite.
    #[error("integration failed at grid index {index} (t = {t}): state is not finite")]
    IntegrationFailed { index: usize, t: f64 },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, DuffingError>;
