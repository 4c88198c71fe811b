use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("extraction failed: {0}")]
    Extract(#[from] wikevents_core::ExtractError),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
