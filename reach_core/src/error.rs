use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TaskError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to load decoder '{name}': {reason}")]
    DecoderLoad { name: String, reason: String },
    #[error("invalid input: {0}")]
    Input(String),
    #[error("sweep cancelled")]
    Cancelled,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
