use thiserror::Error;

pub type Result<T, E = FlowError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Missing question")]
    MissingQuestion,
    #[error("answer generation failed: {0}")]
    Generation(String),
    #[error("translation failed: {0}")]
    Translation(String),
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("backend unavailable: {0}")]
    Backend(String),
    #[error("invalid audio file name: {0}")]
    InvalidAudioName(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
