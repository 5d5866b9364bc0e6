use thiserror::Error;

#[derive(Debug, Error)]
pub enum HintError {
    #[error("hint backend rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not reach the hint backend: {0}")]
    Transport(String),

    #[error("unexpected response from the hint backend: {0}")]
    Malformed(String),
}

pub type HintResult<T> = Result<T, HintError>;
