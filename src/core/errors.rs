use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnkiflowError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid card file: {0}")]
    Format(String),

    #[error("Cannot reach AnkiConnect: {0}")]
    AnkiUnavailable(String),

    #[error("AnkiConnect rejected the request: {0}")]
    AnkiRejected(String),

    #[error("Card index {index} out of range (collection has {len} cards)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("AnkiflowError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for AnkiflowError {
    fn from(error: std::io::Error) -> Self {
        AnkiflowError::Io(Box::new(error))
    }
}

impl AnkiflowError {
    /// Connectivity problems are worth retrying; rejections need the card
    /// (or its target deck/model) fixed before another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnkiflowError::AnkiUnavailable(_))
    }
}
