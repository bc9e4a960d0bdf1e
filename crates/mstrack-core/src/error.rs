use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("unknown indicator kind: {0}")]
    UnknownIndicator(String),

    #[error("unknown MS type: {0}")]
    UnknownMsType(String),

    #[error("date/time error: {0}")]
    Time(#[from] jiff::Error),
}

impl CoreError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
