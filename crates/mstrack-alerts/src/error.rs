use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("alert webhook rejected the alert with HTTP {0}")]
    Rejected(u16),

    #[error("alert delivery failed: {0}")]
    Delivery(String),
}

impl From<ureq::Error> for AlertError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => AlertError::Rejected(status),
            other => AlertError::Delivery(other.to_string()),
        }
    }
}
