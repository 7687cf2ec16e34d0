use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreApiError>;

#[derive(Debug, Error)]
pub enum StoreApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Coupon rejected: {0}")]
    CouponRejected(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreApiError::Decode(err.to_string())
        } else {
            StoreApiError::Network(err.to_string())
        }
    }
}
