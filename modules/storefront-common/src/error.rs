use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),
}
