use std::env;
use std::time::Duration;

use crate::error::StorefrontError;
use crate::locale::{Locale, LocaleSettings};

/// Storefront configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Store backend
    pub store_api_url: String,
    pub store_api_timeout: Duration,

    // Localization
    pub locales: LocaleSettings,

    // Catalog
    pub products_per_page: u32,
}

impl Config {
    /// Load the web server configuration from the process environment.
    pub fn web_from_env() -> Result<Self, StorefrontError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorefrontError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let store_api_url = lookup("STORE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                StorefrontError::Config("STORE_API_URL environment variable is required".into())
            })?;

        let supported = var("SUPPORTED_LOCALES", "en,ar")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Locale>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorefrontError::Config(format!("SUPPORTED_LOCALES: {e}")))?;
        let default = var("DEFAULT_LOCALE", "en")
            .parse::<Locale>()
            .map_err(|e| StorefrontError::Config(format!("DEFAULT_LOCALE: {e}")))?;

        Ok(Self {
            web_host: var("WEB_HOST", "0.0.0.0"),
            web_port: parse_number("WEB_PORT", &var("WEB_PORT", "3000"))?,
            store_api_url,
            store_api_timeout: Duration::from_secs(parse_number(
                "STORE_API_TIMEOUT_SECS",
                &var("STORE_API_TIMEOUT_SECS", "10"),
            )?),
            locales: LocaleSettings::new(supported, default)?,
            products_per_page: parse_number::<u32>(
                "PRODUCTS_PER_PAGE",
                &var("PRODUCTS_PER_PAGE", "12"),
            )?
            .max(1),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, StorefrontError> {
    raw.trim()
        .parse()
        .map_err(|_| StorefrontError::Config(format!("{key} must be a number, got {raw:?}")))
}
