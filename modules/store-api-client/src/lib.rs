pub mod error;

pub use error::{Result, StoreApiError};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use storefront_common::{CouponDiscount, Customer, Locale, Product, ProductPage};

/// What the storefront needs from the commerce backend.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn list_products(&self, locale: Locale, page: u32, per_page: u32) -> Result<ProductPage>;

    /// `None` when the backend has no such product.
    async fn get_product(&self, locale: Locale, id: &str) -> Result<Option<Product>>;

    /// Ask the backend what `code` is worth against `subtotal_cents`.
    async fn apply_coupon(&self, code: &str, subtotal_cents: u64) -> Result<CouponDiscount>;

    /// Check a shopper's credentials. A wrong email or password is
    /// `InvalidCredentials`, never a transport error.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Customer>;
}

#[derive(Debug, Serialize)]
struct ApplyCouponRequest<'a> {
    code: &'a str,
    subtotal_cents: u64,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(alias = "error")]
    message: String,
}

pub struct StoreApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl StoreApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| StoreApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    /// `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl StoreBackend for StoreApiClient {
    async fn list_products(&self, locale: Locale, page: u32, per_page: u32) -> Result<ProductPage> {
        let url = self.endpoint(&["products"])?;
        debug!(%locale, page, per_page, "Listing products");

        let resp = self
            .client
            .get(url)
            .query(&[
                ("locale", locale.code().to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(api_error(status, resp).await);
        }

        Ok(resp.json().await?)
    }

    async fn get_product(&self, locale: Locale, id: &str) -> Result<Option<Product>> {
        let url = self.endpoint(&["products", id])?;

        let resp = self
            .client
            .get(url)
            .query(&[("locale", locale.code())])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(status, resp).await);
        }

        Ok(Some(resp.json().await?))
    }

    async fn apply_coupon(&self, code: &str, subtotal_cents: u64) -> Result<CouponDiscount> {
        let code = code.trim();
        if code.is_empty() {
            return Err(StoreApiError::CouponRejected("empty coupon code".to_string()));
        }

        let url = self.endpoint(&["coupons", "apply"])?;
        let resp = self
            .client
            .post(url)
            .json(&ApplyCouponRequest {
                code,
                subtotal_cents,
            })
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::UNPROCESSABLE_ENTITY {
            let message = error_message(resp).await;
            debug!(code, %status, "Coupon rejected");
            return Err(StoreApiError::CouponRejected(message));
        }
        if !status.is_success() {
            return Err(api_error(status, resp).await);
        }

        Ok(resp.json().await?)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Customer> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(StoreApiError::InvalidCredentials);
        }

        let url = self.endpoint(&["customers", "sign-in"])?;
        let resp = self
            .client
            .post(url)
            .json(&SignInRequest { email, password })
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status == StatusCode::UNPROCESSABLE_ENTITY
        {
            debug!(%status, "Sign-in rejected");
            return Err(StoreApiError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(api_error(status, resp).await);
        }

        Ok(resp.json().await?)
    }
}

async fn api_error(status: StatusCode, resp: reqwest::Response) -> StoreApiError {
    StoreApiError::Api {
        status: status.as_u16(),
        message: error_message(resp).await,
    }
}

/// Prefer the backend's `{"message": ...}` body, fall back to raw text.
async fn error_message(resp: reqwest::Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) => body,
    }
}
