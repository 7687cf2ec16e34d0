use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use store_api_client::StoreApiError;
use storefront_common::{messages, Locale};

use crate::cookies::cart_id;
use crate::state::AppState;
use crate::templates::{render_account, render_sign_in, PageContext};

#[derive(Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn sign_in_page(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
) -> Response {
    let path = account_path(locale);
    let ctx = PageContext {
        locale,
        supported: state.locales.supported(),
        path: &path,
        cart_count: state.cart_count(cart_id(&headers)).await,
    };
    Html(render_sign_in(&ctx, "", None)).into_response()
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
    Form(form): Form<SignInForm>,
) -> Response {
    let t = messages(locale);
    let path = account_path(locale);
    let ctx = PageContext {
        locale,
        supported: state.locales.supported(),
        path: &path,
        cart_count: state.cart_count(cart_id(&headers)).await,
    };
    let email = form.email.trim();

    match state.backend.sign_in(email, &form.password).await {
        Ok(customer) => {
            info!(customer_id = %customer.id, "Signed in");
            Html(render_account(&ctx, &customer)).into_response()
        }
        Err(StoreApiError::InvalidCredentials) => {
            info!("Sign-in rejected");
            (
                StatusCode::UNAUTHORIZED,
                Html(render_sign_in(&ctx, email, Some(t.sign_in_invalid))),
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Sign-in failed");
            (
                StatusCode::BAD_GATEWAY,
                Html(render_sign_in(&ctx, email, Some(t.error_backend))),
            )
                .into_response()
        }
    }
}

fn account_path(locale: Locale) -> String {
    format!("/{}/account", locale.code())
}
