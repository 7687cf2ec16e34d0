use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

pub mod account;
pub mod cart;
pub mod cookies;
pub mod locale_layer;
pub mod pages;
pub mod state;
pub mod templates;

pub use state::AppState;

/// Build the storefront router.
pub fn router(state: Arc<AppState>) -> Router {
    // Cart and account pages are per-shopper and must never be cached.
    let private_routes = Router::new()
        .route("/{locale}/cart", get(cart::view_cart))
        .route("/{locale}/cart/add", post(cart::add_to_cart))
        .route("/{locale}/cart/remove", post(cart::remove_from_cart))
        .route("/{locale}/cart/coupon", post(cart::apply_coupon))
        .route("/{locale}/cart/coupon/remove", post(cart::remove_coupon))
        .route(
            "/{locale}/account",
            get(account::sign_in_page).post(account::sign_in),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/health", get(pages::health))
        .route("/static/placeholder.svg", get(pages::placeholder_image))
        .route("/locale/{code}", get(locale_layer::switch_locale))
        // Storefront
        .route("/{locale}", get(pages::home))
        .route("/{locale}/products", get(pages::products_page))
        .route("/{locale}/products/{id}", get(pages::product_detail))
        .merge(private_routes)
        .fallback(pages::fallback)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            locale_layer::negotiate_locale,
        ))
        .with_state(state)
}
