use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use store_api_client::StoreApiError;
use storefront_common::{messages, Cart, Locale};

use crate::cookies::{cart_cookie, cart_id};
use crate::pages::{backend_error, not_found};
use crate::state::AppState;
use crate::templates::{render_cart, CouponNotice, PageContext};

const MAX_QUANTITY: u32 = 99;

#[derive(Deserialize)]
pub struct AddToCartForm {
    product_id: String,
    quantity: Option<String>,
}

#[derive(Deserialize)]
pub struct RemoveFromCartForm {
    product_id: String,
}

#[derive(Deserialize)]
pub struct CouponForm {
    code: String,
}

pub async fn view_cart(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
) -> Response {
    let cart = state.cart(cart_id(&headers)).await;
    cart_page(&state, locale, &cart, CouponNotice::None, StatusCode::OK)
}

pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = form
        .quantity
        .as_deref()
        .and_then(|q| q.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_QUANTITY);

    let products_path = format!("/{}/products", locale.code());
    let ctx = PageContext {
        locale,
        supported: state.locales.supported(),
        path: &products_path,
        cart_count: 0,
    };

    // Price and name come from the backend, never from the form.
    let product = match state.backend.get_product(locale, &form.product_id).await {
        Ok(Some(product)) => product,
        Ok(None) => return not_found(&ctx, messages(locale).product_not_found),
        Err(e) => {
            warn!(error = %e, product_id = %form.product_id, "Failed to load product for cart");
            return backend_error(&ctx);
        }
    };

    let minted = state.carts.add(cart_id(&headers), &product, quantity).await;
    info!(product_id = %product.id, quantity, new_cart = minted.is_some(), "Added to cart");

    redirect_to_cart(locale, minted)
}

pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    if let Some(id) = cart_id(&headers) {
        state.carts.update(id, |cart| cart.remove(&form.product_id)).await;
    }
    redirect_to_cart(locale, None)
}

pub async fn apply_coupon(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
    Form(form): Form<CouponForm>,
) -> Response {
    let t = messages(locale);
    let id = cart_id(&headers);
    let cart = state.cart(id).await;

    if cart.is_empty() {
        return cart_page(
            &state,
            locale,
            &cart,
            CouponNotice::Error(t.coupon_empty_cart),
            StatusCode::UNPROCESSABLE_ENTITY,
        );
    }

    // The cart lock is not held while the backend is consulted.
    match state
        .backend
        .apply_coupon(&form.code, cart.subtotal_cents())
        .await
    {
        Ok(discount) => {
            info!(code = %discount.code, discount_cents = discount.discount_cents, "Coupon applied");
            if let Some(id) = id {
                state
                    .carts
                    .update(id, |stored| {
                        if !stored.is_empty() {
                            stored.apply_coupon(discount);
                        }
                    })
                    .await;
            }
            redirect_to_cart(locale, None)
        }
        Err(StoreApiError::CouponRejected(reason)) => {
            info!(code = %form.code.trim(), reason = %reason, "Coupon rejected");
            cart_page(
                &state,
                locale,
                &cart,
                CouponNotice::Error(t.coupon_invalid),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
        }
        Err(e) => {
            warn!(error = %e, "Failed to apply coupon");
            cart_page(
                &state,
                locale,
                &cart,
                CouponNotice::Error(t.error_backend),
                StatusCode::BAD_GATEWAY,
            )
        }
    }
}

pub async fn remove_coupon(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    headers: HeaderMap,
) -> Response {
    if let Some(id) = cart_id(&headers) {
        state.carts.update(id, Cart::clear_coupon).await;
    }
    redirect_to_cart(locale, None)
}

fn cart_page(
    state: &AppState,
    locale: Locale,
    cart: &Cart,
    notice: CouponNotice<'_>,
    status: StatusCode,
) -> Response {
    // Form posts re-render the cart; the switcher should lead back to the cart itself.
    let path = format!("/{}/cart", locale.code());
    let ctx = PageContext {
        locale,
        supported: state.locales.supported(),
        path: &path,
        cart_count: cart.item_count(),
    };
    (status, Html(render_cart(&ctx, cart, notice))).into_response()
}

/// See-other back to the cart page, setting the cart cookie for a new cart.
fn redirect_to_cart(locale: Locale, new_cart: Option<Uuid>) -> Response {
    let target = format!("/{}/cart", locale.code());
    match new_cart {
        Some(id) => ([(header::SET_COOKIE, cart_cookie(id))], Redirect::to(&target)).into_response(),
        None => Redirect::to(&target).into_response(),
    }
}
