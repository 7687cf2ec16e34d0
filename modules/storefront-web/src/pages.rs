use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use tracing::warn;

use storefront_common::{messages, Locale, Pager};

use crate::cookies::cart_id;
use crate::state::AppState;
use crate::templates::{
    render_error, render_product_detail, render_products, PageContext, PLACEHOLDER_SVG,
};

pub async fn health() -> &'static str {
    "ok"
}

pub async fn placeholder_image() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        PLACEHOLDER_SVG,
    )
}

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    /// Missing, malformed or zero page numbers all mean the first page.
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

pub async fn home(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    product_listing(&state, locale, uri.path(), &headers, 1).await
}

pub async fn products_page(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    product_listing(&state, locale, uri.path(), &headers, query.page()).await
}

async fn product_listing(
    state: &AppState,
    locale: Locale,
    path: &str,
    headers: &HeaderMap,
    page: u32,
) -> Response {
    let ctx = PageContext {
        locale,
        supported: state.locales.supported(),
        path,
        cart_count: state.cart_count(cart_id(headers)).await,
    };

    match state
        .backend
        .list_products(locale, page, state.products_per_page)
        .await
    {
        Ok(listing) => {
            let pager = Pager::new(listing.page, listing.total_pages);
            Html(render_products(&ctx, &listing, &pager)).into_response()
        }
        Err(e) => {
            warn!(error = %e, page, "Failed to load products");
            backend_error(&ctx)
        }
    }
}

pub async fn product_detail(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
    Path((_, id)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let ctx = PageContext {
        locale,
        supported: state.locales.supported(),
        path: uri.path(),
        cart_count: state.cart_count(cart_id(&headers)).await,
    };

    match state.backend.get_product(locale, &id).await {
        Ok(Some(product)) => Html(render_product_detail(&ctx, &product)).into_response(),
        Ok(None) => not_found(&ctx, messages(locale).product_not_found),
        Err(e) => {
            warn!(error = %e, product_id = %id, "Failed to load product");
            backend_error(&ctx)
        }
    }
}

pub async fn fallback(
    State(state): State<Arc<AppState>>,
    locale: Option<Extension<Locale>>,
    uri: Uri,
) -> Response {
    let locale = locale
        .map(|Extension(l)| l)
        .unwrap_or_else(|| state.locales.default_locale());
    let ctx = PageContext {
        locale,
        supported: state.locales.supported(),
        path: uri.path(),
        cart_count: 0,
    };
    not_found(&ctx, messages(locale).page_not_found)
}

pub(crate) fn not_found(ctx: &PageContext<'_>, message: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(render_error(ctx, message))).into_response()
}

pub(crate) fn backend_error(ctx: &PageContext<'_>) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Html(render_error(ctx, messages(ctx.locale).error_backend)),
    )
        .into_response()
}
