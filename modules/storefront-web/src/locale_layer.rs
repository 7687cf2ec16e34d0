use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::debug;

use storefront_common::{locale_from_path, Locale};

use crate::cookies::{cookie_value, locale_cookie, LOCALE_COOKIE};
use crate::state::AppState;

/// Paths served without a locale prefix.
const EXEMPT_PREFIXES: &[&str] = &["/static/", "/locale/"];
const EXEMPT_PATHS: &[&str] = &["/health"];

fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path) || EXEMPT_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Locale negotiation for every request.
///
/// Paths without a locale segment are redirected to the same path under the
/// resolved locale. Paths with one carry that `Locale` as a request
/// extension, and the preference cookie is set if the browser has none yet.
pub async fn negotiate_locale(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if is_exempt(&path) {
        return next.run(req).await;
    }

    if let Some(locale) = locale_from_path(&path, state.locales.supported()) {
        let has_preference = cookie_value(req.headers(), LOCALE_COOKIE)
            .and_then(|v| state.locales.parse(v))
            .is_some();

        req.extensions_mut().insert(locale);
        let mut response = next.run(req).await;

        if !has_preference {
            if let Ok(value) = HeaderValue::from_str(&locale_cookie(locale)) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        return response;
    }

    // Unreadable headers count as absent; resolution then falls back to the default.
    let cookie = cookie_value(req.headers(), LOCALE_COOKIE);
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let locale = state.locales.resolve(cookie, accept_language);

    let target = localized_path(locale, &path, req.uri().query());
    debug!(%locale, target = %target, "Redirecting to localized path");
    Redirect::temporary(&target).into_response()
}

#[derive(Deserialize)]
pub struct SwitchQuery {
    next: Option<String>,
}

/// Language switcher: store the chosen locale and go back to `next` under it.
pub async fn switch_locale(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(query): Query<SwitchQuery>,
) -> Response {
    let Some(locale) = state.locales.parse(&code) else {
        return Redirect::to("/").into_response();
    };

    let target = query
        .next
        .as_deref()
        .filter(|n| is_local_path(n))
        .map(|n| switch_path(n, locale, state.locales.supported()))
        .unwrap_or_else(|| format!("/{}", locale.code()));

    (
        [(header::SET_COOKIE, locale_cookie(locale))],
        Redirect::to(&target),
    )
        .into_response()
}

/// `path` (plus `query`) under `/{locale}`.
fn localized_path(locale: Locale, path: &str, query: Option<&str>) -> String {
    let mut target = format!("/{}", locale.code());
    if path != "/" {
        target.push_str(path);
    }
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(q);
    }
    target
}

/// Rewrite a local `next` target so it points at `locale`.
fn switch_path(next: &str, locale: Locale, supported: &[Locale]) -> String {
    let (path, query) = match next.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (next, None),
    };

    let unprefixed = match locale_from_path(path, supported) {
        Some(current) => {
            let rest = path
                .strip_prefix('/')
                .and_then(|p| p.strip_prefix(current.code()))
                .unwrap_or(path);
            if rest.is_empty() {
                "/"
            } else {
                rest
            }
        }
        None => path,
    };

    localized_path(locale, unprefixed, query)
}

/// Only same-origin absolute paths are accepted as redirect targets.
fn is_local_path(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}
