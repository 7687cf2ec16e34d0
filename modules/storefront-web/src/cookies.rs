use axum::http::{header, HeaderMap};
use uuid::Uuid;

use storefront_common::Locale;

pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";
pub const CART_COOKIE: &str = "cart_id";

const LOCALE_COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 3600; // one year

/// Preference cookie written once a locale is known.
pub fn locale_cookie(locale: Locale) -> String {
    format!(
        "{LOCALE_COOKIE}={}; Path=/; Max-Age={LOCALE_COOKIE_MAX_AGE_SECS}; SameSite=Strict",
        locale.code()
    )
}

pub fn cart_cookie(id: Uuid) -> String {
    format!("{CART_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Look up a cookie across every `Cookie` header. Headers that are not
/// visible ASCII are skipped.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|h| parse_cookie(h, name))
}

pub fn cart_id(headers: &HeaderMap) -> Option<Uuid> {
    cookie_value(headers, CART_COOKIE).and_then(|v| Uuid::parse_str(v).ok())
}

/// Parse a specific cookie from the Cookie header string.
fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|v| v.trim_matches('"'))
    })
}
