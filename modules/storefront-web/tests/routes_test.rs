//! Router tests: locale negotiation, catalog pages and the cart, driven
//! through `tower::ServiceExt::oneshot` against an in-memory store backend.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderValue, Request, Response, StatusCode},
    Router,
};
use tower::ServiceExt;

use store_api_client::{Result, StoreApiError, StoreBackend};
use storefront_common::{CouponDiscount, Customer, Locale, LocaleSettings, Product, ProductPage};
use storefront_web::{router, AppState};

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

struct FakeStore {
    products: Vec<Product>,
}

impl FakeStore {
    fn with_products(count: usize) -> Self {
        let products = (1..=count)
            .map(|n| Product {
                id: format!("p{n}"),
                name: format!("Item {n}"),
                description: format!("Description {n}"),
                price_cents: 1000,
                currency: "USD".to_string(),
                image_url: (n % 2 == 0).then(|| format!("https://cdn.example.com/{n}.png")),
            })
            .collect();
        Self { products }
    }

    fn with_product_id(id: &str) -> Self {
        let mut store = Self::with_products(1);
        store.products[0].id = id.to_string();
        store
    }
}

#[async_trait]
impl StoreBackend for FakeStore {
    async fn list_products(&self, locale: Locale, page: u32, per_page: u32) -> Result<ProductPage> {
        let per_page = per_page as usize;
        let total_pages = self.products.len().div_ceil(per_page) as u32;
        let items = self
            .products
            .iter()
            .skip((page as usize - 1) * per_page)
            .take(per_page)
            .map(|p| Product {
                name: format!("{} ({locale})", p.name),
                ..p.clone()
            })
            .collect();

        Ok(ProductPage {
            items,
            page,
            total_pages,
            total_items: self.products.len() as u64,
        })
    }

    async fn get_product(&self, _locale: Locale, id: &str) -> Result<Option<Product>> {
        if id == "broken" {
            return Err(StoreApiError::Api {
                status: 500,
                message: "database offline".to_string(),
            });
        }
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn apply_coupon(&self, code: &str, subtotal_cents: u64) -> Result<CouponDiscount> {
        match code.trim() {
            "SAVE5" => Ok(CouponDiscount {
                code: "SAVE5".to_string(),
                discount_cents: 500.min(subtotal_cents),
            }),
            "DOWN" => Err(StoreApiError::Network("connection refused".to_string())),
            other => Err(StoreApiError::CouponRejected(format!("unknown coupon {other}"))),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Customer> {
        if email == "ada@example.com" && password == "correct horse" {
            Ok(Customer {
                id: "c-1".to_string(),
                name: "Ada Lovelace".to_string(),
                email: email.to_string(),
            })
        } else {
            Err(StoreApiError::InvalidCredentials)
        }
    }
}

struct FailingStore;

#[async_trait]
impl StoreBackend for FailingStore {
    async fn list_products(&self, _: Locale, _: u32, _: u32) -> Result<ProductPage> {
        Err(StoreApiError::Network("connection refused".to_string()))
    }

    async fn get_product(&self, _: Locale, _: &str) -> Result<Option<Product>> {
        Err(StoreApiError::Network("connection refused".to_string()))
    }

    async fn apply_coupon(&self, _: &str, _: u64) -> Result<CouponDiscount> {
        Err(StoreApiError::Network("connection refused".to_string()))
    }

    async fn sign_in(&self, _: &str, _: &str) -> Result<Customer> {
        Err(StoreApiError::Network("connection refused".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app() -> Router {
    app_with(Arc::new(FakeStore::with_products(30)))
}

fn app_with(backend: Arc<dyn StoreBackend>) -> Router {
    // 30 products at 3 per page = 10 pages
    router(Arc::new(AppState::new(backend, LocaleSettings::default(), 3)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with(uri: &str, headers: &[(header::HeaderName, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

async fn body_text(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` of the first Set-Cookie for `name`.
fn set_cookie(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
        .map(String::from)
}

fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}

// ---------------------------------------------------------------------------
// Locale negotiation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_redirects_to_default_without_signals() {
    let resp = send(&app(), get("/")).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en");
}

#[tokio::test]
async fn accept_language_prefix_match_drives_redirect() {
    let resp = send(
        &app(),
        get_with("/products", &[(header::ACCEPT_LANGUAGE, "fr-FR,ar;q=0.8")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/ar/products");
}

#[tokio::test]
async fn cookie_beats_header_and_query_is_kept() {
    let resp = send(
        &app(),
        get_with(
            "/products?page=2",
            &[
                (header::COOKIE, "NEXT_LOCALE=ar"),
                (header::ACCEPT_LANGUAGE, "en-US,en"),
            ],
        ),
    )
    .await;
    assert_eq!(location(&resp), "/ar/products?page=2");
}

#[tokio::test]
async fn unreadable_accept_language_falls_back_to_default() {
    let req = Request::builder()
        .uri("/cart")
        .header(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_bytes(b"ar\xff").unwrap(),
        )
        .body(Body::empty())
        .unwrap();
    let resp = send(&app(), req).await;
    assert_eq!(location(&resp), "/en/cart");
}

#[tokio::test]
async fn unknown_first_segment_is_treated_as_path() {
    let resp = send(&app(), get("/fr/products")).await;
    assert_eq!(location(&resp), "/en/fr/products");
}

#[tokio::test]
async fn localized_request_sets_preference_cookie_once() {
    let resp = send(&app(), get("/ar/products")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        set_cookie(&resp, "NEXT_LOCALE").as_deref(),
        Some("NEXT_LOCALE=ar; Path=/; Max-Age=31536000; SameSite=Strict")
    );

    let resp = send(
        &app(),
        get_with("/ar/products", &[(header::COOKIE, "NEXT_LOCALE=en")]),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(set_cookie(&resp, "NEXT_LOCALE"), None);
}

#[tokio::test]
async fn invalid_preference_cookie_is_replaced() {
    let resp = send(
        &app(),
        get_with("/en", &[(header::COOKIE, "NEXT_LOCALE=klingon")]),
    )
    .await;
    assert!(set_cookie(&resp, "NEXT_LOCALE").is_some());
}

#[tokio::test]
async fn health_and_static_are_not_localized() {
    let resp = send(&app(), get("/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "ok");

    let resp = send(&app(), get("/static/placeholder.svg")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
}

#[tokio::test]
async fn language_switcher_overwrites_cookie_and_keeps_page() {
    let resp = send(
        &app(),
        get_with(
            "/locale/ar?next=%2Fen%2Fproducts%3Fpage%3D2",
            &[(header::COOKIE, "NEXT_LOCALE=en")],
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/ar/products?page=2");
    assert_eq!(
        set_cookie(&resp, "NEXT_LOCALE").map(|c| cookie_pair(&c)).as_deref(),
        Some("NEXT_LOCALE=ar")
    );
}

#[tokio::test]
async fn language_switcher_ignores_foreign_targets() {
    let resp = send(&app(), get("/locale/ar?next=%2F%2Fevil.example.com")).await;
    assert_eq!(location(&resp), "/ar");

    let resp = send(&app(), get("/locale/xx?next=%2Fen")).await;
    assert_eq!(location(&resp), "/");
    assert_eq!(set_cookie(&resp, "NEXT_LOCALE"), None);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn product_listing_renders_pager_window() {
    let resp = send(&app(), get("/en/products?page=5")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;

    assert!(html.contains("Item 13 (en)"));
    assert!(html.contains(r#"aria-current="page">5<"#));
    assert!(html.contains(r#"href="/en/products?page=4" rel="prev""#));
    assert!(html.contains(r#"href="/en/products?page=10""#));
    assert!(!html.contains(r#"href="/en/products?page=8""#));
    assert_eq!(html.matches("&hellip;").count(), 2);
}

#[tokio::test]
async fn bad_page_numbers_mean_first_page() {
    for uri in ["/en/products?page=abc", "/en/products?page=0", "/en/products"] {
        let html = body_text(send(&app(), get(uri)).await).await;
        assert!(html.contains(r#"aria-current="page">1<"#), "{uri}");
        assert!(html.contains("Item 1 (en)"), "{uri}");
    }
}

#[tokio::test]
async fn home_is_first_page_in_locale() {
    let resp = send(&app(), get("/ar")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"<html lang="ar" dir="rtl">"#));
    assert!(html.contains("Item 1 (ar)"));
    assert!(html.contains(r#"href="/locale/en?next=%2Far""#));
}

#[tokio::test]
async fn single_page_catalog_has_no_pager() {
    let html = body_text(send(&app_with(Arc::new(FakeStore::with_products(2))), get("/en/products")).await).await;
    assert!(!html.contains(r#"class="pager""#));
}

#[tokio::test]
async fn listing_links_reach_products_with_spaces_in_id() {
    let app = app_with(Arc::new(FakeStore::with_product_id("gift card")));
    let html = body_text(send(&app, get("/en/products")).await).await;
    assert!(html.contains(r#"href="/en/products/gift%20card""#));

    let resp = send(&app, get("/en/products/gift%20card")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Description 1"));
}

#[tokio::test]
async fn product_detail_found_missing_and_failing() {
    let resp = send(&app(), get("/en/products/p2")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Description 2"));
    assert!(html.contains("https://cdn.example.com/2.png"));

    let resp = send(&app(), get("/en/products/nope")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&app(), get("/en/products/broken")).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn backend_outage_renders_localized_error() {
    let resp = send(&app_with(Arc::new(FailingStore)), get("/ar/products")).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let html = body_text(resp).await;
    assert!(html.contains(storefront_common::messages(Locale::Ar).error_backend));
}

#[tokio::test]
async fn unknown_localized_path_is_not_found() {
    let resp = send(&app(), get("/en/checkout")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Cart and coupons
// ---------------------------------------------------------------------------

/// Add `quantity` of `product_id` to a new cart and return its cookie.
async fn new_cart(app: &Router, product_id: &str, quantity: u32) -> String {
    let resp = send(
        app,
        post_form(
            "/en/cart/add",
            &format!("product_id={product_id}&quantity={quantity}"),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/en/cart");
    cookie_pair(&set_cookie(&resp, "cart_id").expect("cart cookie"))
}

#[tokio::test]
async fn add_to_cart_then_view() {
    let app = app();
    let cookie = new_cart(&app, "p1", 2).await;

    let resp = send(&app, get_with("/en/cart", &[(header::COOKIE, cookie.as_str())])).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    let html = body_text(resp).await;
    assert!(html.contains("Item 1"));
    assert!(html.contains("20.00 USD"));
}

#[tokio::test]
async fn adding_again_reuses_cart_cookie() {
    let app = app();
    let cookie = new_cart(&app, "p1", 1).await;

    let resp = send(
        &app,
        post_form("/en/cart/add", "product_id=p1&quantity=3", Some(&cookie)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(set_cookie(&resp, "cart_id"), None);

    let html = body_text(send(&app, get_with("/en/cart", &[(header::COOKIE, cookie.as_str())])).await).await;
    assert!(html.contains("40.00 USD"));
}

#[tokio::test]
async fn unknown_cart_cookie_gets_a_fresh_cart() {
    let app = app();
    let forged = "cart_id=6f1c2d3e-4b5a-4c7d-8e9f-0a1b2c3d4e5f";

    let resp = send(
        &app,
        post_form("/en/cart/add", "product_id=p1&quantity=1", Some(forged)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let minted = cookie_pair(&set_cookie(&resp, "cart_id").expect("fresh cart cookie"));
    assert_ne!(minted, forged);

    let html = body_text(send(&app, get_with("/en/cart", &[(header::COOKIE, forged)])).await).await;
    assert!(html.contains(storefront_common::messages(Locale::En).cart_empty));
    let html = body_text(send(&app, get_with("/en/cart", &[(header::COOKIE, minted.as_str())])).await).await;
    assert!(html.contains("10.00 USD"));
}

#[tokio::test]
async fn adding_unknown_product_is_not_found() {
    let resp = send(&app(), post_form("/en/cart/add", "product_id=nope", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(set_cookie(&resp, "cart_id"), None);
}

#[tokio::test]
async fn coupon_applies_discount() {
    let app = app();
    let cookie = new_cart(&app, "p1", 2).await;

    let resp = send(&app, post_form("/en/cart/coupon", "code=SAVE5", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let html = body_text(send(&app, get_with("/en/cart", &[(header::COOKIE, cookie.as_str())])).await).await;
    assert!(html.contains("-5.00 USD"));
    assert!(html.contains("15.00 USD"));

    let resp = send(&app, post_form("/en/cart/coupon/remove", "", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let html = body_text(send(&app, get_with("/en/cart", &[(header::COOKIE, cookie.as_str())])).await).await;
    assert!(!html.contains("-5.00 USD"));
}

#[tokio::test]
async fn rejected_coupon_shows_localized_error() {
    let app = app();
    let resp = send(
        &app,
        post_form("/ar/cart/add", "product_id=p1&quantity=1", None),
    )
    .await;
    let cookie = cookie_pair(&set_cookie(&resp, "cart_id").unwrap());

    let resp = send(&app, post_form("/ar/cart/coupon", "code=BOGUS", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains(storefront_common::messages(Locale::Ar).coupon_invalid));
}

#[tokio::test]
async fn coupon_on_empty_cart_is_refused() {
    let resp = send(&app(), post_form("/en/cart/coupon", "code=SAVE5", None)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn coupon_backend_failure_is_bad_gateway() {
    let app = app();
    let cookie = new_cart(&app, "p1", 1).await;
    let resp = send(&app, post_form("/en/cart/coupon", "code=DOWN", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn removing_last_item_empties_cart() {
    let app = app();
    let cookie = new_cart(&app, "p1", 1).await;

    let resp = send(&app, post_form("/en/cart/remove", "product_id=p1", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let html = body_text(send(&app, get_with("/en/cart", &[(header::COOKIE, cookie.as_str())])).await).await;
    assert!(html.contains(storefront_common::messages(Locale::En).cart_empty));
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_in_page_has_password_toggle() {
    let resp = send(&app(), get("/ar/account")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    let html = body_text(resp).await;
    assert!(html.contains(r#"type="password""#));
    assert!(html.contains(storefront_common::messages(Locale::Ar).show_password));
}

#[tokio::test]
async fn account_path_without_locale_is_redirected() {
    let resp = send(&app(), get("/account")).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/en/account");
}

#[tokio::test]
async fn successful_sign_in_shows_account() {
    let resp = send(
        &app(),
        post_form(
            "/en/account",
            "email=ada%40example.com&password=correct+horse",
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Ada Lovelace"));
    assert!(html.contains(storefront_common::messages(Locale::En).account_heading));
}

#[tokio::test]
async fn wrong_password_keeps_email_but_not_password() {
    let resp = send(
        &app(),
        post_form("/en/account", "email=ada%40example.com&password=hunter2", None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let html = body_text(resp).await;
    assert!(html.contains(storefront_common::messages(Locale::En).sign_in_invalid));
    assert!(html.contains(r#"value="ada@example.com""#));
    assert!(!html.contains("hunter2"));
}

#[tokio::test]
async fn sign_in_backend_outage_is_bad_gateway() {
    let resp = send(
        &app_with(Arc::new(FailingStore)),
        post_form("/en/account", "email=a%40b.c&password=x", None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}
