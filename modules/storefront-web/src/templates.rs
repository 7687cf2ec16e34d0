use storefront_common::{
    format_price, messages, Cart, Customer, Locale, Messages, PageMarker, Pager, Product,
    ProductPage,
};

/// Served when a product has no image, or its image fails to load.
pub const PLACEHOLDER_IMAGE_PATH: &str = "/static/placeholder.svg";

pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300"><rect width="400" height="300" fill="#eeeeee"/><path d="M150 200l40-50 30 35 20-20 40 35z" fill="#bdbdbd"/><circle cx="170" cy="115" r="15" fill="#bdbdbd"/></svg>"##;

/// What every page needs to draw its chrome.
pub struct PageContext<'a> {
    pub locale: Locale,
    pub supported: &'a [Locale],
    /// Request path, used by the language switcher to come back here.
    pub path: &'a str,
    pub cart_count: u32,
}

impl PageContext<'_> {
    fn t(&self) -> &'static Messages {
        messages(self.locale)
    }

    fn href(&self, rest: &str) -> String {
        format!("/{}{rest}", self.locale.code())
    }
}

/// Render the product listing with its pager.
pub fn render_products(ctx: &PageContext<'_>, page: &ProductPage, pager: &Pager) -> String {
    let t = ctx.t();
    let mut cards = String::new();

    if page.items.is_empty() {
        cards.push_str(&format!(
            r#"<p class="empty">{}</p>"#,
            html_escape(t.no_products)
        ));
    }

    for product in &page.items {
        cards.push_str(&format!(
            r#"<div class="product-card">
    <a href="{href}">{img}</a>
    <h3><a href="{href}">{name}</a></h3>
    <div class="price">{price}</div>
    {form}
</div>"#,
            href = html_escape(&ctx.href(&format!("/products/{}", url_segment(&product.id)))),
            img = product_image(product),
            name = html_escape(&product.name),
            price = html_escape(&format_price(product.price_cents, &product.currency)),
            form = add_to_cart_form(ctx, product, false),
        ));
    }

    let content = format!(
        r#"<div class="container"><h2>{heading}</h2><div class="grid">{cards}</div>{pager}</div>"#,
        heading = html_escape(t.products_heading),
        pager = render_pager(ctx, pager),
    );

    build_page(ctx, t.products_heading, &content)
}

/// Render a single product.
pub fn render_product_detail(ctx: &PageContext<'_>, product: &Product) -> String {
    let t = ctx.t();
    let content = format!(
        r#"<div class="container product-detail">
    <a href="{back}" class="back">{back_label}</a>
    <div class="detail">
        {img}
        <div>
            <h2>{name}</h2>
            <div class="price">{price}</div>
            <p class="description">{description}</p>
            {form}
        </div>
    </div>
</div>"#,
        back = ctx.href("/products"),
        back_label = html_escape(t.back_to_products),
        img = product_image(product),
        name = html_escape(&product.name),
        price = html_escape(&format_price(product.price_cents, &product.currency)),
        description = html_escape(&product.description),
        form = add_to_cart_form(ctx, product, true),
    );

    build_page(ctx, &product.name, &content)
}

/// Outcome of the last coupon attempt, shown above the coupon form.
pub enum CouponNotice<'a> {
    None,
    Error(&'a str),
}

/// Render the cart with totals and the coupon form.
pub fn render_cart(ctx: &PageContext<'_>, cart: &Cart, notice: CouponNotice<'_>) -> String {
    let t = ctx.t();

    if cart.is_empty() {
        let notice_html = match notice {
            CouponNotice::Error(msg) => format!(r#"<div class="notice error">{}</div>"#, html_escape(msg)),
            CouponNotice::None => String::new(),
        };
        let content = format!(
            r#"<div class="container"><h2>{heading}</h2>{notice_html}<p class="empty">{empty}</p><a href="{products}" class="btn">{browse}</a></div>"#,
            heading = html_escape(t.cart_heading),
            empty = html_escape(t.cart_empty),
            products = ctx.href("/products"),
            browse = html_escape(t.nav_products),
        );
        return build_page(ctx, t.cart_heading, &content);
    }

    let currency = cart.currency().unwrap_or_default();
    let rows: String = cart
        .lines
        .iter()
        .map(|line| {
            format!(
                r#"<tr>
    <td>{name}</td>
    <td>{qty}</td>
    <td>{total}</td>
    <td><form method="post" action="{action}"><input type="hidden" name="product_id" value="{id}"><button type="submit" class="link">{remove}</button></form></td>
</tr>"#,
                name = html_escape(&line.name),
                qty = line.quantity,
                total = html_escape(&format_price(line.line_total_cents(), &line.currency)),
                action = ctx.href("/cart/remove"),
                id = html_escape(&line.product_id),
                remove = html_escape(t.remove),
            )
        })
        .collect();

    let notice_html = match notice {
        CouponNotice::Error(msg) => format!(r#"<div class="notice error">{}</div>"#, html_escape(msg)),
        CouponNotice::None => String::new(),
    };

    let coupon_html = match &cart.coupon {
        Some(coupon) => format!(
            r#"<div class="notice success">{applied}: <strong>{code}</strong>
    <form method="post" action="{action}" class="inline"><button type="submit" class="link">{remove}</button></form>
</div>"#,
            applied = html_escape(t.coupon_applied),
            code = html_escape(&coupon.code),
            action = ctx.href("/cart/coupon/remove"),
            remove = html_escape(t.remove_coupon),
        ),
        None => format!(
            r#"<form method="post" action="{action}" class="coupon-form">
    <label for="coupon-code">{label}</label>
    <input id="coupon-code" name="code" autocomplete="off" required>
    <button type="submit" class="btn">{apply}</button>
</form>"#,
            action = ctx.href("/cart/coupon"),
            label = html_escape(t.coupon_label),
            apply = html_escape(t.apply_coupon),
        ),
    };

    let discount_row = if cart.discount_cents() > 0 {
        format!(
            r#"<dt>{label}</dt><dd>-{amount}</dd>"#,
            label = html_escape(t.discount),
            amount = html_escape(&format_price(cart.discount_cents(), currency)),
        )
    } else {
        String::new()
    };

    let content = format!(
        r#"<div class="container">
<h2>{heading}</h2>
<table class="cart"><tbody>{rows}</tbody></table>
{notice_html}
{coupon_html}
<dl class="totals">
    <dt>{subtotal_label}</dt><dd>{subtotal}</dd>
    {discount_row}
    <dt>{total_label}</dt><dd class="total">{total}</dd>
</dl>
</div>"#,
        heading = html_escape(t.cart_heading),
        subtotal_label = html_escape(t.subtotal),
        subtotal = html_escape(&format_price(cart.subtotal_cents(), currency)),
        total_label = html_escape(t.total),
        total = html_escape(&format_price(cart.total_cents(), currency)),
    );

    build_page(ctx, t.cart_heading, &content)
}

/// Render the sign-in form. `email` is echoed back after a failed attempt;
/// the password never is.
pub fn render_sign_in(ctx: &PageContext<'_>, email: &str, error: Option<&str>) -> String {
    let t = ctx.t();
    let error_html = match error {
        Some(msg) => format!(r#"<div class="notice error" role="alert">{}</div>"#, html_escape(msg)),
        None => String::new(),
    };

    let content = format!(
        r#"<div class="container narrow">
<h2>{heading}</h2>
{error_html}
<form method="post" action="{action}" class="stacked">
    <label for="email">{email_label}</label>
    <input id="email" name="email" type="email" autocomplete="email" value="{email}" required>
    <label for="password">{password_label}</label>
    <div class="password-field">
        <input id="password" name="password" type="password" autocomplete="current-password" required>
        {toggle}
    </div>
    <button type="submit" class="btn">{submit}</button>
</form>
</div>"#,
        heading = html_escape(t.sign_in_heading),
        action = ctx.href("/account"),
        email_label = html_escape(t.email_label),
        email = html_escape(email),
        password_label = html_escape(t.password_label),
        toggle = password_toggle(ctx, "password"),
        submit = html_escape(t.sign_in_button),
    );

    build_page(ctx, t.sign_in_heading, &content)
}

/// Account summary shown after a successful sign-in.
pub fn render_account(ctx: &PageContext<'_>, customer: &Customer) -> String {
    let t = ctx.t();
    let content = format!(
        r#"<div class="container narrow"><h2>{heading}</h2><p>{signed_in_as} <strong>{name}</strong></p><p class="muted">{email}</p><a href="{products}" class="btn">{browse}</a></div>"#,
        heading = html_escape(t.account_heading),
        signed_in_as = html_escape(t.signed_in_as),
        name = html_escape(&customer.name),
        email = html_escape(&customer.email),
        products = ctx.href("/products"),
        browse = html_escape(t.nav_products),
    );
    build_page(ctx, t.account_heading, &content)
}

/// Render an error page with a localized heading.
pub fn render_error(ctx: &PageContext<'_>, message: &str) -> String {
    let t = ctx.t();
    let content = format!(
        r#"<div class="container"><h2>{heading}</h2><p>{message}</p><a href="{products}" class="btn">{back}</a></div>"#,
        heading = html_escape(t.error_heading),
        message = html_escape(message),
        products = ctx.href("/products"),
        back = html_escape(t.back_to_products),
    );
    build_page(ctx, t.error_heading, &content)
}

/// Pager widget. Each button is a link carrying its target page.
pub fn render_pager(ctx: &PageContext<'_>, pager: &Pager) -> String {
    if !pager.is_navigable() {
        return String::new();
    }

    let t = ctx.t();
    let link = |page: u32| ctx.href(&format!("/products?page={page}"));
    let mut items = String::new();

    items.push_str(&match pager.prev {
        Some(prev) => format!(
            r#"<a href="{}" rel="prev" class="pager-btn">{}</a>"#,
            link(prev),
            html_escape(t.pager_prev)
        ),
        None => format!(
            r#"<span class="pager-btn disabled" aria-disabled="true">{}</span>"#,
            html_escape(t.pager_prev)
        ),
    });

    for marker in &pager.markers {
        match marker {
            PageMarker::Page(p) if *p == pager.current => items.push_str(&format!(
                r#"<span class="pager-btn current" aria-current="page">{p}</span>"#
            )),
            PageMarker::Page(p) => items.push_str(&format!(
                r#"<a href="{}" class="pager-btn">{p}</a>"#,
                link(*p)
            )),
            PageMarker::Ellipsis => items.push_str(r#"<span class="pager-ellipsis">&hellip;</span>"#),
        }
    }

    items.push_str(&match pager.next {
        Some(next) => format!(
            r#"<a href="{}" rel="next" class="pager-btn">{}</a>"#,
            link(next),
            html_escape(t.pager_next)
        ),
        None => format!(
            r#"<span class="pager-btn disabled" aria-disabled="true">{}</span>"#,
            html_escape(t.pager_next)
        ),
    });

    format!(
        r#"<nav class="pager" aria-label="{}">{items}</nav>"#,
        html_escape(t.pager_label)
    )
}

fn product_image(product: &Product) -> String {
    match product.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => format!(
            r#"<img src="{src}" alt="{alt}" loading="lazy" onerror="this.onerror=null;this.src='{PLACEHOLDER_IMAGE_PATH}'">"#,
            src = html_escape(url),
            alt = html_escape(&product.name),
        ),
        None => format!(
            r#"<img src="{PLACEHOLDER_IMAGE_PATH}" alt="{alt}">"#,
            alt = html_escape(&product.name),
        ),
    }
}

fn add_to_cart_form(ctx: &PageContext<'_>, product: &Product, with_quantity: bool) -> String {
    let t = ctx.t();
    let quantity = if with_quantity {
        format!(
            r#"<label>{label} <input type="number" name="quantity" value="1" min="1" max="99"></label>"#,
            label = html_escape(t.quantity),
        )
    } else {
        r#"<input type="hidden" name="quantity" value="1">"#.to_string()
    };

    format!(
        r#"<form method="post" action="{action}"><input type="hidden" name="product_id" value="{id}">{quantity}<button type="submit" class="btn">{label}</button></form>"#,
        action = ctx.href("/cart/add"),
        id = html_escape(&product.id),
        label = html_escape(t.add_to_cart),
    )
}

/// Show/hide button for the password input `input_id`. Flips the input type
/// and swaps the localized label; `aria-pressed` tracks visibility.
fn password_toggle(ctx: &PageContext<'_>, input_id: &str) -> String {
    let t = ctx.t();
    format!(
        r#"<button type="button" class="link toggle-password" aria-controls="{id}" aria-pressed="false" data-show="{show}" data-hide="{hide}" onclick="var i=document.getElementById('{id}');var v=i.type==='password';i.type=v?'text':'password';this.textContent=v?this.dataset.hide:this.dataset.show;this.setAttribute('aria-pressed',v)">{show}</button>"#,
        id = html_escape(input_id),
        show = html_escape(t.show_password),
        hide = html_escape(t.hide_password),
    )
}

fn language_switcher(ctx: &PageContext<'_>) -> String {
    if ctx.supported.len() < 2 {
        return String::new();
    }

    let next = url::form_urlencoded::byte_serialize(ctx.path.as_bytes()).collect::<String>();
    let links: String = ctx
        .supported
        .iter()
        .filter(|l| **l != ctx.locale)
        .map(|l| {
            format!(
                r#"<a href="/locale/{code}?next={next}" hreflang="{code}" lang="{code}">{name}</a>"#,
                code = l.code(),
                name = html_escape(l.native_name()),
            )
        })
        .collect();

    format!(
        r#"<span class="switcher" title="{}">{links}</span>"#,
        html_escape(ctx.t().language)
    )
}

fn build_page(ctx: &PageContext<'_>, title: &str, content: &str) -> String {
    let t = ctx.t();
    let cart_badge = if ctx.cart_count > 0 {
        format!(r#" <span class="badge">{}</span>"#, ctx.cart_count)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} — {site}</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1a1a1a;background:#fafafa;}}
.header{{background:#1a1a1a;color:#fff;padding:12px 24px;display:flex;align-items:center;justify-content:space-between;}}
.header h1{{font-size:18px;font-weight:600;}}
.header h1 a{{color:#fff;text-decoration:none;}}
.header nav a{{color:#ccc;text-decoration:none;margin-inline-start:20px;font-size:14px;}}
.header nav a:hover{{color:#fff;}}
.badge{{display:inline-block;padding:0 6px;border-radius:10px;background:#0066cc;color:#fff;font-size:11px;}}
.container{{max-width:960px;margin:0 auto;padding:24px;}}
.container h2{{margin-bottom:16px;}}
.grid{{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:16px;}}
.product-card{{background:#fff;border:1px solid #e0e0e0;border-radius:8px;padding:12px;}}
.product-card img,.detail img{{width:100%;aspect-ratio:4/3;object-fit:cover;border-radius:4px;background:#eee;}}
.product-card h3{{font-size:15px;margin:8px 0 4px;}}
.product-card h3 a{{color:#1a1a1a;text-decoration:none;}}
.price{{color:#2e7d32;font-weight:600;margin-bottom:8px;}}
.detail{{display:grid;grid-template-columns:1fr 1fr;gap:24px;margin-top:16px;}}
.description{{color:#555;margin:12px 0;}}
.btn{{display:inline-block;padding:6px 16px;background:#0066cc;color:#fff;border:none;border-radius:4px;text-decoration:none;font-size:13px;cursor:pointer;}}
.link{{background:none;border:none;color:#0066cc;cursor:pointer;font-size:13px;}}
.inline{{display:inline;}}
.empty{{color:#888;text-align:center;padding:40px;}}
.pager{{display:flex;gap:6px;justify-content:center;margin-top:24px;}}
.pager-btn{{padding:4px 10px;border:1px solid #ddd;border-radius:4px;text-decoration:none;color:#1a1a1a;font-size:13px;}}
.pager-btn.current{{background:#1a1a1a;color:#fff;}}
.pager-btn.disabled{{color:#bbb;}}
.pager-ellipsis{{padding:4px 6px;color:#888;}}
.cart{{width:100%;border-collapse:collapse;margin-bottom:16px;}}
.cart td{{padding:8px;border-bottom:1px solid #eee;}}
.notice{{padding:8px 12px;border-radius:4px;font-size:13px;margin:12px 0;}}
.notice.error{{background:#fce4ec;color:#c62828;}}
.notice.success{{background:#e8f5e9;color:#2e7d32;}}
.coupon-form{{display:flex;gap:8px;align-items:center;margin:12px 0;}}
.totals{{display:grid;grid-template-columns:auto auto;gap:6px 24px;justify-content:end;margin-top:16px;}}
.totals .total{{font-weight:700;}}
.narrow{{max-width:420px;}}
.stacked{{display:flex;flex-direction:column;gap:8px;}}
.stacked input{{padding:6px 8px;border:1px solid #ccc;border-radius:4px;}}
.password-field{{display:flex;gap:8px;align-items:center;}}
.password-field input{{flex:1;}}
.muted{{color:#888;margin-bottom:16px;}}
</style>
</head>
<body>
<div class="header">
    <h1><a href="{home}">{site}</a></h1>
    <nav><a href="{products}">{nav_products}</a><a href="{cart}">{nav_cart}{cart_badge}</a><a href="{account}">{nav_account}</a>{switcher}</nav>
</div>
{content}
</body>
</html>"#,
        lang = ctx.locale.code(),
        dir = ctx.locale.direction(),
        title = html_escape(title),
        site = html_escape(t.site_title),
        home = ctx.href(""),
        products = ctx.href("/products"),
        nav_products = html_escape(t.nav_products),
        cart = ctx.href("/cart"),
        nav_cart = html_escape(t.nav_cart),
        account = ctx.href("/account"),
        nav_account = html_escape(t.nav_account),
        switcher = language_switcher(ctx),
    )
}

/// Percent-encode `s` as a single path segment (`/` and spaces included).
fn url_segment(s: &str) -> String {
    let Ok(mut url) = url::Url::parse("http://localhost/") else {
        return String::new();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(s);
    }
    url.path().trim_start_matches('/').to_string()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
