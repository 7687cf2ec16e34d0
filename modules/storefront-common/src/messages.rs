use crate::locale::Locale;

/// Translated UI strings for one locale.
#[derive(Debug)]
pub struct Messages {
    pub site_title: &'static str,
    pub nav_products: &'static str,
    pub nav_cart: &'static str,
    pub language: &'static str,

    pub products_heading: &'static str,
    pub no_products: &'static str,
    pub add_to_cart: &'static str,
    pub quantity: &'static str,
    pub back_to_products: &'static str,
    pub product_not_found: &'static str,

    pub cart_heading: &'static str,
    pub cart_empty: &'static str,
    pub remove: &'static str,
    pub subtotal: &'static str,
    pub discount: &'static str,
    pub total: &'static str,
    pub coupon_label: &'static str,
    pub apply_coupon: &'static str,
    pub remove_coupon: &'static str,
    pub coupon_applied: &'static str,
    pub coupon_invalid: &'static str,
    pub coupon_empty_cart: &'static str,

    pub nav_account: &'static str,
    pub sign_in_heading: &'static str,
    pub email_label: &'static str,
    pub password_label: &'static str,
    pub show_password: &'static str,
    pub hide_password: &'static str,
    pub sign_in_button: &'static str,
    pub sign_in_invalid: &'static str,
    pub account_heading: &'static str,
    pub signed_in_as: &'static str,

    pub pager_label: &'static str,
    pub pager_prev: &'static str,
    pub pager_next: &'static str,

    pub error_heading: &'static str,
    pub error_backend: &'static str,
    pub page_not_found: &'static str,
}

static EN: Messages = Messages {
    site_title: "Storefront",
    nav_products: "Products",
    nav_cart: "Cart",
    language: "Language",

    products_heading: "All products",
    no_products: "No products available right now.",
    add_to_cart: "Add to cart",
    quantity: "Quantity",
    back_to_products: "Back to products",
    product_not_found: "We couldn't find that product.",

    cart_heading: "Your cart",
    cart_empty: "Your cart is empty.",
    remove: "Remove",
    subtotal: "Subtotal",
    discount: "Discount",
    total: "Total",
    coupon_label: "Coupon code",
    apply_coupon: "Apply",
    remove_coupon: "Remove coupon",
    coupon_applied: "Coupon applied",
    coupon_invalid: "That coupon code is not valid.",
    coupon_empty_cart: "Add something to your cart before applying a coupon.",

    nav_account: "Account",
    sign_in_heading: "Sign in",
    email_label: "Email",
    password_label: "Password",
    show_password: "Show",
    hide_password: "Hide",
    sign_in_button: "Sign in",
    sign_in_invalid: "The email or password is incorrect.",
    account_heading: "Your account",
    signed_in_as: "Signed in as",

    pager_label: "Pagination",
    pager_prev: "Previous",
    pager_next: "Next",

    error_heading: "Something went wrong",
    error_backend: "The store is temporarily unavailable. Please try again shortly.",
    page_not_found: "That page does not exist.",
};

static AR: Messages = Messages {
    site_title: "المتجر",
    nav_products: "المنتجات",
    nav_cart: "السلة",
    language: "اللغة",

    products_heading: "جميع المنتجات",
    no_products: "لا توجد منتجات متاحة حالياً.",
    add_to_cart: "أضف إلى السلة",
    quantity: "الكمية",
    back_to_products: "العودة إلى المنتجات",
    product_not_found: "لم نتمكن من العثور على هذا المنتج.",

    cart_heading: "سلة التسوق",
    cart_empty: "سلتك فارغة.",
    remove: "إزالة",
    subtotal: "المجموع الفرعي",
    discount: "الخصم",
    total: "الإجمالي",
    coupon_label: "رمز القسيمة",
    apply_coupon: "تطبيق",
    remove_coupon: "إزالة القسيمة",
    coupon_applied: "تم تطبيق القسيمة",
    coupon_invalid: "رمز القسيمة غير صالح.",
    coupon_empty_cart: "أضف منتجاً إلى سلتك قبل تطبيق القسيمة.",

    nav_account: "حسابي",
    sign_in_heading: "تسجيل الدخول",
    email_label: "البريد الإلكتروني",
    password_label: "كلمة المرور",
    show_password: "إظهار",
    hide_password: "إخفاء",
    sign_in_button: "دخول",
    sign_in_invalid: "البريد الإلكتروني أو كلمة المرور غير صحيحة.",
    account_heading: "حسابك",
    signed_in_as: "تم تسجيل الدخول باسم",

    pager_label: "التنقل بين الصفحات",
    pager_prev: "السابق",
    pager_next: "التالي",

    error_heading: "حدث خطأ ما",
    error_backend: "المتجر غير متاح مؤقتاً. يرجى المحاولة بعد قليل.",
    page_not_found: "هذه الصفحة غير موجودة.",
};

pub fn messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::Ar => &AR,
        Locale::En => &EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_locale_has_its_own_strings() {
        assert_eq!(messages(Locale::En).nav_cart, "Cart");
        assert_ne!(messages(Locale::Ar).nav_cart, messages(Locale::En).nav_cart);
    }
}
