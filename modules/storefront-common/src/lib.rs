pub mod cart;
pub mod config;
pub mod error;
pub mod locale;
pub mod messages;
pub mod pagination;
pub mod types;

pub use cart::{format_price, Cart, CartLine};
pub use config::Config;
pub use error::StorefrontError;
pub use locale::{locale_from_path, resolve_locale, Locale, LocaleSettings};
pub use messages::{messages, Messages};
pub use pagination::{page_window, PageMarker, Pager, DEFAULT_MAX_PAGES_TO_SHOW};
pub use types::*;
