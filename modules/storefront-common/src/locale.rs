use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StorefrontError;

/// A language the storefront is translated into. Drives UI text and the
/// `/{locale}` routing prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ar,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Ar, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    /// Value for the HTML `dir` attribute.
    pub fn direction(self) -> &'static str {
        match self {
            Locale::Ar => "rtl",
            Locale::En => "ltr",
        }
    }

    /// Native name, used by the language switcher.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::Ar => "العربية",
            Locale::En => "English",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StorefrontError::UnsupportedLocale(s.to_string()))
    }
}

/// The locales a deployment serves, and the one used when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    supported: Vec<Locale>,
    default: Locale,
}

impl LocaleSettings {
    pub fn new(supported: Vec<Locale>, default: Locale) -> Result<Self, StorefrontError> {
        if supported.is_empty() {
            return Err(StorefrontError::Config(
                "at least one supported locale is required".to_string(),
            ));
        }
        if !supported.contains(&default) {
            return Err(StorefrontError::Config(format!(
                "default locale {default} is not in the supported set"
            )));
        }
        Ok(Self { supported, default })
    }

    pub fn supported(&self) -> &[Locale] {
        &self.supported
    }

    pub fn default_locale(&self) -> Locale {
        self.default
    }

    pub fn is_supported(&self, locale: Locale) -> bool {
        self.supported.contains(&locale)
    }

    /// Parse `code` and accept it only if this deployment serves it.
    pub fn parse(&self, code: &str) -> Option<Locale> {
        code.parse().ok().filter(|l| self.is_supported(*l))
    }

    pub fn resolve(&self, cookie: Option<&str>, accept_language: Option<&str>) -> Locale {
        resolve_locale(cookie, accept_language, &self.supported, self.default)
    }
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            supported: vec![Locale::En, Locale::Ar],
            default: Locale::En,
        }
    }
}

/// Pick the locale for a request.
///
/// A supported cookie value always wins. Otherwise the `Accept-Language`
/// tags are tried in header order (quality weights are ignored): an exact
/// match first, then a prefix match in either direction. Falls back to
/// `default` when nothing matches.
pub fn resolve_locale(
    cookie: Option<&str>,
    accept_language: Option<&str>,
    supported: &[Locale],
    default: Locale,
) -> Locale {
    if let Some(locale) = cookie
        .and_then(|c| c.parse::<Locale>().ok())
        .filter(|l| supported.contains(l))
    {
        return locale;
    }

    let Some(header) = accept_language else {
        return default;
    };

    for tag in language_tags(header) {
        let exact = supported
            .iter()
            .find(|l| l.code().eq_ignore_ascii_case(&tag));
        if let Some(locale) = exact {
            return *locale;
        }

        let prefixed = supported.iter().find(|l| {
            let code = l.code();
            code.starts_with(tag.as_str()) || tag.starts_with(code)
        });
        if let Some(locale) = prefixed {
            return *locale;
        }
    }

    default
}

/// Split an `Accept-Language` value into lowercase tags, in header order.
fn language_tags(header: &str) -> Vec<String> {
    header
        .split(',')
        .filter_map(|part| {
            let tag = part.split(';').next().unwrap_or(part).trim();
            (!tag.is_empty()).then(|| tag.to_ascii_lowercase())
        })
        .collect()
}

/// The locale named by the first segment of `path`, if it is supported.
pub fn locale_from_path(path: &str, supported: &[Locale]) -> Option<Locale> {
    let segment = path.trim_start_matches('/').split('/').next()?;
    Locale::ALL
        .into_iter()
        .find(|l| l.code() == segment)
        .filter(|l| supported.contains(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPORTED: &[Locale] = &[Locale::Ar, Locale::En];

    #[test]
    fn empty_inputs_resolve_to_default() {
        assert_eq!(resolve_locale(None, None, SUPPORTED, Locale::En), Locale::En);
        assert_eq!(resolve_locale(None, None, SUPPORTED, Locale::Ar), Locale::Ar);
        assert_eq!(
            resolve_locale(Some(""), Some(""), SUPPORTED, Locale::Ar),
            Locale::Ar
        );
        assert_eq!(
            resolve_locale(None, None, &[Locale::En], Locale::En),
            Locale::En
        );
    }

    #[test]
    fn supported_cookie_beats_header() {
        let locale = resolve_locale(Some("ar"), Some("en-US,en;q=0.9"), SUPPORTED, Locale::En);
        assert_eq!(locale, Locale::Ar);
    }

    #[test]
    fn unsupported_cookie_falls_through_to_header() {
        let locale = resolve_locale(Some("ar"), Some("en"), &[Locale::En], Locale::En);
        assert_eq!(locale, Locale::En);

        let locale = resolve_locale(Some("de"), Some("ar-EG"), SUPPORTED, Locale::En);
        assert_eq!(locale, Locale::Ar);
    }

    #[test]
    fn prefix_match_after_no_exact_match() {
        let locale = resolve_locale(None, Some("fr-FR,en;q=0.8"), SUPPORTED, Locale::Ar);
        assert_eq!(locale, Locale::En);
    }

    #[test]
    fn header_order_wins_over_quality() {
        // q-values are ignored; the first listed tag that matches is used
        let locale = resolve_locale(None, Some("ar;q=0.1,en;q=0.9"), SUPPORTED, Locale::En);
        assert_eq!(locale, Locale::Ar);
    }

    #[test]
    fn exact_match_preferred_within_a_tag() {
        let locale = resolve_locale(None, Some("EN"), SUPPORTED, Locale::Ar);
        assert_eq!(locale, Locale::En);
    }

    #[test]
    fn tag_prefix_of_supported_code_matches() {
        let locale = resolve_locale(None, Some("a"), SUPPORTED, Locale::En);
        assert_eq!(locale, Locale::Ar);
    }

    #[test]
    fn malformed_header_resolves_to_default() {
        for header in [",,,", ";q=0.5", "  ,  ; ", "*", "zz-ZZ;q=abc"] {
            assert_eq!(
                resolve_locale(None, Some(header), SUPPORTED, Locale::Ar),
                Locale::Ar,
                "header {header:?}"
            );
        }
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("AR".parse::<Locale>().unwrap(), Locale::Ar);
        assert_eq!(" en ".parse::<Locale>().unwrap(), Locale::En);
        assert!("en-US".parse::<Locale>().is_err());
    }

    #[test]
    fn settings_reject_default_outside_supported() {
        assert!(LocaleSettings::new(vec![Locale::En], Locale::Ar).is_err());
        assert!(LocaleSettings::new(vec![], Locale::En).is_err());
        let settings = LocaleSettings::new(vec![Locale::Ar], Locale::Ar).unwrap();
        assert_eq!(settings.parse("en"), None);
        assert_eq!(settings.parse("ar"), Some(Locale::Ar));
    }

    #[test]
    fn locale_segment_in_path() {
        assert_eq!(locale_from_path("/ar/products", SUPPORTED), Some(Locale::Ar));
        assert_eq!(locale_from_path("/en", SUPPORTED), Some(Locale::En));
        assert_eq!(locale_from_path("/arabic", SUPPORTED), None);
        assert_eq!(locale_from_path("/", SUPPORTED), None);
        assert_eq!(locale_from_path("/products/en", SUPPORTED), None);
        assert_eq!(locale_from_path("/ar/cart", &[Locale::En]), None);
    }
}
