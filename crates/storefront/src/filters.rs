//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Human label for a category value.
///
/// Usage in templates: `{{ category|category_label }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn category_label(category: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(bazaar_core::category_label(&category.to_string()))
}

/// Stylesheet fingerprint computed by the build script, for cache busting.
///
/// Usage in templates: `/static/css/main.css?v={{ ""|stylesheet_version }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn stylesheet_version(
    _value: impl Display,
    _env: &dyn askama::Values,
) -> askama::Result<&'static str> {
    Ok(env!("STYLESHEET_VERSION"))
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_stylesheet_version_is_short_hex() {
        let version = env!("STYLESHEET_VERSION");
        assert_eq!(version.len(), 8);
        assert!(version.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
