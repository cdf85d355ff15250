//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Number of characters [`short_id`] keeps.
const SHORT_ID_LEN: usize = 8;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Shortens an opaque identifier for display.
///
/// Usage in templates: `{{ id|short_id }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn short_id(id: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let id = id.to_string();
    if id.chars().count() <= SHORT_ID_LEN {
        return Ok(id);
    }
    Ok(format!("{}…", id.chars().take(SHORT_ID_LEN).collect::<String>()))
}

/// Initials of a display name, for avatar placeholders.
///
/// Usage in templates: `{{ name|initials }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn initials(name: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(initials_of(&name.to_string()))
}

fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_of() {
        assert_eq!(initials_of("User Alpha"), "UA");
        assert_eq!(initials_of("bea"), "B");
        assert_eq!(initials_of("Ada Byron King"), "AB");
        assert_eq!(initials_of("  "), "");
    }
}
