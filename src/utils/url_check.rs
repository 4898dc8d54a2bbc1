//! Acceptance rules for target URLs.
//!
//! Only two things are checked: the value is not blank and it starts with
//! `http://` or `https://`. The URL is otherwise stored verbatim.

/// Reasons a target URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlCheckError {
    #[error("URL cannot be blank")]
    Blank,

    #[error("URL must start with http:// or https://")]
    UnsupportedScheme,
}

/// Checks that `input` is acceptable as a link target.
///
/// The scheme prefix is matched case-sensitively.
///
/// # Examples
///
/// ```
/// use shortify::utils::url_check::{check_target_url, UrlCheckError};
///
/// assert!(check_target_url("https://example.com/page").is_ok());
/// assert_eq!(check_target_url("   "), Err(UrlCheckError::Blank));
/// assert_eq!(check_target_url("ftp://example.com"), Err(UrlCheckError::UnsupportedScheme));
/// ```
pub fn check_target_url(input: &str) -> Result<(), UrlCheckError> {
    if input.trim().is_empty() {
        return Err(UrlCheckError::Blank);
    }

    if !input.starts_with("http://") && !input.starts_with("https://") {
        return Err(UrlCheckError::UnsupportedScheme);
    }

    Ok(())
}
