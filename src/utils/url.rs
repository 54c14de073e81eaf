// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

use crate::error::{AppError, Result};

/// Parse a configured base URL, making sure it can carry relative paths.
///
/// # Examples
/// ```
/// use lostfound::utils::url::parse_base;
///
/// let base = parse_base("https://api.example.com/v1").unwrap();
/// assert_eq!(base.as_str(), "https://api.example.com/v1/");
/// ```
pub fn parse_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(AppError::config(format!("'{raw}' cannot be used as a base URL")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolve an endpoint path below `base`, keeping any path prefix of `base`.
///
/// The path is always treated as relative, so names containing a colon
/// (such as `accounts:signUp`) are not mistaken for a URL scheme.
///
/// # Examples
/// ```
/// use lostfound::utils::url::{join_endpoint, parse_base};
///
/// let base = parse_base("https://api.example.com/v1").unwrap();
/// assert_eq!(
///     join_endpoint(&base, "/posts/lost").unwrap().as_str(),
///     "https://api.example.com/v1/posts/lost"
/// );
/// ```
pub fn join_endpoint(base: &Url, path: &str) -> Result<Url> {
    let relative = format!("./{}", path.trim_start_matches('/'));
    Ok(base.join(&relative)?)
}

/// Append a single, percent-encoded path segment.
pub fn push_segment(mut url: Url, segment: &str) -> Result<Url> {
    let raw = url.to_string();
    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("'{raw}' cannot take path segments")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}
