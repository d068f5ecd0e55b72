//! Request path helpers.

use std::path::{Component, Path};

/// Ensures exactly one leading and one trailing `/` around `text`.
///
/// ```ignore
/// assert_eq!(ensure_slashes("old-page"), "/old-page/");
/// assert_eq!(ensure_slashes("/old-page/"), "/old-page/");
/// assert_eq!(ensure_slashes(""), "/");
/// ```
pub fn ensure_slashes(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 2);
    if !text.starts_with('/') {
        result.push('/');
    }
    result.push_str(text);
    if !result.ends_with('/') {
        result.push('/');
    }
    result
}

/// Normalized form of a request path: lowercased with leading and trailing `/`.
pub fn normalize_path(path: &str) -> String {
    ensure_slashes(&path.to_lowercase())
}

/// Percent-decodes a request path.
///
/// Sequences that do not decode to UTF-8 leave the path as sent.
pub fn decode_path(path: &str) -> String {
    urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_owned())
}

/// Whether `path` is an absolute or protocol-relative URL rather than a local path.
pub fn is_external_url(path: &str) -> bool {
    let lower = path.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

/// Whether `path` names an existing file under `root`.
///
/// Empty paths and external URLs count as files, so callers treat them as
/// "not ours". Paths that try to leave `root` are never files.
pub async fn is_physical_file(root: &Path, path: &str) -> bool {
    if path.is_empty() || is_external_url(path) {
        return true;
    }

    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return false;
    }

    tokio::fs::metadata(root.join(relative))
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
