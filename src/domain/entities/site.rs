//! Site definitions and per-request site context.

use serde::Deserialize;

/// A configured site, loaded from the sites file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteDefinition {
    pub name: String,
    /// Host names served by this site; `*` matches any host.
    #[serde(default)]
    pub host_names: Vec<String>,
    /// Path of the site's home item in the content tree.
    pub start_path: String,
    /// Content database the site reads from; `None` means no database is active.
    #[serde(default)]
    pub database: Option<String>,
    /// URL prefix the site is served under, e.g. `/shop`.
    #[serde(default)]
    pub virtual_folder: String,
}

impl SiteDefinition {
    /// Whether this site serves the given host (port already stripped).
    pub fn matches_host(&self, host: Option<&str>) -> bool {
        if self.host_names.is_empty() {
            return true;
        }

        self.host_names.iter().any(|candidate| {
            candidate == "*" || host.is_some_and(|h| candidate.eq_ignore_ascii_case(h))
        })
    }

    /// Strips the virtual folder from `path`.
    ///
    /// Returns `None` when the path is outside the virtual folder. The
    /// returned path always starts with `/`.
    pub fn strip_virtual_folder(&self, path: &str) -> Option<String> {
        let folder = self.virtual_folder.trim_end_matches('/');
        if folder.is_empty() {
            return Some(ensure_leading_slash(path));
        }

        let prefix = path.get(..folder.len())?;
        if !prefix.eq_ignore_ascii_case(folder) {
            return None;
        }

        let rest = &path[folder.len()..];
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }

        Some(ensure_leading_slash(rest))
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// The site resolved for the current request.
///
/// Inserted into request extensions by the site resolver middleware.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub site: SiteDefinition,
    /// Request path relative to the site's virtual folder.
    pub file_path: String,
}
