//! Selection of the configured site serving a request.

use crate::domain::entities::{SiteContext, SiteDefinition};

/// Ordered list of configured sites; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct SiteResolver {
    sites: Vec<SiteDefinition>,
}

impl SiteResolver {
    pub fn new(sites: Vec<SiteDefinition>) -> Self {
        Self { sites }
    }

    pub fn sites(&self) -> &[SiteDefinition] {
        &self.sites
    }

    /// Finds a site by name, ignoring ASCII case.
    pub fn by_name(&self, name: &str) -> Option<&SiteDefinition> {
        self.sites.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Resolves the site for `host` and `path`.
    ///
    /// A site matches when it serves the host and its virtual folder
    /// prefixes the path. The context's file path has the folder stripped.
    pub fn resolve(&self, host: Option<&str>, path: &str) -> Option<SiteContext> {
        self.sites.iter().find_map(|site| {
            if !site.matches_host(host) {
                return None;
            }
            site.strip_virtual_folder(path).map(|file_path| SiteContext {
                site: site.clone(),
                file_path,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str, hosts: &[&str], virtual_folder: &str) -> SiteDefinition {
        SiteDefinition {
            name: name.to_string(),
            host_names: hosts.iter().map(|h| h.to_string()).collect(),
            start_path: format!("/sitecore/content/{}/home", name),
            database: Some("web".to_string()),
            virtual_folder: virtual_folder.to_string(),
        }
    }

    fn resolver() -> SiteResolver {
        SiteResolver::new(vec![
            site("shop", &["example.com"], "/shop"),
            site("main", &["example.com"], ""),
            site("fallback", &["*"], ""),
        ])
    }

    #[test]
    fn test_virtual_folder_site_wins_when_prefixed() {
        let ctx = resolver().resolve(Some("example.com"), "/Shop/old").unwrap();
        assert_eq!(ctx.site.name, "shop");
        assert_eq!(ctx.file_path, "/old");
    }

    #[test]
    fn test_falls_through_to_next_site() {
        let ctx = resolver().resolve(Some("example.com"), "/shopping").unwrap();
        assert_eq!(ctx.site.name, "main");
        assert_eq!(ctx.file_path, "/shopping");

        let ctx = resolver().resolve(Some("other.org"), "/x").unwrap();
        assert_eq!(ctx.site.name, "fallback");
    }

    #[test]
    fn test_no_site() {
        let resolver = SiteResolver::new(vec![site("shop", &["example.com"], "")]);
        assert!(resolver.resolve(Some("other.org"), "/").is_none());
        assert!(resolver.resolve(None, "/").is_none());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(resolver().by_name("MAIN").unwrap().name, "main");
        assert!(resolver().by_name("missing").is_none());
    }
}
