//! URL helper functions

use crate::config::SiteConfig;

/// Whether a link points off-site
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
        || path.starts_with("mailto:")
}

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/tracks/") // -> "/academy/tracks/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) || path.starts_with('#') {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/labs/intro/") // -> "https://learn.example.com/academy/labs/intro/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    format!("{}{}", config.url.trim_end_matches('/'), url_for(config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://learn.example.com/".to_string(),
            root: "/academy/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/tracks/"), "/academy/tracks/");
        assert_eq!(url_for(&config, ""), "/academy/");
        assert_eq!(url_for(&config, "https://x.dev/a"), "https://x.dev/a");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/labs/intro/"),
            "https://learn.example.com/academy/labs/intro/"
        );
    }

    #[test]
    fn test_default_root() {
        let config = SiteConfig::default();
        assert_eq!(url_for(&config, "/"), "/");
        assert_eq!(url_for(&config, "modules/a/"), "/modules/a/");
    }
}
