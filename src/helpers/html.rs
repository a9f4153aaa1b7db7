//! HTML helper functions

use super::url::{is_external, url_for};
use crate::config::SiteConfig;

/// Generate an anchor tag; off-site links open in a new tab
///
/// # Examples
/// ```ignore
/// link_to(&config, "/tracks/", "Tracks") // -> <a href="/tracks/">Tracks</a>
/// ```
pub fn link_to(config: &SiteConfig, path: &str, text: &str) -> String {
    let href = url_for(config, path);
    if is_external(path) {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            escape_html(&href),
            escape_html(text)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, escape_html(&href), escape_html(text))
    }
}

/// Generate an image tag
pub fn image_tag(config: &SiteConfig, path: &str, alt: Option<&str>) -> String {
    format!(
        r#"<img src="{}" alt="{}" loading="lazy">"#,
        escape_html(&url_for(config, path)),
        escape_html(alt.unwrap_or(""))
    )
}

/// Generate Open Graph meta tags
pub fn open_graph(title: &str, description: &str, url: &str, site_name: &str) -> String {
    let mut tags = vec![
        r#"<meta property="og:type" content="website">"#.to_string(),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            escape_html(title)
        ),
        format!(r#"<meta property="og:url" content="{}">"#, escape_html(url)),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            escape_html(site_name)
        ),
    ];

    if !description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            escape_html(description)
        ));
    }

    tags.join("\n")
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="learnsite {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate a string to a number of characters, whitespace collapsed
pub fn truncate(s: &str, length: usize) -> String {
    const OMISSION: &str = "...";
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");

    if s.chars().count() <= length {
        s
    } else {
        let truncated: String = s.chars().take(length.saturating_sub(OMISSION.len())).collect();
        format!("{}{}", truncated.trim_end(), OMISSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_to() {
        let config = SiteConfig::default();
        assert_eq!(
            link_to(&config, "/tracks/", "Tracks"),
            r#"<a href="/tracks/">Tracks</a>"#
        );
        assert!(link_to(&config, "https://example.com", "Ext").contains("noopener"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi\n  there", 10), "Hi there");
    }
}
