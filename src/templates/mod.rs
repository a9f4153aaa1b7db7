//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded in the binary, so a site needs nothing but its
//! content directory and `_config.yml`.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Stylesheet written to `css/site.css`
pub const SITE_CSS: &str = include_str!("site/site.css");

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rich text is rendered to HTML before it reaches a template and plain
        // strings are escaped when the context is built
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("home.html", include_str!("site/home.html")),
            ("list.html", include_str!("site/list.html")),
            ("instructor.html", include_str!("site/instructor.html")),
            ("learning.html", include_str!("site/learning.html")),
            ("page.html", include_str!("site/page.html")),
            ("404.html", include_str!("site/404.html")),
        ])
        .context("Failed to load built-in templates")?;

        Ok(Self { tera })
    }

    /// Render a template with the given context
    pub fn render(&self, template: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("Failed to render template {}", template))
    }
}

/// Site-wide data shared by every page
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
    pub nav: Vec<NavItem>,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: String,
    pub url: String,
}

/// Per-page metadata
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageData {
    pub title: String,
    pub description: String,
    /// URL path including the site root
    pub url: String,
    /// Absolute URL
    pub permalink: String,
    /// Collection name, or `home`, `listing`, `not-found`
    pub kind: String,
    pub kind_label: String,
}

/// A link to another generated page
#[derive(Debug, Clone, Serialize)]
pub struct EntryData {
    pub title: String,
    pub url: String,
    pub summary: Option<String>,
}

/// A labelled fact shown in a document header
#[derive(Debug, Clone, Serialize)]
pub struct FactData {
    pub label: String,
    pub value: String,
}

/// A resolved reference field
#[derive(Debug, Clone, Serialize)]
pub struct LinkData {
    pub field: String,
    pub label: String,
    pub url: Option<String>,
}

/// One step of a track
#[derive(Debug, Clone, Serialize)]
pub struct StepData {
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub url: Option<String>,
    pub required: bool,
    pub locked: bool,
}

/// A capture-the-flag objective of a lab, without its answer
#[derive(Debug, Clone, Serialize)]
pub struct FlagData {
    pub name: String,
    pub description: Option<String>,
    pub points: Option<i64>,
}

/// One collection summarised on the home page
#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub label: String,
    pub url: String,
    pub count: usize,
    pub entries: Vec<EntryData>,
}

/// Everything a document template can show
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentView {
    /// Raw front-matter fields
    pub doc: serde_yaml::Mapping,
    /// Rendered rich-text fields
    pub html: HashMap<String, String>,
    /// Rendered body
    pub body: String,
    pub facts: Vec<FactData>,
    pub links: Vec<LinkData>,
    pub steps: Vec<StepData>,
    pub flags: Vec<FlagData>,
    pub related: Vec<EntryData>,
    pub related_label: String,
    /// Rendered page-builder sections
    pub blocks: String,
}

impl DocumentView {
    /// Insert every field into a template context
    pub fn insert_into(&self, context: &mut Context) {
        context.insert("doc", &self.doc);
        context.insert("html", &self.html);
        context.insert("body", &self.body);
        context.insert("facts", &self.facts);
        context.insert("links", &self.links);
        context.insert("steps", &self.steps);
        context.insert("flags", &self.flags);
        context.insert("related", &self.related);
        context.insert("related_label", &self.related_label);
        context.insert("blocks", &self.blocks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "Academy".to_string(),
            description: String::new(),
            language: "en".to_string(),
            root: "/".to_string(),
            nav: vec![NavItem {
                label: "Labs".to_string(),
                url: "/labs/".to_string(),
            }],
            year: 2026,
        }
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_render_listing() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("head", "");
        context.insert(
            "page",
            &PageData {
                title: "Labs".to_string(),
                url: "/labs/".to_string(),
                kind: "listing".to_string(),
                ..Default::default()
            },
        );
        context.insert(
            "entries",
            &vec![EntryData {
                title: "Packet Capture".to_string(),
                url: "/labs/pcap/".to_string(),
                summary: None,
            }],
        );

        let html = renderer.render("list.html", &context).unwrap();
        assert!(html.contains("<title>Labs | Academy</title>"));
        assert!(html.contains(r#"<a href="/labs/pcap/">Packet Capture</a>"#));
        assert!(html.contains(r#"<a href="/labs/" class="active">Labs</a>"#));
    }

    #[test]
    fn test_render_learning_document() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("head", "");
        context.insert(
            "page",
            &PageData {
                title: "Port Scanning".to_string(),
                kind: "lab".to_string(),
                kind_label: "Lab".to_string(),
                ..Default::default()
            },
        );
        let view = DocumentView {
            doc: serde_yaml::from_str("name: Port Scanning\nshortDescription: Find open ports\n")
                .unwrap(),
            body: "<p>Run nmap.</p>".to_string(),
            flags: vec![FlagData {
                name: "First flag".to_string(),
                description: None,
                points: Some(50),
            }],
            ..Default::default()
        };
        view.insert_into(&mut context);

        let html = renderer.render("learning.html", &context).unwrap();
        assert!(html.contains("<h1>Port Scanning</h1>"));
        assert!(html.contains("Find open ports"));
        assert!(html.contains("<p>Run nmap.</p>"));
        assert!(html.contains("(50 pts)"));
    }
}
