//! Content collections and their storage and routing conventions

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::routes::{RouteId, RouteScheme};

/// A managed content collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Instructor,
    Lab,
    Lesson,
    Module,
    Track,
    /// Marketing pages assembled from blocks
    Page,
}

impl ContentType {
    /// Every routable collection
    pub const ALL: [ContentType; 6] = [
        ContentType::Instructor,
        ContentType::Lab,
        ContentType::Lesson,
        ContentType::Module,
        ContentType::Track,
        ContentType::Page,
    ];

    /// Collections that get a listing page and a menu entry
    pub const LEARNING: [ContentType; 5] = [
        ContentType::Track,
        ContentType::Module,
        ContentType::Lesson,
        ContentType::Lab,
        ContentType::Instructor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContentType::Instructor => "instructor",
            ContentType::Lab => "lab",
            ContentType::Lesson => "lesson",
            ContentType::Module => "module",
            ContentType::Track => "track",
            ContentType::Page => "page",
        }
    }

    /// Human-readable plural label
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Instructor => "Instructors",
            ContentType::Lab => "Labs",
            ContentType::Lesson => "Lessons",
            ContentType::Module => "Modules",
            ContentType::Track => "Tracks",
            ContentType::Page => "Pages",
        }
    }

    /// Directory under the content root
    pub fn dir(self) -> &'static str {
        match self {
            ContentType::Instructor => "instructors",
            ContentType::Lab => "labs",
            ContentType::Lesson => "lessons",
            ContentType::Module => "modules",
            ContentType::Track => "tracks",
            ContentType::Page => "pages",
        }
    }

    /// File extension of stored documents
    pub fn extension(self) -> &'static str {
        match self {
            ContentType::Instructor => "md",
            _ => "mdx",
        }
    }

    pub fn route_scheme(self) -> RouteScheme {
        match self {
            ContentType::Instructor => RouteScheme::Filename,
            _ => RouteScheme::Breadcrumbs,
        }
    }

    /// First URL segment of the collection's pages; pages live at the root
    pub fn route_prefix(self) -> Option<&'static str> {
        match self {
            ContentType::Page => None,
            other => Some(other.dir()),
        }
    }

    /// URL path (without site root) of a document, always ending in `/`
    ///
    /// The `home` page maps to the site root.
    pub fn url_path(self, id: &RouteId) -> String {
        let route = id.path();
        match self.route_prefix() {
            None if route == "home" => "/".to_string(),
            None => format!("/{}/", route),
            Some(prefix) => format!("/{}/{}/", prefix, route),
        }
    }

    /// URL path of the collection's listing page
    pub fn index_path(self) -> String {
        match self.route_prefix() {
            Some(prefix) => format!("/{}/", prefix),
            None => "/".to_string(),
        }
    }

    /// Front-matter fields holding markdown rich text
    pub fn rich_text_fields(self) -> &'static [&'static str] {
        match self {
            ContentType::Instructor => &["bio"],
            ContentType::Lab => &["description", "instructions", "solution"],
            ContentType::Module | ContentType::Track => &["description"],
            ContentType::Lesson | ContentType::Page => &[],
        }
    }

    /// Resolve a reference field (`content/modules/a/b.mdx`) to its target
    pub fn resolve_reference(content_dir: &str, reference: &str) -> Option<(ContentType, RouteId)> {
        let content_dir = content_dir.trim_matches('/');
        let reference = reference.trim_start_matches('/');
        let rest = reference
            .strip_prefix(content_dir)
            .and_then(|r| r.strip_prefix('/'))
            .unwrap_or(reference);

        let (dir, relative) = rest.split_once('/')?;
        let content_type = ContentType::ALL.into_iter().find(|c| c.dir() == dir)?;
        let relative = relative.strip_suffix(&format!(".{}", content_type.extension()))?;

        let id = content_type.route_scheme().parse(relative);
        id.is_addressable().then_some((content_type, id))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        ContentType::ALL
            .into_iter()
            .find(|c| c.name() == s || c.dir() == s)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown content type: {}. Available: instructor, lab, lesson, module, track, page",
                    s
                )
            })
    }
}
