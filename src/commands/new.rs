//! Create a new document in a collection

use anyhow::{bail, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;

use crate::content::{frontmatter, ContentType};
use crate::LearnSite;

/// Create a document of `content_type` at `path` and return its file path
pub fn create_document(
    site: &LearnSite,
    content_type: ContentType,
    path: &str,
    title: Option<&str>,
) -> Result<PathBuf> {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(slug::slugify)
        .collect();
    let route = content_type.route_scheme().parse(&segments.join("/"));
    if !route.is_addressable() {
        bail!("Invalid {} path: {}", content_type, path);
    }

    let file_path = site
        .content_dir
        .join(content_type.dir())
        .join(route.relative_path(content_type.extension()));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let title = match title {
        Some(title) => title.to_string(),
        None => title_from_slug(segments.last().map(String::as_str).unwrap_or_default()),
    };
    let text = frontmatter::compose(&scaffold(content_type, &title), "")?;

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, text)?;

    tracing::info!("Created {} at {}", content_type, content_type.url_path(&route));
    Ok(file_path)
}

/// Front-matter of a fresh document
fn scaffold(content_type: ContentType, title: &str) -> Mapping {
    let mut fields = Mapping::new();
    let mut set = |key: &str, value: Value| {
        fields.insert(Value::from(key), value);
    };

    match content_type {
        ContentType::Instructor => {
            let (first, last) = title.split_once(' ').unwrap_or((title, ""));
            set("firstName", Value::from(first));
            set("lastName", Value::from(last));
            set("bio", Value::from(""));
        }
        ContentType::Page => {
            set("title", Value::from(title));
            set("blocks", Value::Sequence(Vec::new()));
        }
        ContentType::Lesson => {
            set("name", Value::from(title));
            set("order", Value::from(1));
        }
        ContentType::Lab | ContentType::Module | ContentType::Track => {
            set("name", Value::from(title));
            set("shortDescription", Value::from(""));
            set("description", Value::from(""));
            set("difficulty", Value::from("beginner"));
        }
    }
    fields
}

/// `log-analysis` -> `Log Analysis`
fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentSource, Document};
    use crate::routes::RouteId;
    use tempfile::TempDir;

    async fn load(site: &LearnSite, content_type: ContentType, id: RouteId) -> Document {
        site.store().get_one(content_type, &id).await.unwrap()
    }

    #[tokio::test]
    async fn test_new_nested_lesson() {
        let dir = TempDir::new().unwrap();
        let site = LearnSite::new(dir.path()).unwrap();

        let path = create_document(&site, ContentType::Lesson, "Blue Team/Reading Logs", None).unwrap();
        assert!(path.ends_with("content/lessons/blue-team/reading-logs.mdx"));

        let id = RouteId::Breadcrumbs(vec!["blue-team".to_string(), "reading-logs".to_string()]);
        let doc = load(&site, ContentType::Lesson, id).await;
        assert_eq!(doc.title(), "Reading Logs");
        assert_eq!(doc.order(), Some(1));
    }

    #[tokio::test]
    async fn test_new_instructor_with_title() {
        let dir = TempDir::new().unwrap();
        let site = LearnSite::new(dir.path()).unwrap();

        create_document(&site, ContentType::Instructor, "ada", Some("Ada Lovelace")).unwrap();
        let doc = load(&site, ContentType::Instructor, RouteId::Filename("ada".to_string())).await;
        assert_eq!(doc.title(), "Ada Lovelace");
    }

    #[test]
    fn test_new_rejects_duplicates_and_bad_paths() {
        let dir = TempDir::new().unwrap();
        let site = LearnSite::new(dir.path()).unwrap();

        create_document(&site, ContentType::Lab, "nmap", None).unwrap();
        assert!(create_document(&site, ContentType::Lab, "nmap", None).is_err());
        assert!(create_document(&site, ContentType::Lab, "", None).is_err());
        assert!(create_document(&site, ContentType::Instructor, "a/b", None).is_err());
    }
}
