//! Document models

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::ContentType;

/// Storage metadata of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSys {
    /// Owning collection
    pub collection: ContentType,
    /// Path relative to the collection root, `/`-separated
    pub relative_path: String,
    /// File name without extension
    pub filename: String,
    /// File name with extension
    pub basename: String,
    /// File extension without the dot
    pub extension: String,
    /// Path segments from the collection root, extension stripped
    pub breadcrumbs: Vec<String>,
}

impl DocumentSys {
    pub fn new(collection: ContentType, relative_path: &str) -> Self {
        let relative_path = relative_path.replace('\\', "/");
        let basename = relative_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        let (filename, extension) = match basename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), ext.to_string()),
            _ => (basename.clone(), String::new()),
        };

        let without_ext = if extension.is_empty() {
            relative_path.as_str()
        } else {
            &relative_path[..relative_path.len() - extension.len() - 1]
        };
        let breadcrumbs = without_ext.split('/').map(str::to_string).collect();

        Self {
            collection,
            relative_path,
            filename,
            basename,
            extension,
            breadcrumbs,
        }
    }
}

/// A listing entry: enough to route a document without reading it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub sys: DocumentSys,
}

impl DocumentSummary {
    pub fn new(collection: ContentType, relative_path: &str) -> Self {
        Self {
            sys: DocumentSys::new(collection, relative_path),
        }
    }
}

/// A fully loaded document
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub sys: DocumentSys,
    /// Front-matter fields
    pub fields: Mapping,
    /// Markdown/MDX body
    pub body: String,
}

impl Document {
    /// Look up a front-matter field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a non-empty string field
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Display title
    pub fn title(&self) -> String {
        let title = match self.sys.collection {
            ContentType::Instructor => {
                let name: Vec<&str> = ["firstName", "lastName"]
                    .iter()
                    .filter_map(|k| self.field_str(k))
                    .collect();
                (!name.is_empty()).then(|| name.join(" "))
            }
            ContentType::Page => self
                .field_str("title")
                .or_else(|| self.field_str("name"))
                .map(str::to_string),
            _ => self.field_str("name").map(str::to_string),
        };

        title.unwrap_or_else(|| self.sys.filename.clone())
    }

    /// Numeric `order` field, used to sort siblings
    pub fn order(&self) -> Option<i64> {
        self.field("order").and_then(Value::as_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(collection: ContentType, yaml: &str) -> Document {
        Document {
            sys: DocumentSys::new(collection, "sample-doc.mdx"),
            fields: serde_yaml::from_str(yaml).unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn test_sys_from_nested_path() {
        let sys = DocumentSys::new(ContentType::Lesson, "track-a/module-1/intro.mdx");
        assert_eq!(sys.filename, "intro");
        assert_eq!(sys.basename, "intro.mdx");
        assert_eq!(sys.extension, "mdx");
        assert_eq!(sys.breadcrumbs, vec!["track-a", "module-1", "intro"]);
    }

    #[test]
    fn test_sys_keeps_inner_dots() {
        let sys = DocumentSys::new(ContentType::Instructor, "j.doe.md");
        assert_eq!(sys.filename, "j.doe");
        assert_eq!(sys.breadcrumbs, vec!["j.doe"]);
    }

    #[test]
    fn test_instructor_title() {
        let doc = document(ContentType::Instructor, "firstName: Ada\nlastName: Lovelace\n");
        assert_eq!(doc.title(), "Ada Lovelace");
    }

    #[test]
    fn test_title_falls_back_to_filename() {
        let doc = document(ContentType::Lab, "difficulty: beginner\n");
        assert_eq!(doc.title(), "sample-doc");

        let doc = document(ContentType::Lab, "name: Packet Capture\norder: 3\n");
        assert_eq!(doc.title(), "Packet Capture");
        assert_eq!(doc.order(), Some(3));
    }
}
