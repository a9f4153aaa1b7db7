//! Route identifiers and the schemes that derive them from stored documents

use serde::Serialize;
use std::fmt;

use crate::content::DocumentSys;

/// The path-segment value(s) addressing one document's rendered page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RouteId {
    /// A single segment, taken from a file directly under the collection root
    Filename(String),
    /// Every segment from the collection root down to the document
    Breadcrumbs(Vec<String>),
}

impl RouteId {
    /// Route segments in order
    pub fn segments(&self) -> Vec<&str> {
        match self {
            RouteId::Filename(name) => vec![name.as_str()],
            RouteId::Breadcrumbs(crumbs) => crumbs.iter().map(String::as_str).collect(),
        }
    }

    /// Segments joined into a route path, e.g. `track-a/module-1`
    pub fn path(&self) -> String {
        self.segments().join("/")
    }

    /// Storage path of the document relative to its collection root
    pub fn relative_path(&self, extension: &str) -> String {
        format!("{}.{}", self.path(), extension)
    }

    /// A route is addressable only if no segment is empty or walks out of the
    /// collection directory.
    pub fn is_addressable(&self) -> bool {
        let segments = self.segments();
        !segments.is_empty()
            && segments.iter().all(|s| {
                !s.is_empty() && *s != "." && *s != ".." && !s.contains(['/', '\\'])
            })
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// How a collection derives route identifiers from its documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteScheme {
    /// Filename without extension, one segment
    Filename,
    /// Breadcrumbs from the collection root, one segment per directory level
    Breadcrumbs,
}

impl RouteScheme {
    /// Derive the route identifier of a stored document
    pub fn route_id(self, sys: &DocumentSys) -> RouteId {
        match self {
            RouteScheme::Filename => RouteId::Filename(sys.filename.clone()),
            RouteScheme::Breadcrumbs => RouteId::Breadcrumbs(sys.breadcrumbs.clone()),
        }
    }

    /// Parse a user-supplied route path (`a/b`, `/a/b/`) under this scheme
    pub fn parse(self, route: &str) -> RouteId {
        let route = route.trim_matches('/');
        match self {
            RouteScheme::Filename => RouteId::Filename(route.to_string()),
            RouteScheme::Breadcrumbs => {
                RouteId::Breadcrumbs(route.split('/').map(str::to_string).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;

    #[test]
    fn test_filename_scheme_strips_extension() {
        let sys = DocumentSys::new(ContentType::Instructor, "foo-bar.md");
        let id = RouteScheme::Filename.route_id(&sys);
        assert_eq!(id, RouteId::Filename("foo-bar".to_string()));
        assert_eq!(id.segments(), vec!["foo-bar"]);
    }

    #[test]
    fn test_breadcrumb_scheme_keeps_nesting() {
        let sys = DocumentSys::new(ContentType::Module, "track-a/module-1.mdx");
        let id = RouteScheme::Breadcrumbs.route_id(&sys);
        assert_eq!(
            id,
            RouteId::Breadcrumbs(vec!["track-a".to_string(), "module-1".to_string()])
        );
        assert_eq!(id.path(), "track-a/module-1");
        assert_eq!(id.relative_path("mdx"), "track-a/module-1.mdx");
    }

    #[test]
    fn test_parse_route() {
        assert_eq!(
            RouteScheme::Breadcrumbs.parse("/track-a/module-1/"),
            RouteId::Breadcrumbs(vec!["track-a".to_string(), "module-1".to_string()])
        );
        assert_eq!(
            RouteScheme::Filename.parse("jane-doe"),
            RouteId::Filename("jane-doe".to_string())
        );
    }

    #[test]
    fn test_unaddressable_routes() {
        assert!(!RouteScheme::Breadcrumbs.parse("a/../b").is_addressable());
        assert!(!RouteScheme::Breadcrumbs.parse("a//b").is_addressable());
        assert!(!RouteScheme::Filename.parse("").is_addressable());
        assert!(!RouteScheme::Filename.parse("a/b").is_addressable());
        assert!(RouteScheme::Breadcrumbs.parse("a/b").is_addressable());
    }
}
