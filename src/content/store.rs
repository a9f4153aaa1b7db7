//! Content store - the query service over `content/<collection>/` files

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{frontmatter, ContentType, Document, DocumentSummary, DocumentSys};
use crate::routes::{Cursor, Page, RouteId, RouteScheme};

/// A page of document summaries
pub type DocumentPage = Page<DocumentSummary>;

/// Errors raised by a content source
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{collection} not found: {route}")]
    NotFound {
        collection: ContentType,
        route: String,
    },

    #[error("invalid cursor for {collection} listing: {cursor}")]
    InvalidCursor {
        collection: ContentType,
        cursor: String,
    },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}

/// Read access to the documents of every collection
pub trait ContentSource {
    /// One page of document summaries, starting after `cursor`
    fn list_page(
        &self,
        content_type: ContentType,
        cursor: Option<Cursor>,
    ) -> impl Future<Output = Result<DocumentPage, ContentError>> + Send;

    /// A single document by its route identifier
    fn get_one(
        &self,
        content_type: ContentType,
        id: &RouteId,
    ) -> impl Future<Output = Result<Document, ContentError>> + Send;
}

/// Content source backed by markdown/MDX files on disk.
///
/// Listings are ordered by relative path. A cursor names the last path
/// returned, so each page starts strictly after everything already served.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    content_dir: PathBuf,
    page_size: usize,
}

impl FsContentStore {
    pub fn new(content_dir: impl Into<PathBuf>, page_size: usize) -> Self {
        Self {
            content_dir: content_dir.into(),
            page_size: page_size.max(1),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Root directory of one collection
    pub fn collection_dir(&self, content_type: ContentType) -> PathBuf {
        self.content_dir.join(content_type.dir())
    }

    /// Sorted relative paths of every stored document of a collection
    fn scan(&self, content_type: ContentType) -> Result<Vec<String>, ContentError> {
        let dir = self.collection_dir(content_type);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        // Filename routes have one segment, so only files directly under the root
        let max_depth = match content_type.route_scheme() {
            RouteScheme::Filename => 1,
            RouteScheme::Breadcrumbs => usize::MAX,
        };

        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(true).max_depth(max_depth) {
            let entry = entry.map_err(|e| ContentError::Io {
                path: dir.clone(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, content_type.extension()) {
                continue;
            }

            let Ok(relative) = path.strip_prefix(&dir) else {
                continue;
            };
            let hidden = relative
                .components()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
            if hidden {
                continue;
            }

            let relative: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            paths.push(relative.join("/"));
        }

        paths.sort();
        Ok(paths)
    }

    fn encode_cursor(content_type: ContentType, relative_path: &str) -> Cursor {
        Cursor::new(format!(
            "{}:{}",
            content_type,
            utf8_percent_encode(relative_path, NON_ALPHANUMERIC)
        ))
    }

    fn decode_cursor(content_type: ContentType, cursor: &Cursor) -> Result<String, ContentError> {
        let invalid = || ContentError::InvalidCursor {
            collection: content_type,
            cursor: cursor.to_string(),
        };

        let encoded = cursor
            .as_str()
            .strip_prefix(content_type.name())
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(invalid)?;

        percent_decode_str(encoded)
            .decode_utf8()
            .map(|path| path.into_owned())
            .map_err(|_| invalid())
    }
}

impl ContentSource for FsContentStore {
    async fn list_page(
        &self,
        content_type: ContentType,
        cursor: Option<Cursor>,
    ) -> Result<DocumentPage, ContentError> {
        let after = cursor
            .as_ref()
            .map(|c| Self::decode_cursor(content_type, c))
            .transpose()?;

        let paths = self.scan(content_type)?;
        let mut remaining = paths
            .iter()
            .filter(|p| after.as_deref().map_or(true, |a| p.as_str() > a));

        let documents: Vec<DocumentSummary> = remaining
            .by_ref()
            .take(self.page_size)
            .map(|p| DocumentSummary::new(content_type, p))
            .collect();
        let has_more = remaining.next().is_some();

        tracing::debug!(
            "Listed {} {} documents (has_more={})",
            documents.len(),
            content_type,
            has_more
        );

        match documents.last() {
            Some(last) if has_more => {
                let cursor = Self::encode_cursor(content_type, &last.sys.relative_path);
                Ok(Page::more(documents, cursor))
            }
            _ => Ok(Page::last(documents)),
        }
    }

    async fn get_one(&self, content_type: ContentType, id: &RouteId) -> Result<Document, ContentError> {
        let not_found = || ContentError::NotFound {
            collection: content_type,
            route: id.path(),
        };
        if !id.is_addressable() {
            return Err(not_found());
        }

        let relative_path = id.relative_path(content_type.extension());
        let path = self.collection_dir(content_type).join(&relative_path);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(source) => return Err(ContentError::Io { path, source }),
        };

        let (fields, body) =
            frontmatter::parse(&raw).map_err(|message| ContentError::FrontMatter {
                path: path.clone(),
                message,
            })?;

        Ok(Document {
            sys: DocumentSys::new(content_type, &relative_path),
            fields,
            body: body.to_string(),
        })
    }
}

/// Exact match, since `get_one` rebuilds the path from the canonical extension
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == extension)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "labs/a-intro.mdx", "---\nname: Intro\n---\nBody A\n");
        write(dir.path(), "labs/b-nmap.mdx", "---\nname: Nmap\n---\nBody B\n");
        write(dir.path(), "labs/c-web/xss.mdx", "---\nname: XSS\n---\nBody C\n");
        write(dir.path(), "labs/notes.txt", "ignored");
        write(dir.path(), "labs/.draft/secret.mdx", "---\nname: Draft\n---\n");
        dir
    }

    #[tokio::test]
    async fn test_list_pages() {
        let dir = fixture();
        let store = FsContentStore::new(dir.path(), 2);

        let first = store.list_page(ContentType::Lab, None).await.unwrap();
        let names: Vec<_> = first.documents.iter().map(|d| d.sys.relative_path.as_str()).collect();
        assert_eq!(names, vec!["a-intro.mdx", "b-nmap.mdx"]);
        assert!(first.has_more);

        let second = store
            .list_page(ContentType::Lab, first.next_cursor.clone())
            .await
            .unwrap();
        let names: Vec<_> = second.documents.iter().map(|d| d.sys.relative_path.as_str()).collect();
        assert_eq!(names, vec!["c-web/xss.mdx"]);
        assert!(!second.has_more);
        assert!(second.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_exactly_full_page_has_no_more() {
        let dir = fixture();
        let store = FsContentStore::new(dir.path(), 3);
        let page = store.list_page(ContentType::Lab, None).await.unwrap();
        assert_eq!(page.documents.len(), 3);
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_cursor_from_other_collection_rejected() {
        let dir = fixture();
        let store = FsContentStore::new(dir.path(), 1);
        let page = store.list_page(ContentType::Lab, None).await.unwrap();

        let err = store
            .list_page(ContentType::Lesson, page.next_cursor)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidCursor { .. }));
    }

    #[tokio::test]
    async fn test_get_one() {
        let dir = fixture();
        let store = FsContentStore::new(dir.path(), 10);
        let id = RouteId::Breadcrumbs(vec!["c-web".to_string(), "xss".to_string()]);

        let doc = store.get_one(ContentType::Lab, &id).await.unwrap();
        assert_eq!(doc.title(), "XSS");
        assert_eq!(doc.sys.breadcrumbs, vec!["c-web", "xss"]);
        assert_eq!(doc.body.trim(), "Body C");
    }

    #[tokio::test]
    async fn test_get_one_not_found() {
        let dir = fixture();
        let store = FsContentStore::new(dir.path(), 10);

        let missing = RouteId::Breadcrumbs(vec!["nope".to_string()]);
        let err = store.get_one(ContentType::Lab, &missing).await.unwrap_err();
        assert!(err.is_not_found());

        let escape = RouteId::Breadcrumbs(vec!["..".to_string(), "labs".to_string()]);
        let err = store.get_one(ContentType::Lab, &escape).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_filename_collection_ignores_nested_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "instructors/jane.md", "---\nfirstName: Jane\n---\n");
        write(dir.path(), "instructors/team/jane.md", "---\nfirstName: Other\n---\n");
        write(dir.path(), "instructors/team/bob.md", "---\nfirstName: Bob\n---\n");
        let store = FsContentStore::new(dir.path(), 10);

        let page = store.list_page(ContentType::Instructor, None).await.unwrap();
        let names: Vec<_> = page.documents.iter().map(|d| d.sys.relative_path.as_str()).collect();
        assert_eq!(names, vec!["jane.md"]);

        let doc = store
            .get_one(ContentType::Instructor, &RouteId::Filename("jane".to_string()))
            .await
            .unwrap();
        assert_eq!(doc.title(), "Jane");
    }

    #[tokio::test]
    async fn test_every_listed_document_resolves() {
        let dir = fixture();
        write(dir.path(), "labs/Upper.MDX", "---\nname: Upper\n---\n");
        let store = FsContentStore::new(dir.path(), 2);

        let mut cursor = None;
        let mut listed = Vec::new();
        loop {
            let page = store.list_page(ContentType::Lab, cursor).await.unwrap();
            listed.extend(page.documents);
            if !page.has_more {
                break;
            }
            cursor = page.next_cursor;
        }

        assert!(listed.iter().all(|d| d.sys.relative_path != "Upper.MDX"));
        for summary in &listed {
            let id = ContentType::Lab.route_scheme().route_id(&summary.sys);
            assert!(store.get_one(ContentType::Lab, &id).await.is_ok(), "{}", id);
        }
    }

    #[tokio::test]
    async fn test_get_one_bad_frontmatter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "instructors/broken.md", "---\nfirstName: [\n---\n");
        let store = FsContentStore::new(dir.path(), 10);

        let id = RouteId::Filename("broken".to_string());
        let err = store.get_one(ContentType::Instructor, &id).await.unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
    }
}
