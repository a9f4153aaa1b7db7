//! Content module - collections, documents, and the file-backed content store

mod collection;
mod document;
pub mod frontmatter;
mod markdown;
mod store;

pub use collection::ContentType;
pub use document::{Document, DocumentSummary, DocumentSys};
pub use markdown::{expand_mdx, MarkdownRenderer};
pub use store::{ContentError, ContentSource, DocumentPage, FsContentStore};
