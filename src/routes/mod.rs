//! Routing - route identifiers and build-time path enumeration

mod enumerator;
mod route;

pub use enumerator::{enumerate, Cursor, Page};
pub use route::{RouteId, RouteScheme};

use crate::content::{ContentError, ContentSource, ContentType, DocumentSummary};

/// Every route identifier of one collection, in listing order
pub async fn static_paths<S: ContentSource>(
    source: &S,
    content_type: ContentType,
) -> Result<Vec<RouteId>, ContentError> {
    let scheme = content_type.route_scheme();
    let ids = enumerate(
        |cursor| source.list_page(content_type, cursor),
        |doc: &DocumentSummary| scheme.route_id(&doc.sys),
    )
    .await?;

    tracing::info!("Found {} {} routes", ids.len(), content_type);
    Ok(ids)
}
