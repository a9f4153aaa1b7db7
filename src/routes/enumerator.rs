//! Static path enumeration over a cursor-paginated listing

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;

/// Opaque continuation token, valid only for the query that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a listing
#[derive(Debug, Clone)]
pub struct Page<D> {
    /// Documents in listing order
    pub documents: Vec<D>,
    /// Whether the listing continues past this page
    pub has_more: bool,
    /// Present iff `has_more` is true
    pub next_cursor: Option<Cursor>,
}

impl<D> Page<D> {
    /// The final page of a listing
    pub fn last(documents: Vec<D>) -> Self {
        Self {
            documents,
            has_more: false,
            next_cursor: None,
        }
    }

    /// A page followed by more results starting after `cursor`
    pub fn more(documents: Vec<D>, cursor: Cursor) -> Self {
        Self {
            documents,
            has_more: true,
            next_cursor: Some(cursor),
        }
    }
}

/// Drain a paginated listing and collect one identifier per document.
///
/// Pages are requested strictly one after another and identifiers are kept in
/// response order. An empty first page is an empty collection. The walk stops
/// early, without failing, when the listing claims more results but returns
/// an empty page, omits its cursor, or hands back any cursor it has already
/// consumed. Errors from `fetch_page` are returned as-is; no partial list is
/// produced.
pub async fn enumerate<D, I, F, Fut, E>(mut fetch_page: F, id_of: impl Fn(&D) -> I) -> Result<Vec<I>, E>
where
    F: FnMut(Option<Cursor>) -> Fut,
    Fut: Future<Output = Result<Page<D>, E>>,
{
    let mut page = fetch_page(None).await?;
    if page.documents.is_empty() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<I> = page.documents.iter().map(&id_of).collect();
    let mut consumed: HashSet<Cursor> = HashSet::new();
    let mut fetched = 1usize;

    while page.has_more {
        let Some(cursor) = page.next_cursor.take() else {
            tracing::warn!("Listing reported more results without a cursor after {} pages", fetched);
            break;
        };
        if consumed.contains(&cursor) {
            tracing::warn!("Listing returned an already consumed cursor {}, stopping", cursor);
            break;
        }

        tracing::debug!("Fetching page {} after cursor {}", fetched + 1, cursor);
        let next = fetch_page(Some(cursor.clone())).await?;
        consumed.insert(cursor);
        fetched += 1;

        if next.documents.is_empty() {
            tracing::warn!("Listing reported more results but page {} was empty", fetched);
            break;
        }

        ids.extend(next.documents.iter().map(&id_of));
        page = next;
    }

    tracing::debug!("Enumerated {} documents over {} pages", ids.len(), fetched);
    Ok(ids)
}
