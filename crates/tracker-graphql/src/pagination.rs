//! Page-number cursor helpers.

use std::future::Future;

use serde::Serialize;

/// Page-number cursor.
///
/// Page numbers start at 1. A cursor yields the following page number only
/// while the remote reports more pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Page the cursor describes.
    pub page_number: u32,
    /// Whether the remote reported another page.
    pub has_more: bool,
}

impl PageCursor {
    /// Create a cursor.
    #[must_use]
    pub const fn new(page_number: u32, has_more: bool) -> Self {
        Self {
            page_number,
            has_more,
        }
    }

    /// Consume the cursor and return the next page number, if any.
    #[must_use]
    pub const fn next(self) -> Option<u32> {
        if self.has_more {
            Some(self.page_number.saturating_add(1))
        } else {
            None
        }
    }
}

/// One fetched page and where to continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResults<T> {
    /// Items in the page.
    pub items: Vec<T>,
    /// Page to request next; `None` ends paging.
    pub next_page: Option<u32>,
}

/// Page limit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit {
    /// Maximum number of items to fetch.
    pub max_items: usize,
}

impl PageLimit {
    /// Create a new limit.
    #[must_use]
    pub const fn new(max_items: usize) -> Self {
        Self { max_items }
    }
}

/// Follow page numbers until the remote stops reporting more pages.
///
/// Empty pages do not end paging; only a missing next page does. With a
/// limit, paging also stops once `max_items` items were collected.
pub async fn paginate_pages<T, E, F, Fut>(
    first_page: u32,
    limit: Option<PageLimit>,
    mut fetch_page: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PagedResults<T>, E>>,
{
    let mut out = Vec::new();
    let mut page_number = first_page;
    loop {
        let page = fetch_page(page_number).await?;
        if let Some(limit) = limit {
            let remaining = limit.max_items.saturating_sub(out.len());
            out.extend(page.items.into_iter().take(remaining));
            if out.len() >= limit.max_items {
                break;
            }
        } else {
            out.extend(page.items);
        }

        match page.next_page {
            Some(next) => page_number = next,
            None => break,
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn page(items: Vec<u32>, next_page: Option<u32>) -> PagedResults<u32> {
        PagedResults { items, next_page }
    }

    #[test]
    fn test_cursor_next() {
        assert_eq!(PageCursor::new(1, true).next(), Some(2));
        assert_eq!(PageCursor::new(7, false).next(), None);
    }

    #[tokio::test]
    async fn test_follows_empty_pages_until_none() {
        let calls = Cell::new(0);
        let items = paginate_pages::<_, (), _, _>(1, None, |number| {
            calls.set(calls.get() + 1);
            async move {
                Ok(match number {
                    1 => page(vec![1, 2], Some(2)),
                    2 => page(vec![], Some(3)),
                    _ => page(vec![3], None),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_limit_stops_early() {
        let items = paginate_pages::<_, (), _, _>(1, Some(PageLimit::new(3)), |number| async move {
            Ok(page(vec![number * 10, number * 10 + 1], Some(number + 1)))
        })
        .await
        .unwrap();

        assert_eq!(items, vec![10, 11, 20]);
    }

    #[tokio::test]
    async fn test_error_stops_paging() {
        let result = paginate_pages::<u32, _, _, _>(1, None, |number| async move {
            if number == 2 {
                Err("boom")
            } else {
                Ok(page(vec![1], Some(2)))
            }
        })
        .await;

        assert_eq!(result, Err("boom"));
    }
}
