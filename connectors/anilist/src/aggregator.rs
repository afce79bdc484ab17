//! List page fetching.

use tracing::{debug, instrument};
use tracker_graphql::{
    GraphqlClient, GraphqlClientError, PageCursor, PageLimit, PagedResults, ProtocolError,
    paginate_pages,
};

use crate::filters::SearchVariables;
use crate::normalize::{DisplayItem, normalize_record};
use crate::queries::MediaPageQuery;
use crate::settings::synonyms_enabled;

/// Fetches list pages and normalizes their records.
#[derive(Debug, Clone, Copy)]
pub struct PageAggregator<'a> {
    client: &'a GraphqlClient,
}

impl<'a> PageAggregator<'a> {
    /// Create an aggregator over `client`.
    #[must_use]
    pub const fn new(client: &'a GraphqlClient) -> Self {
        Self { client }
    }

    /// Fetch one page of `base`, starting at page 1 when `page` is `None`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::EmptyResultSet`] when the remote omits the page
    /// or its record list, and any executor error unchanged.
    #[instrument(skip(self, base), fields(page = page.unwrap_or(1)))]
    pub async fn fetch_page(
        &self,
        base: &SearchVariables,
        needs_auth: bool,
        page: Option<u32>,
    ) -> Result<PagedResults<DisplayItem>, GraphqlClientError> {
        let page_number = page.unwrap_or(1);
        let variables = SearchVariables {
            page: Some(page_number),
            ..base.clone()
        };

        let data = self
            .client
            .execute_with_auth::<MediaPageQuery>(&variables, needs_auth)
            .await?;

        let page = data.page.ok_or(ProtocolError::EmptyResultSet)?;
        let records = page.media.ok_or(ProtocolError::EmptyResultSet)?;
        let has_more = page.page_info.is_some_and(|info| info.has_next_page);

        let show_synonyms = synonyms_enabled(self.client.store().as_ref());
        let items: Vec<DisplayItem> = records
            .iter()
            .map(|record| normalize_record(record, show_synonyms))
            .collect();
        debug!(items = items.len(), has_more, "fetched list page");

        Ok(PagedResults {
            items,
            next_page: PageCursor::new(page_number, has_more).next(),
        })
    }

    /// Follow pages from page 1 until the remote reports no more, or `limit`
    /// items were collected.
    pub async fn fetch_all(
        &self,
        base: &SearchVariables,
        needs_auth: bool,
        limit: Option<PageLimit>,
    ) -> Result<Vec<DisplayItem>, GraphqlClientError> {
        paginate_pages(1, limit, |page| self.fetch_page(base, needs_auth, Some(page))).await
    }
}
