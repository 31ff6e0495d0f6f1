//! Pagination windows over repository results and in-memory collections.

use serde::Serialize;

use crate::config::ListingConfig;
use crate::models::shared::Pagination;

/// Query-string parameter used by the main permission list.
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Largest row offset a list query may produce (Postgres `OFFSET` is a bigint).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// A single page of items, ready for a view.
///
/// `page_param` names the query-string parameter that selects the page, so a
/// view showing several independent lists can build links for each of them.
#[derive(Serialize, Clone, Debug, utoipa::ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
    #[schema(example = "page")]
    pub page_param: String,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, page_param: &str) -> Self {
        Self {
            data,
            pagination,
            page_param: page_param.to_string(),
        }
    }
}

/// Resolved list parameters handed to a repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
    /// Trimmed, non-empty search term.
    pub search: Option<String>,
}

impl ListParams {
    /// Apply defaults and bounds to raw query values.
    ///
    /// The page is capped so that its offset never exceeds [`MAX_OFFSET`].
    pub fn resolve(
        page: Option<u64>,
        per_page: Option<u64>,
        search: Option<String>,
        listing: &ListingConfig,
    ) -> Self {
        let max_per_page = Ord::max(listing.max_per_page, 1);
        let per_page = per_page
            .unwrap_or(listing.per_page)
            .clamp(1, max_per_page);
        let max_page = MAX_OFFSET / per_page + 1;
        Self {
            page: page.unwrap_or(1).clamp(1, max_page),
            per_page,
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Slice one page out of an already materialised collection.
///
/// A missing or zero page selects the first page; a page past the end
/// yields no items but keeps the totals.
pub fn paginate_items<T>(
    items: Vec<T>,
    per_page: u64,
    page: Option<u64>,
    page_param: &str,
) -> Paginated<T> {
    let per_page = Ord::max(per_page, 1);
    let page = Ord::max(page.unwrap_or(1), 1);
    let total = items.len() as u64;
    let offset = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
    let limit = usize::try_from(per_page).unwrap_or(usize::MAX);

    let data = items.into_iter().skip(offset).take(limit).collect();

    Paginated::new(data, Pagination::new(page, per_page, total), page_param)
}
