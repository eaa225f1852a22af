//! Page metadata for list responses.

use serde::{Deserialize, Serialize};

/// Pagination block returned alongside list data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub total_count: usize,
    pub page: usize,
    pub per_page: usize,
    pub page_count: usize,
}

impl Meta {
    /// Builds metadata for `total` rows.
    ///
    /// A `per_page` of zero falls back to `default_limit`, which is parsed here rather
    /// than at startup, so a malformed default only surfaces on the first list request.
    /// `page` is clamped into `1..=page_count`.
    pub fn new(
        page: usize,
        per_page: usize,
        total: usize,
        default_limit: &str,
    ) -> Result<Self, std::num::ParseIntError> {
        let per_page = if per_page == 0 {
            default_limit.trim().parse::<usize>()?
        } else {
            per_page
        };

        let page_count = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        let page = page.min(page_count).max(1);

        Ok(Self {
            total_count: total,
            page,
            per_page,
            page_count,
        })
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> usize {
        self.per_page
    }
}
