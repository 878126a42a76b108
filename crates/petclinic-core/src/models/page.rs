//! Pagination envelope shared by the listing operations.

use serde::{Deserialize, Serialize};

/// One page of results. `page` is 1-based; `pages = ceil(total / limit)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl<T> Paginated<T> {
    /// Build a page envelope, computing the page count from the total.
    pub fn new(items: Vec<T>, page: u32, limit: u32, total: i64) -> Self {
        let pages = (total + i64::from(limit) - 1) / i64::from(limit);
        Self {
            items,
            page,
            limit,
            total,
            pages,
        }
    }
}
