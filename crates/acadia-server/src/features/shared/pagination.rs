//! Shared pagination utilities
//!
//! Common pagination types used by list queries: request parameters with
//! sensible defaults (page 1, 20 items, clamped to 100) and response
//! metadata.

use serde::{Deserialize, Serialize};

/// Common pagination request parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Items per page. Defaults to 20, clamped to 1-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    /// Get the page number (1-indexed), defaulting to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get items per page, defaulting to 20 and clamped to 1-100
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    /// Calculate the offset for the SQL OFFSET clause
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }

    /// Validate pagination parameters, rejecting explicit out-of-range values.
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(page) = self.page {
            if page < 1 {
                return Err("Page must be greater than 0");
            }
        }
        if let Some(per_page) = self.per_page {
            if !(1..=100).contains(&per_page) {
                return Err("Per page must be between 1 and 100");
            }
        }
        Ok(())
    }
}

/// Pagination metadata for list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            ((total as f64) / (per_page as f64)).ceil() as i64
        };

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        Self::new(params.page(), params.per_page(), total)
    }
}

/// Wrapper for paginated list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn from_items(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::from_params(params, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_clamping() {
        let params = PaginationParams::new(Some(-1), Some(200));
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 100);
    }

    #[test]
    fn test_pagination_params_validation() {
        assert!(PaginationParams::new(Some(1), Some(50)).validate().is_ok());
        assert!(PaginationParams::new(Some(0), Some(20)).validate().is_err());
        assert!(PaginationParams::new(Some(1), Some(101)).validate().is_err());
    }

    #[test]
    fn test_pagination_metadata() {
        let meta = PaginationMetadata::new(2, 10, 25);
        assert_eq!(meta.pages, 3);
        assert!(meta.has_prev);
        assert!(meta.has_next);

        let last = PaginationMetadata::new(3, 10, 25);
        assert!(!last.has_next);

        let empty = PaginationMetadata::new(1, 10, 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next && !empty.has_prev);
    }
}
