use crate::error::{AppError, AppResult};

pub const MAX_PAGE: i64 = 1_000_000;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_LIMIT: i64 = 20;

/// Validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Defaults to page 1 and [`DEFAULT_LIMIT`] when absent.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_PAGE).contains(&page) {
            return Err(AppError::bad_request(format!(
                "page must be between 1 and {MAX_PAGE}"
            )));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::bad_request(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// In-memory slice of an already sorted list.
    #[cfg(test)]
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_windows() {
        assert!(Page::new(Some(1), Some(0)).is_err());
        assert!(Page::new(Some(1), Some(101)).is_err());
        assert!(Page::new(Some(0), Some(10)).is_err());
        assert!(Page::new(Some(1_000_001), Some(10)).is_err());
    }

    #[test]
    fn accepts_bounds_and_defaults() {
        let p = Page::new(Some(1_000_000), Some(100)).unwrap();
        assert_eq!(p.offset(), 999_999 * 100);

        let p = Page::new(None, None).unwrap();
        assert_eq!(p, Page { page: 1, limit: DEFAULT_LIMIT });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn apply_slices_the_window() {
        let p = Page::new(Some(2), Some(2)).unwrap();
        assert_eq!(p.apply(vec![1, 2, 3, 4, 5]), vec![3, 4]);
    }
}
