//! Pagination math shared by list endpoints and repositories.

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound accepted for `page_size`.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Total page count for `total` rows at `page_size` rows per page.
///
/// `ceil(total / page_size)`; a zero `page_size` yields zero pages.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if page_size == 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// Row offset of 1-based `page` at `page_size` rows per page.
pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(42, 10), 5);
        assert_eq!(total_pages(40, 10), 4);
        assert_eq!(total_pages(41, 10), 5);
    }

    #[test]
    fn total_pages_empty_result() {
        assert_eq!(total_pages(0, 20), 0);
    }

    #[test]
    fn total_pages_single_partial_page() {
        assert_eq!(total_pages(1, 100), 1);
    }

    #[test]
    fn total_pages_zero_page_size() {
        assert_eq!(total_pages(42, 0), 0);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(offset(1, 20), 0);
        assert_eq!(offset(2, 20), 20);
        assert_eq!(offset(3, 10), 20);
    }
}
