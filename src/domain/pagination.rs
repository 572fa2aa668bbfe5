use serde::Serialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: usize = 8;

/// A validated `(page, limit)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Build a page request. A zero page is treated as the first page.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Number of matches that precede this page.
    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

/// Entry of the page number strip rendered under a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNumber {
    pub number: usize,
    pub is_current: bool,
}

/// Navigation data derived from `(page, limit, total_count)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationResult {
    pub page_numbers: Vec<PageNumber>,
    pub has_previous_page: bool,
    pub previous_page: usize,
    pub has_next_page: bool,
    pub next_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Items of one page together with their navigation data.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub pagination: PaginationResult,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, pagination: PaginationResult) -> Self {
        Self { items, pagination }
    }
}

/// Compute the navigation data for `page` of a result set holding
/// `total_count` matches split into pages of `limit` items.
///
/// Pages past the end are not clamped: they simply report no next page.
pub fn paginate(total_count: usize, limit: usize, page: usize) -> PaginationResult {
    let total_pages = if limit == 0 {
        0
    } else {
        total_count.div_ceil(limit)
    };

    let page_numbers = (1..=total_pages)
        .map(|number| PageNumber {
            number,
            is_current: number == page,
        })
        .collect();

    PaginationResult {
        page_numbers,
        has_previous_page: page > 1,
        previous_page: page.saturating_sub(1),
        has_next_page: page < total_pages,
        next_page: page + 1,
        total_pages,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_marks_current_page() {
        let result = paginate(17, 8, 2);

        assert_eq!(result.total_pages, 3);
        let numbers: Vec<usize> = result.page_numbers.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        let current: Vec<usize> = result
            .page_numbers
            .iter()
            .filter(|p| p.is_current)
            .map(|p| p.number)
            .collect();
        assert_eq!(current, vec![2]);
        assert!(result.has_previous_page);
        assert_eq!(result.previous_page, 1);
        assert!(result.has_next_page);
        assert_eq!(result.next_page, 3);
    }

    #[test]
    fn paginate_first_and_last_page_flags() {
        let first = paginate(16, 8, 1);
        assert!(!first.has_previous_page);
        assert!(first.has_next_page);

        let last = paginate(16, 8, 2);
        assert!(last.has_previous_page);
        assert!(!last.has_next_page);
    }

    #[test]
    fn paginate_total_pages_is_ceiling() {
        for total in 0..50usize {
            for limit in 1..10usize {
                let expected = (total + limit - 1) / limit;
                assert_eq!(paginate(total, limit, 1).total_pages, expected);
            }
        }
    }

    #[test]
    fn paginate_zero_limit_has_no_pages() {
        let result = paginate(10, 0, 1);
        assert_eq!(result.total_pages, 0);
        assert!(result.page_numbers.is_empty());
        assert!(!result.has_next_page);
    }

    #[test]
    fn paginate_accepts_pages_past_the_end() {
        let result = paginate(5, 8, 4);
        assert_eq!(result.total_pages, 1);
        assert!(result.page_numbers.iter().all(|p| !p.is_current));
        assert!(result.has_previous_page);
        assert!(!result.has_next_page);
    }

    #[test]
    fn paginate_is_pure() {
        assert_eq!(paginate(42, 5, 3), paginate(42, 5, 3));
    }

    #[test]
    fn page_request_skip() {
        assert_eq!(PageRequest::new(1, 8).skip(), 0);
        assert_eq!(PageRequest::new(3, 8).skip(), 16);
        assert_eq!(PageRequest::new(0, 8).page, 1);
    }
}
