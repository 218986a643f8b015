use serde::Serialize;
use std::num::NonZeroU64;

/// How many posts fit on a single page.
pub const RECORD_COUNT: NonZeroU64 = match NonZeroU64::new(10) {
    Some(n) => n,
    None => panic!("RECORD_COUNT is accidentally set to 0"),
};

/// Splits a counted result set into fixed size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: NonZeroU64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(RECORD_COUNT)
    }
}

impl Paginator {
    #[must_use]
    pub const fn new(per_page: NonZeroU64) -> Self {
        Self { per_page }
    }

    /// Resolves the `page` query parameter against `count` records.
    ///
    /// Anything that is not an integer falls back to the first
    /// page; integers outside of the page range fall back to the
    /// last page. There is always at least one page.
    #[must_use]
    pub fn window(&self, requested: Option<&str>, count: u64) -> Window {
        let per_page = self.per_page.get();
        let num_pages = count.div_ceil(per_page).max(1);

        let number = match requested.map(|v| v.trim().parse::<i64>()) {
            None | Some(Err(..)) => 1,
            Some(Ok(n)) => match u64::try_from(n) {
                Ok(n) if (1..=num_pages).contains(&n) => n,
                _ => num_pages,
            },
        };

        Window {
            number,
            num_pages,
            count,
            per_page,
        }
    }
}

/// A single resolved page, before its records are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    per_page: u64,
}

impl Window {
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page
    }

    #[must_use]
    pub fn into_page<T>(self, object_list: Vec<T>) -> Page<T> {
        let has_previous = self.number > 1;
        let has_next = self.number < self.num_pages;
        Page {
            object_list,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_previous,
            has_next,
            previous_page_number: has_previous.then(|| self.number - 1),
            next_page_number: has_next.then(|| self.number + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<u64>,
    pub next_page_number: Option<u64>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_by_default() {
        let window = Paginator::default().window(None, 13);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 2);
        assert_eq!(window.offset(), 0);
        assert_eq!(window.limit(), 10);
    }

    #[test]
    fn test_second_page() {
        let window = Paginator::default().window(Some("2"), 13);
        assert_eq!(window.number, 2);
        assert_eq!(window.offset(), 10);

        let page = window.into_page(vec![(); 3]);
        assert_eq!(page.len(), 3);
        assert!(page.has_previous);
        assert!(!page.has_next);
        assert_eq!(page.previous_page_number, Some(1));
        assert_eq!(page.next_page_number, None);
    }

    #[test]
    fn test_invalid_numbers() {
        let paginator = Paginator::default();
        assert_eq!(paginator.window(Some("abc"), 25).number, 1);
        assert_eq!(paginator.window(Some("2.0"), 25).number, 1);
        assert_eq!(paginator.window(Some("99"), 25).number, 3);
        assert_eq!(paginator.window(Some("0"), 25).number, 3);
        assert_eq!(paginator.window(Some("-4"), 25).number, 3);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let window = Paginator::default().window(Some("5"), 0);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);

        let page = window.into_page(Vec::<()>::new());
        assert!(page.is_empty());
        assert!(!page.has_previous);
        assert!(!page.has_next);
    }
}
