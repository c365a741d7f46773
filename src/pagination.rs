//! Pagination

/// Number of records on each page.
pub const PAGE_SIZE: u32 = 10;

/// A one-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest { page: 1 }
    }
}

impl PageRequest {
    /// Request a page. Anything below one is treated as the first page.
    pub fn new(page: i64) -> Self {
        PageRequest {
            page: u32::try_from(page.max(1)).unwrap_or(u32::MAX),
        }
    }

    /// The one-based page number.
    pub fn page(self) -> u32 {
        self.page
    }

    /// Maximum number of records on the page.
    pub fn limit(self) -> u32 {
        PAGE_SIZE
    }

    /// Number of records before the page.
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(PAGE_SIZE)
    }
}

/// One page of records plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,

    /// The one-based page number.
    pub page: u32,

    /// Total number of pages.
    pub pages: u64,

    /// Total number of matching records.
    pub count: u64,
}

impl<T> Page<T> {
    /// Build a page from its records and the total number of matching records.
    pub fn new(items: Vec<T>, request: PageRequest, count: u64) -> Self {
        Page {
            items,
            page: request.page(),
            pages: count.div_ceil(u64::from(PAGE_SIZE)),
            count,
        }
    }

    /// Convert every record on the page, keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            pages: self.pages,
            count: self.count,
        }
    }
}
