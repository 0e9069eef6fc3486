//! Page window for dashboard and API listings.

/// Largest page a listing will return.
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Build from optional query parameters, falling back to the defaults.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Self {
        let d = Self::default();
        Self { page: page.unwrap_or(d.page), per_page: per_page.unwrap_or(d.per_page) }
    }

    /// (0-based page index, page size) as sea-orm's paginator wants them.
    pub fn normalize(self) -> (u64, u64) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }

    /// (rows to skip, rows to take) for in-memory slicing.
    pub fn window(self) -> (usize, usize) {
        let (idx, per) = self.normalize();
        ((idx * per) as usize, per as usize)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}
