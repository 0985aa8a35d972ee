/// A page request and, once known, the total row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// 1-based page number
    pub index: u64,

    /// Rows per page. Zero means "no limit".
    pub size: u64,

    /// Total number of rows matched, when already known
    pub total: Option<u64>,
}

impl Paging {
    pub fn page(index: u64, size: u64) -> Paging {
        Paging {
            index,
            size,
            total: None,
        }
    }

    pub fn with_total(mut self, total: u64) -> Paging {
        self.total = Some(total);
        self
    }

    /// The page number actually fetched; never below 1.
    pub fn effective_index(&self) -> u64 {
        self.index.max(1)
    }

    /// Rows to skip. Saturates for page numbers far past any real table.
    pub fn offset(&self) -> u64 {
        self.size.saturating_mul(self.effective_index() - 1)
    }

    /// Number of pages given the known total; `None` while the total is unknown.
    pub fn page_count(&self) -> Option<u64> {
        let total = self.total?;
        if self.size == 0 {
            return Some(u64::from(total > 0));
        }
        Some(total.div_ceil(self.size))
    }

    /// Records the total row count and pulls the page index back within range.
    pub fn resolve(&mut self, total: u64) {
        self.total = Some(total);

        if let Some(count) = self.page_count() {
            self.index = self.index.min(count).max(1);
        }
    }
}
