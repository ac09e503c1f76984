/// Page/limit pagination state with a single-flight guard. The
/// controller only decides; issuing the fetch and applying its result
/// happen in the reconciler, which keeps every transition synchronously
/// testable.
#[derive(Debug)]
pub struct Pager {
    page: u32,
    has_more: bool,
    loading: bool,
    limit: u32,
}

impl Pager {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            has_more: true,
            loading: false,
            limit,
        }
    }

    /// Claims the next fetch. Returns the page number to request, or
    /// None when a fetch is already in flight or the history is
    /// exhausted. Near-simultaneous scroll triggers all collapse here.
    pub fn begin(&mut self) -> Option<u32> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(self.page)
    }

    /// Applies a completed fetch. A page shorter than the limit means
    /// the history is exhausted.
    pub fn complete(&mut self, fetched: usize) {
        self.has_more = fetched == self.limit as usize;
        self.page += 1;
        self.loading = false;
    }

    /// A failed fetch clears the in-flight flag and nothing else, so
    /// the next trigger re-attempts the same page. No automatic retry.
    pub fn fail(&mut self) {
        self.loading = false;
    }

    pub fn reset(&mut self) {
        self.page = 1;
        self.has_more = true;
        self.loading = false;
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}
