//! Infinite-scroll pagination state.
//!
//! The page that has been loaded last and whether the server reported more
//! rows after it. Page 1 arrives with the initial view, so the first fetch
//! this machine hands out is page 2.
//!
//! ```text
//! Idle --request_next (has_more)--> Fetching
//! Fetching --resolve_success------> Idle   (page advances when items > 0)
//! Fetching --resolve_failure------> Idle   (cursor untouched)
//! ```

/// Whether a page fetch is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Fetching,
}

/// Last loaded page and whether another one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    cursor: PageCursor,
    status: FetchStatus,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: PageCursor {
                page: 1,
                has_more: true,
            },
            status: FetchStatus::Idle,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    #[must_use]
    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// True once the server has reported the end of the result set.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        !self.cursor.has_more
    }

    /// Claims the next page for fetching.
    ///
    /// Returns `None` while a fetch is outstanding or after exhaustion, so
    /// at most one page is ever in flight and page N+1 is never requested
    /// before page N resolved.
    pub fn request_next(&mut self) -> Option<u32> {
        if self.status == FetchStatus::Fetching || !self.cursor.has_more {
            return None;
        }
        self.status = FetchStatus::Fetching;
        let next = self.cursor.page.saturating_add(1);
        tracing::debug!(page = next, "pagination: fetching");
        Some(next)
    }

    /// Records a successful fetch of `item_count` rows.
    ///
    /// An empty page ends pagination regardless of the reported `has_more`.
    pub fn resolve_success(&mut self, item_count: usize, has_more: bool) {
        if self.status != FetchStatus::Fetching {
            tracing::warn!("pagination: success reported with no fetch outstanding");
            return;
        }
        if item_count == 0 {
            self.cursor.has_more = false;
        } else {
            self.cursor.page = self.cursor.page.saturating_add(1);
            self.cursor.has_more = has_more;
        }
        self.status = FetchStatus::Idle;
        tracing::debug!(
            page = self.cursor.page,
            has_more = self.cursor.has_more,
            "pagination: page resolved"
        );
    }

    /// Records a failed fetch. The cursor is left as it was so the next
    /// signal retries the same page.
    pub fn resolve_failure(&mut self) {
        if self.status != FetchStatus::Fetching {
            tracing::warn!("pagination: failure reported with no fetch outstanding");
            return;
        }
        self.status = FetchStatus::Idle;
        tracing::debug!(page = self.cursor.page, "pagination: fetch failed");
    }
}
