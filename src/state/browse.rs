//! Browse-list state: explore filters and infinite-scroll paging.
//!
//! DESIGN
//! ======
//! A [`Pager`] allows one page load in flight. Changing filters calls
//! [`Pager::reset`], which bumps an epoch so a page requested under the old
//! filters is discarded when it arrives.

#[cfg(test)]
#[path = "browse_test.rs"]
mod browse_test;

use backend::schema::{DifficultyLevel, MediaType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Explore page filter bar, remembered across visits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreFilters {
    pub search: String,
    /// `None` means all categories.
    pub category: Option<Uuid>,
    pub media_type: Option<MediaType>,
    pub difficulty: Option<DifficultyLevel>,
}

impl ExploreFilters {
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty()
            || self.category.is_some()
            || self.media_type.is_some()
            || self.difficulty.is_some()
    }
}

/// Permission to load one page, tied to the pager epoch it was issued in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageTicket {
    pub page: usize,
    epoch: u64,
}

/// Permission to reload the first `rows` rows in one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTicket {
    pub rows: usize,
    epoch: u64,
}

impl RefreshTicket {
    /// Offset range `(from, to)` inclusive.
    pub fn range(self) -> (usize, usize) {
        (0, self.rows - 1)
    }
}

#[derive(Clone, Debug)]
pub struct Pager<T> {
    pub items: Vec<T>,
    /// Next page to request.
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
    pub loading: bool,
    epoch: u64,
}

impl<T> Pager<T> {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self { items: Vec::new(), page: 0, page_size: page_size.max(1), has_more: true, loading: false, epoch: 0 }
    }

    /// Forget loaded items and start again from page 0.
    pub fn reset(&mut self) {
        self.items.clear();
        self.page = 0;
        self.has_more = true;
        self.loading = false;
        self.epoch += 1;
    }

    /// Claim the next page, or `None` while a load is running or after the
    /// last page.
    pub fn begin_next(&mut self) -> Option<PageTicket> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(PageTicket { page: self.page, epoch: self.epoch })
    }

    /// Page 0 replaces, later pages append. A short page ends the list.
    /// Returns false when the ticket belongs to an earlier epoch.
    pub fn apply_page(&mut self, ticket: PageTicket, rows: Vec<T>) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        self.has_more = rows.len() >= self.page_size;
        if ticket.page == 0 {
            self.items = rows;
        } else {
            self.items.extend(rows);
        }
        self.page = ticket.page + 1;
        self.loading = false;
        true
    }

    /// Claim a reload of every row loaded so far in one request, used after
    /// the list was invalidated. `None` while a load is running.
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        if self.loading {
            return None;
        }
        self.loading = true;
        let rows = (self.page * self.page_size).max(self.page_size);
        Some(RefreshTicket { rows, epoch: self.epoch })
    }

    /// Replace the loaded rows with a refreshed copy. The page counter is
    /// kept; `has_more` follows whether the refresh came back full.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, rows: Vec<T>) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        self.has_more = rows.len() >= ticket.rows;
        self.page = self.page.max(1);
        self.items = rows;
        self.loading = false;
        true
    }

    /// Release a refresh ticket after a failed reload.
    pub fn fail_refresh(&mut self, ticket: RefreshTicket) {
        if ticket.epoch == self.epoch {
            self.loading = false;
        }
    }

    /// Release the ticket after a failed load so the user can retry.
    pub fn fail(&mut self, ticket: PageTicket) {
        if ticket.epoch == self.epoch {
            self.loading = false;
        }
    }
}
