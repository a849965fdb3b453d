//! # Price-List Filter and Pagination Engine
//!
//! Filters the price-list collection by supplier, ingredient, effective-date
//! range, and free text, then slices the result into fixed-size pages.
//!
//! ## Behavior
//!
//! - all active criteria combine with logical AND
//! - free text matches case-insensitively against ingredient name, ingredient
//!   SKU, or supplier name
//! - date bounds are inclusive and compared as ISO date strings
//! - every filter change resets the view to page 1
//! - recomputation is debounced by a fixed delay; a newer change supersedes
//!   any recompute still waiting out its delay (last write wins)

use crate::model::PriceListItem;
use crate::store::EntityStore;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Number of price items shown per page.
pub const PAGE_SIZE: usize = 20;

/// Maximum number of page buttons in the pager window.
pub const PAGER_WINDOW: usize = 5;

/// Delay between the last filter change and the recompute.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(400);

/// Filter criteria for the price-list view. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceListFilter {
    pub supplier_id: Option<String>,
    pub ingredient_id: Option<String>,
    /// Inclusive lower bound, ISO `YYYY-MM-DD`
    pub date_start: Option<String>,
    /// Inclusive upper bound, ISO `YYYY-MM-DD`
    pub date_end: Option<String>,
    pub query: Option<String>,
}

impl PriceListFilter {
    /// Whether a single price item satisfies every active criterion.
    ///
    /// The free-text criterion needs the store to resolve the item's
    /// supplier and ingredient; an item with dangling references simply
    /// fails to match any text.
    pub fn matches(&self, store: &EntityStore, item: &PriceListItem) -> bool {
        if let Some(supplier_id) = &self.supplier_id {
            if item.supplier_id != *supplier_id {
                return false;
            }
        }
        if let Some(ingredient_id) = &self.ingredient_id {
            if item.ingredient_id != *ingredient_id {
                return false;
            }
        }
        if let Some(start) = &self.date_start {
            if item.effective_date.as_str() < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.date_end {
            if item.effective_date.as_str() > end.as_str() {
                return false;
            }
        }
        if let Some(query) = &self.query {
            if !query.is_empty() {
                let q = query.to_lowercase();
                let ingredient_hit = store.ingredient_by_id(&item.ingredient_id).map_or(
                    false,
                    |ing| {
                        ing.name.to_lowercase().contains(&q) || ing.sku.to_lowercase().contains(&q)
                    },
                );
                let supplier_hit = store
                    .supplier_by_id(&item.supplier_id)
                    .map_or(false, |s| s.name.to_lowercase().contains(&q));
                if !ingredient_hit && !supplier_hit {
                    return false;
                }
            }
        }
        true
    }

    /// Apply this filter over the whole store, preserving store order.
    pub fn apply(&self, store: &EntityStore) -> Vec<PriceListItem> {
        store
            .items
            .iter()
            .filter(|item| self.matches(store, item))
            .cloned()
            .collect()
    }
}

/// Total number of pages for a filtered result of `item_count` items.
pub fn total_pages(item_count: usize) -> usize {
    (item_count + PAGE_SIZE - 1) / PAGE_SIZE
}

/// The slice of `items` visible on 1-based `page`. Out-of-range pages are
/// empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let page = page.max(1);
    let start = (page - 1) * PAGE_SIZE;
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Page numbers shown in the pager: a window of at most [`PAGER_WINDOW`]
/// buttons that slides with the current page once more pages exist than fit,
/// clamped so the window never runs past the last page.
pub fn visible_pages(current: usize, total: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let len = total.min(PAGER_WINDOW);
    let start = if total <= PAGER_WINDOW || current <= 3 {
        1
    } else {
        (current - 3).min(total - (PAGER_WINDOW - 1))
    };
    (start..start + len).collect()
}

/// One pending debounced recompute, snapshotted from a [`FilterSession`].
///
/// Resolving waits out the debounce delay and then yields the filtered rows,
/// or `None` when a newer filter change happened in the meantime.
#[derive(Debug)]
pub struct PendingRecompute {
    filter: PriceListFilter,
    generation: Arc<AtomicU64>,
    scheduled_at: u64,
    delay: Duration,
}

impl PendingRecompute {
    /// Wait out the debounce delay, then produce the filtered result if this
    /// recompute is still the newest one.
    pub async fn resolve(self, store: &EntityStore) -> Option<Vec<PriceListItem>> {
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) != self.scheduled_at {
            debug!("Recompute superseded by a newer filter change");
            return None;
        }
        Some(self.filter.apply(store))
    }
}

/// Interactive filtering state: the active filter, the visible page, and the
/// debounce bookkeeping. Mirrors the price-list view's behavior: any filter
/// change resets the page to 1 and invalidates recomputes still in flight.
#[derive(Debug)]
pub struct FilterSession {
    filter: PriceListFilter,
    page: usize,
    generation: Arc<AtomicU64>,
    debounce: Duration,
}

impl Default for FilterSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterSession {
    /// A session with no active filters, on page 1, with the standard
    /// debounce delay.
    pub fn new() -> Self {
        Self::with_debounce(FILTER_DEBOUNCE)
    }

    /// A session with a custom debounce delay.
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            filter: PriceListFilter::default(),
            page: 1,
            generation: Arc::new(AtomicU64::new(0)),
            debounce,
        }
    }

    /// The active filter criteria.
    pub fn filter(&self) -> &PriceListFilter {
        &self.filter
    }

    /// The current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Navigate to a page, clamped to the pages `item_count` filtered rows
    /// produce (at least page 1). Does not invalidate pending recomputes;
    /// paging is a client-side slice of the already-filtered rows.
    pub fn set_page(&mut self, page: usize, item_count: usize) {
        let last = total_pages(item_count).max(1);
        self.page = page.clamp(1, last);
    }

    /// Filter by supplier id, or clear with `None`.
    pub fn set_supplier(&mut self, supplier_id: Option<&str>) {
        self.filter.supplier_id = supplier_id.map(str::to_string);
        self.touch();
    }

    /// Filter by ingredient id, or clear with `None`.
    pub fn set_ingredient(&mut self, ingredient_id: Option<&str>) {
        self.filter.ingredient_id = ingredient_id.map(str::to_string);
        self.touch();
    }

    /// Set the inclusive effective-date bounds; `None` clears a bound.
    pub fn set_date_range(&mut self, start: Option<&str>, end: Option<&str>) {
        self.filter.date_start = start.map(str::to_string);
        self.filter.date_end = end.map(str::to_string);
        self.touch();
    }

    /// Set the free-text query; an empty string clears it.
    pub fn set_query(&mut self, query: &str) {
        self.filter.query = if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        };
        self.touch();
    }

    /// Any filter change returns the view to page 1 and supersedes pending
    /// recomputes.
    fn touch(&mut self) {
        self.page = 1;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Snapshot the current filter for a debounced recompute.
    pub fn recompute(&self) -> PendingRecompute {
        PendingRecompute {
            filter: self.filter.clone(),
            generation: Arc::clone(&self.generation),
            scheduled_at: self.generation.load(Ordering::SeqCst),
            delay: self.debounce,
        }
    }

    /// The slice of filtered rows visible on the current page.
    pub fn page_of<'a>(&self, items: &'a [PriceListItem]) -> &'a [PriceListItem] {
        page_slice(items, self.page)
    }
}
