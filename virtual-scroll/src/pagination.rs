use alloc::sync::Arc;
use core::ops::Range;

use crate::{ItemRange, LoadMoreEvent};

/// Tells whether the item at an index is already loaded (or being loaded elsewhere).
pub type IsItemLoadedFn = Arc<dyn Fn(usize) -> bool + Send + Sync>;

/// Infinite-scroll state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaginationState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A load-more request was emitted and its items have not arrived yet.
    AwaitingMore,
    /// Every item up to the total count is loaded.
    Exhausted,
}

/// Infinite-scroll knobs, as consumed by [`PaginationController`].
#[derive(Clone)]
pub struct PaginationOptions {
    pub enabled: bool,
    /// Trigger a request once the scrolled-to index is within this many items of the end of the
    /// loaded prefix.
    pub load_more_threshold: usize,
    /// Batch size of a request.
    pub load_more_count: usize,
    pub show_loading_items: bool,
    /// Upper bound on synthesized placeholder rows.
    pub loading_items_count: usize,
    pub is_item_loaded: Option<IsItemLoadedFn>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            load_more_threshold: 5,
            load_more_count: 50,
            show_loading_items: true,
            loading_items_count: 3,
            is_item_loaded: None,
        }
    }
}

impl core::fmt::Debug for PaginationOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaginationOptions")
            .field("enabled", &self.enabled)
            .field("load_more_threshold", &self.load_more_threshold)
            .field("load_more_count", &self.load_more_count)
            .field("show_loading_items", &self.show_loading_items)
            .field("loading_items_count", &self.loading_items_count)
            .field("is_item_loaded", &self.is_item_loaded.is_some())
            .finish()
    }
}

/// Decides when to request more data and which placeholder rows to show meanwhile.
///
/// Loading is modelled as an append-only prefix `0..loaded`. At most one request is outstanding
/// per prefix: once a [`LoadMoreEvent`] went out, nothing else is emitted until `loaded` changes.
/// Every [`PaginationController::sync`] re-evaluates the trigger against the last scrolled-to
/// index, which is what moves on to the next batch after a request was served.
#[derive(Clone, Debug)]
pub struct PaginationController {
    options: PaginationOptions,
    loaded: usize,
    total: Option<usize>,
    state: PaginationState,
    outstanding: Option<ItemRange>,
    last_index: Option<usize>,
    last_scroll_offset: u64,
    last_user_scroll: bool,
}

impl PaginationController {
    pub fn new(options: PaginationOptions) -> Self {
        Self {
            options,
            loaded: 0,
            total: None,
            state: PaginationState::Idle,
            outstanding: None,
            last_index: None,
            last_scroll_offset: 0,
            last_user_scroll: false,
        }
    }

    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn total_count(&self) -> Option<usize> {
        self.total
    }

    /// The request currently in flight, if any.
    pub fn outstanding(&self) -> Option<ItemRange> {
        self.outstanding
    }

    /// Items left to load. `None` means unbounded (no total count known).
    ///
    /// A total below the loaded count means nothing is left.
    pub fn remaining(&self) -> Option<usize> {
        self.total.map(|t| t.saturating_sub(self.loaded))
    }

    /// Replaces the options and re-evaluates.
    pub fn set_options(&mut self, options: PaginationOptions) -> Option<LoadMoreEvent> {
        let total = self.total;
        self.reconfigure(options, total)
    }

    /// Replaces the options and the total count in one step, then re-evaluates.
    pub fn reconfigure(
        &mut self,
        options: PaginationOptions,
        total: Option<usize>,
    ) -> Option<LoadMoreEvent> {
        if !options.enabled {
            self.outstanding = None;
        }
        self.options = options;
        self.total = total;
        self.reevaluate()
    }

    /// Applies a new loaded count and/or total count.
    pub fn sync(&mut self, loaded: usize, total: Option<usize>) -> Option<LoadMoreEvent> {
        if loaded != self.loaded {
            vtrace!(
                from = self.loaded,
                to = loaded,
                "PaginationController: loaded prefix changed"
            );
            // Any change to the prefix retires the outstanding request.
            self.outstanding = None;
        }
        self.loaded = loaded;
        self.total = total;
        self.reevaluate()
    }

    /// Reports the scrolled-to index.
    pub fn on_index(
        &mut self,
        index: usize,
        scroll_offset: u64,
        user_scroll: bool,
    ) -> Option<LoadMoreEvent> {
        self.last_index = Some(index);
        self.last_scroll_offset = scroll_offset;
        self.last_user_scroll = user_scroll;
        self.try_trigger(index)
    }

    /// Forgets the scroll history and any outstanding request.
    pub fn reset(&mut self) {
        self.outstanding = None;
        self.last_index = None;
        self.last_scroll_offset = 0;
        self.last_user_scroll = false;
        self.update_state();
    }

    /// Number of placeholder rows following the real items.
    pub fn placeholder_count(&self) -> usize {
        if !self.options.enabled
            || !self.options.show_loading_items
            || self.state == PaginationState::Exhausted
        {
            return 0;
        }
        match self.remaining() {
            Some(remaining) => self.options.loading_items_count.min(remaining),
            None => self.options.loading_items_count,
        }
    }

    /// Indexes of the placeholder rows.
    pub fn placeholder_range(&self) -> Range<usize> {
        self.loaded..self.loaded + self.placeholder_count()
    }

    pub fn is_placeholder(&self, index: usize) -> bool {
        self.placeholder_range().contains(&index)
    }

    /// Length of the combined collection: real items plus placeholders.
    pub fn data_length(&self) -> usize {
        self.loaded + self.placeholder_count()
    }

    fn reevaluate(&mut self) -> Option<LoadMoreEvent> {
        self.update_state();
        let index = self.last_index?;
        self.try_trigger(index)
    }

    fn update_state(&mut self) {
        let prev = self.state;
        self.state = if self.total.is_some_and(|t| self.loaded >= t) {
            self.outstanding = None;
            PaginationState::Exhausted
        } else if self.outstanding.is_some() {
            PaginationState::AwaitingMore
        } else {
            PaginationState::Idle
        };
        if prev != self.state {
            vdebug!(
                from = ?prev,
                to = ?self.state,
                loaded = self.loaded,
                total = ?self.total,
                "PaginationController: state change"
            );
        }
    }

    fn try_trigger(&mut self, index: usize) -> Option<LoadMoreEvent> {
        if !self.options.enabled
            || self.state == PaginationState::Exhausted
            || self.outstanding.is_some()
        {
            return None;
        }
        if self.remaining() == Some(0) {
            return None;
        }
        if index.saturating_add(self.options.load_more_threshold) < self.loaded {
            return None;
        }

        let start_index = self.loaded;
        let mut stop_index =
            start_index.saturating_add(self.options.load_more_count.max(1) - 1);
        if let Some(total) = self.total {
            stop_index = stop_index.min(total - 1);
        }

        if let Some(is_loaded) = &self.options.is_item_loaded {
            if is_loaded(start_index) {
                vtrace!(start_index, "PaginationController: batch already loaded");
                return None;
            }
        }

        self.outstanding = Some(ItemRange::new(start_index, stop_index));
        self.state = PaginationState::AwaitingMore;
        let event = LoadMoreEvent {
            start_index,
            stop_index,
            load_index: index,
            scroll_offset: self.last_scroll_offset,
            user_scroll: self.last_user_scroll,
        };
        vdebug!(
            start_index,
            stop_index,
            load_index = index,
            "PaginationController: load more"
        );
        Some(event)
    }
}
