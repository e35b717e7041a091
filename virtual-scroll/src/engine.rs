use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use crate::emitter::IndexEmitter;
use crate::pagination::{PaginationController, PaginationState};
use crate::range::{self, Ranges};
use crate::scroll::{ScrollCoordinator, ScrollState, ScrollTick, ScrollTimings};
use crate::size::{SizeDescriptor, SizeModel};
use crate::{
    Entry, ItemActionEvent, ItemRange, ItemToggleEvent, LoadMoreEvent, ScrollBehavior,
    ScrollChangeEvent, ScrollDirection, ScrollOrigin, ScrollViewport, ViewportResizeEvent,
    ViewportSize, VirtualScrollOptions,
};

/// A headless virtual-scroll engine.
///
/// One stateful pipeline: the size model turns sizes into offsets, the range calculator picks the
/// visible and overscanned indexes, the pagination controller decides when to ask for more data
/// and which placeholder rows to add, and the scroll coordinator debounces raw scroll/resize
/// signals into notifications.
///
/// The engine is UI-agnostic:
/// - It never holds the item collection. Callers pass `&[T]` when entries are needed.
/// - Time comes from the caller (`now_ms` on every signal, plus [`Engine::tick`]).
/// - Outputs are the callbacks configured in [`VirtualScrollOptions`].
///
/// Scroll and resize signals are only accepted between [`Engine::start`] and [`Engine::stop`].
/// Input properties (items, counts, sizes, options) can be changed at any time.
///
/// Pagination is driven by the *first* visible index: a load-more fires once
/// `first_visible + load_more_threshold >= loaded_len`. With a threshold smaller than the number
/// of rows on screen, the last loaded rows can be visible before a request goes out; size the
/// threshold to at least a viewport's worth of rows when that matters.
pub struct Engine<T> {
    options: VirtualScrollOptions<T>,
    sizes: SizeModel,
    pagination: PaginationController,
    scroll: ScrollCoordinator,
    viewport: ViewportSize,
    rendered: Option<ItemRange>,
}

impl<T> Engine<T> {
    pub fn new(mut options: VirtualScrollOptions<T>) -> Self {
        normalize_indices(&mut options.sticky_indices);
        vdebug!(
            total_count = ?options.total_count,
            infinite_scroll = options.infinite_scroll,
            "Engine::new"
        );
        let mut pagination = PaginationController::new(options.pagination());
        let initial = pagination.sync(0, options.total_count);
        debug_assert!(initial.is_none(), "no index was scrolled to yet");
        let mut engine = Self {
            sizes: SizeModel::new(options.item_size.clone(), options.item_overhead),
            pagination,
            scroll: ScrollCoordinator::new(options.timings),
            viewport: options.initial_viewport,
            rendered: None,
            options,
        };
        engine.refresh_layout();
        engine
    }

    pub fn options(&self) -> &VirtualScrollOptions<T> {
        &self.options
    }

    /// Replaces every option, rebuilding only what changed.
    pub fn set_options(&mut self, mut options: VirtualScrollOptions<T>) {
        normalize_indices(&mut options.sticky_indices);
        let size_changed = !same_descriptor(&self.options.item_size, &options.item_size);
        let overhead_changed = self.options.item_overhead != options.item_overhead;
        self.options = options;
        vtrace!(
            size_changed,
            overhead_changed,
            "Engine::set_options"
        );

        if size_changed {
            self.sizes.set_descriptor(self.options.item_size.clone());
        }
        if overhead_changed {
            self.sizes.set_overhead(self.options.item_overhead);
        }
        self.scroll.set_timings(self.options.timings);
        let event = self
            .pagination
            .reconfigure(self.options.pagination(), self.options.total_count);
        self.refresh_layout();
        self.dispatch_load_more(event);
    }

    /// Clones the current options, applies `f`, then delegates to [`Engine::set_options`].
    pub fn update_options(&mut self, f: impl FnOnce(&mut VirtualScrollOptions<T>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    /// Attaches to the scroll source.
    pub fn start(&mut self) {
        vdebug!("Engine::start");
        self.scroll.start();
    }

    /// Detaches from the scroll source and cancels every pending notification.
    ///
    /// Signals and ticks arriving afterwards leave the engine untouched.
    pub fn stop(&mut self) {
        vdebug!("Engine::stop");
        self.scroll.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scroll.is_attached()
    }

    /// Reads the length of the caller's (append-only) item collection.
    pub fn sync_items(&mut self, items: &[T]) {
        self.set_loaded_len(items.len());
    }

    pub fn set_loaded_len(&mut self, loaded: usize) {
        let event = self.pagination.sync(loaded, self.options.total_count);
        self.refresh_layout();
        self.dispatch_load_more(event);
    }

    pub fn set_total_count(&mut self, total_count: Option<usize>) {
        self.options.total_count = total_count;
        let event = self
            .pagination
            .sync(self.pagination.loaded(), total_count);
        self.refresh_layout();
        self.dispatch_load_more(event);
    }

    /// Replaces the size descriptor. Cached offsets are dropped.
    pub fn set_item_size(&mut self, item_size: SizeDescriptor) {
        self.options.item_size = item_size.clone();
        self.sizes.set_descriptor(item_size);
        self.refresh_layout();
    }

    pub fn set_item_overhead(&mut self, overhead: u32) {
        self.options.item_overhead = overhead;
        self.sizes.set_overhead(overhead);
        self.refresh_layout();
    }

    pub fn set_buffer_px(&mut self, min_buffer_px: u32, max_buffer_px: u32) {
        self.options.min_buffer_px = min_buffer_px;
        self.options.max_buffer_px = max_buffer_px;
        self.refresh_layout();
    }

    pub fn set_infinite_scroll(&mut self, enabled: bool) {
        self.options.infinite_scroll = enabled;
        self.apply_pagination_options();
    }

    pub fn set_load_more(&mut self, threshold: usize, count: usize) {
        self.options.load_more_threshold = threshold;
        self.options.load_more_count = count;
        self.apply_pagination_options();
    }

    pub fn set_loading_items(&mut self, show: bool, count: usize) {
        self.options.show_loading_items = show;
        self.options.loading_items_count = count;
        self.apply_pagination_options();
    }

    pub fn set_is_item_loaded(&mut self, f: Option<impl Fn(usize) -> bool + Send + Sync + 'static>) {
        self.options.is_item_loaded = f.map(|f| Arc::new(f) as _);
        self.apply_pagination_options();
    }

    /// Indexes that are always rendered. Sorted and de-duplicated on the way in.
    pub fn set_sticky_indices(&mut self, mut sticky_indices: Vec<usize>) {
        normalize_indices(&mut sticky_indices);
        self.options.sticky_indices = sticky_indices;
    }

    pub fn set_timings(&mut self, timings: ScrollTimings) {
        self.options.timings = timings;
        self.scroll.set_timings(timings);
    }

    /// Sets the viewport size without emitting a resize notification.
    pub fn set_viewport_size(&mut self, size: ViewportSize) {
        if self.viewport == size {
            return;
        }
        self.viewport = size;
        self.refresh_layout();
    }

    /// A viewport resize reported by the scroll source.
    ///
    /// Updates the layout immediately; the resize notification is debounced. Ignored while
    /// stopped.
    pub fn on_resize(&mut self, size: ViewportSize, now_ms: u64) -> bool {
        if !self.scroll.signal_resize(size, now_ms) {
            return false;
        }
        self.set_viewport_size(size);
        true
    }

    /// A raw scroll signal caused by the user. Returns `false` when stopped.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) -> bool {
        self.scroll_signal(offset, now_ms, ScrollOrigin::User)
    }

    /// Same as [`Engine::on_scroll`] for toolkits reporting float pixels.
    pub fn on_scroll_px(&mut self, offset_px: f64, now_ms: u64) -> bool {
        self.on_scroll(crate::px::offset_from_f64(offset_px), now_ms)
    }

    /// A scroll position change that the user did not cause (`scroll_to_*`, animation steps).
    pub fn on_programmatic_scroll(&mut self, offset: u64, now_ms: u64) -> bool {
        self.scroll_signal(offset, now_ms, ScrollOrigin::Programmatic)
    }

    /// Fires every debounced notification that is due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        let out = self.scroll.tick(now_ms);
        if let Some(tick) = out.scroll_changed {
            let event = self.scroll_change_event(tick);
            vtrace!(
                offset = event.scroll_offset,
                visible_start = event.visible_start_index,
                visible_stop = event.visible_stop_index,
                "Engine: scroll change"
            );
            if let Some(cb) = &self.options.on_scroll_change {
                cb(&event);
            }
        }
        if let Some(size) = out.resized {
            let event = ViewportResizeEvent {
                width: size.width,
                height: size.height,
            };
            if let Some(cb) = &self.options.on_viewport_resize {
                cb(&event);
            }
        }
    }

    /// Earliest time at which [`Engine::tick`] has something to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scroll.next_deadline()
    }

    /// Scrolls `viewport` so that `index` starts at the top (clamped to the scrollable extent).
    ///
    /// Returns the target offset, or `None` when stopped or when there is nothing to scroll to.
    pub fn scroll_to_index<V: ScrollViewport + ?Sized>(
        &mut self,
        viewport: &mut V,
        index: usize,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> Option<u64> {
        let offset = self.offset_for_index(index)?;
        self.scroll_to_offset(viewport, offset, behavior, now_ms)
    }

    /// Scrolls `viewport` to `offset` (clamped to the scrollable extent).
    ///
    /// The call reaches the viewport directly, without debouncing. An instant scroll is recorded
    /// as a programmatic scroll right away; a smooth one is recorded as the adapter reports its
    /// animation steps through [`Engine::on_programmatic_scroll`].
    pub fn scroll_to_offset<V: ScrollViewport + ?Sized>(
        &mut self,
        viewport: &mut V,
        offset: u64,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> Option<u64> {
        if !self.scroll.is_attached() {
            return None;
        }
        let target = offset.min(self.max_scroll_offset());
        vtrace!(target, ?behavior, "Engine::scroll_to_offset");
        viewport.scroll_to_offset(target, behavior);
        if behavior == ScrollBehavior::Instant {
            self.on_programmatic_scroll(target, now_ms);
        }
        Some(target)
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll.offset()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll.state().direction
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.state().is_scrolling
    }

    pub fn is_user_scrolling(&self) -> bool {
        self.scroll.state().is_user_initiated
    }

    pub fn viewport_size(&self) -> ViewportSize {
        self.viewport
    }

    /// Number of real items the engine knows about.
    pub fn loaded_len(&self) -> usize {
        self.pagination.loaded()
    }

    /// Length of the combined collection (real items followed by placeholders).
    pub fn data_length(&self) -> usize {
        self.pagination.data_length()
    }

    pub fn pagination_state(&self) -> PaginationState {
        self.pagination.state()
    }

    pub fn placeholder_range(&self) -> Range<usize> {
        self.pagination.placeholder_range()
    }

    pub fn is_loading_item(&self, index: usize) -> bool {
        self.pagination.is_placeholder(index)
    }

    pub fn effective_item_size(&self) -> u32 {
        self.sizes.effective_item_size()
    }

    pub fn size_at(&self, index: usize) -> u32 {
        self.sizes.size_at(index)
    }

    pub fn size_model(&self) -> &SizeModel {
        &self.sizes
    }

    pub fn total_size(&self) -> u64 {
        self.sizes.total_size(self.data_length())
    }

    pub fn max_scroll_offset(&self) -> u64 {
        range::max_scroll_offset(&self.sizes, self.viewport.height, self.data_length())
    }

    /// Scroll offset that puts `index` at the top of the viewport, clamped.
    pub fn offset_for_index(&self, index: usize) -> Option<u64> {
        let len = self.data_length();
        if len == 0 {
            return None;
        }
        let index = index.min(len - 1);
        Some(self.sizes.start_of(index).min(self.max_scroll_offset()))
    }

    /// Visible and overscanned ranges at the current offset.
    pub fn ranges(&self) -> Option<Ranges> {
        self.ranges_at(self.scroll.offset())
    }

    pub fn visible_range(&self) -> Option<ItemRange> {
        self.ranges().map(|r| r.visible)
    }

    pub fn overscan_range(&self) -> Option<ItemRange> {
        self.ranges().map(|r| r.overscan)
    }

    /// The range the caller should keep materialized.
    pub fn rendered_range(&self) -> Option<ItemRange> {
        self.rendered
    }

    pub fn is_item_rendered(&self, index: usize) -> bool {
        self.rendered.is_some_and(|r| r.contains(index))
            || (index < self.data_length()
                && self.options.sticky_indices.binary_search(&index).is_ok())
    }

    /// The entry at `index` of the combined collection.
    pub fn entry<'a>(&self, items: &'a [T], index: usize) -> Option<Entry<'a, T>> {
        if index < self.pagination.loaded() {
            return items.get(index).map(|item| Entry::Real { index, item });
        }
        self.pagination
            .is_placeholder(index)
            .then_some(Entry::Placeholder { index })
    }

    /// Calls `f` for every rendered index, sticky indexes included, in ascending order.
    pub fn for_each_rendered_index(&self, mut f: impl FnMut(usize)) {
        let Some(rendered) = self.rendered else {
            return;
        };
        let mut emitter = IndexEmitter::new(self.data_length(), &mut f);
        emitter.emit_with_sticky(rendered, &self.options.sticky_indices);
    }

    /// Calls `f` for every rendered entry, sticky entries included, in ascending order.
    pub fn for_each_rendered_entry<'a>(&self, items: &'a [T], mut f: impl FnMut(Entry<'a, T>)) {
        self.for_each_rendered_index(|i| {
            if let Some(entry) = self.entry(items, i) {
                f(entry);
            }
        });
    }

    /// Collects rendered entries into `out` (clears `out` first).
    ///
    /// Convenience wrapper around [`Self::for_each_rendered_entry`]; reuse `out` across frames.
    pub fn collect_rendered_entries<'a>(&self, items: &'a [T], out: &mut Vec<Entry<'a, T>>) {
        out.clear();
        self.for_each_rendered_entry(items, |e| out.push(e));
    }

    /// Relays a row toggle from the rendering layer.
    pub fn item_toggle(&self, items: &[T], index: usize, checked: bool) {
        let (Some(cb), Some(item)) = (&self.options.on_item_toggle, self.entry(items, index))
        else {
            return;
        };
        cb(&ItemToggleEvent {
            index,
            item,
            checked,
        });
    }

    /// Relays a row action from the rendering layer.
    pub fn item_action(&self, items: &[T], index: usize) {
        let (Some(cb), Some(item)) = (&self.options.on_item_action, self.entry(items, index))
        else {
            return;
        };
        cb(&ItemActionEvent { index, item });
    }

    fn scroll_signal(&mut self, offset: u64, now_ms: u64, origin: ScrollOrigin) -> bool {
        if !self.scroll.signal(offset, now_ms, origin) {
            return false;
        }
        self.refresh_layout();
        let index = self.visible_range().map_or(0, |r| r.start);
        let user_scroll = self.scroll.state().is_user_initiated;
        let event = self.pagination.on_index(index, offset, user_scroll);
        self.dispatch_load_more(event);
        true
    }

    fn apply_pagination_options(&mut self) {
        let event = self.pagination.set_options(self.options.pagination());
        self.refresh_layout();
        self.dispatch_load_more(event);
    }

    fn ranges_at(&self, offset: u64) -> Option<Ranges> {
        range::compute_ranges(
            &self.sizes,
            offset,
            self.viewport.height,
            self.data_length(),
            self.options.min_buffer_px,
        )
    }

    fn refresh_layout(&mut self) {
        let len = self.data_length();
        self.sizes.ensure_cached(len);
        let Some(ranges) = self.ranges() else {
            self.rendered = None;
            return;
        };
        let max_count = range::buffer_item_count(
            self.options.effective_max_buffer_px(),
            self.sizes.effective_item_size(),
        );
        let next = range::next_rendered_range(
            self.rendered,
            ranges.visible,
            len,
            ranges.buffer_item_count,
            max_count,
        );
        if self.rendered != Some(next) {
            vtrace!(start = next.start, end = next.end, "Engine: rendered range");
        }
        self.rendered = Some(next);
    }

    fn scroll_change_event(&self, tick: ScrollTick) -> ScrollChangeEvent {
        let mut event = ScrollChangeEvent {
            scroll_offset: tick.offset,
            scroll_forward: tick.forward,
            user_scroll: tick.user_scroll,
            ..ScrollChangeEvent::default()
        };
        if let Some(r) = self.ranges_at(tick.offset) {
            event.visible_start_index = r.visible.start;
            event.visible_stop_index = r.visible.end;
            event.overscan_start_index = r.overscan.start;
            event.overscan_stop_index = r.overscan.end;
        }
        event
    }

    fn dispatch_load_more(&self, event: Option<LoadMoreEvent>) {
        let Some(event) = event else {
            return;
        };
        if let Some(cb) = &self.options.on_load_more {
            cb(&event);
        }
    }
}

impl<T> Clone for Engine<T> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            sizes: self.sizes.clone(),
            pagination: self.pagination.clone(),
            scroll: self.scroll.clone(),
            viewport: self.viewport,
            rendered: self.rendered,
        }
    }
}

impl<T> core::fmt::Debug for Engine<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("sizes", &self.sizes)
            .field("pagination", &self.pagination)
            .field("scroll", &self.scroll)
            .field("viewport", &self.viewport)
            .field("rendered", &self.rendered)
            .finish()
    }
}

pub(crate) fn normalize_indices(indices: &mut Vec<usize>) {
    indices.sort_unstable();
    indices.dedup();
}

fn same_descriptor(a: &SizeDescriptor, b: &SizeDescriptor) -> bool {
    match (a, b) {
        (SizeDescriptor::Fixed(x), SizeDescriptor::Fixed(y)) => x == y,
        (SizeDescriptor::Dynamic(f), SizeDescriptor::Dynamic(g)) => Arc::ptr_eq(f, g),
        _ => false,
    }
}
