use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::pagination::{IsItemLoadedFn, PaginationOptions};
use crate::size::{DEFAULT_ITEM_OVERHEAD, SizeDescriptor};
use crate::{
    ItemActionEvent, ItemToggleEvent, LoadMoreEvent, ScrollChangeEvent, ScrollTimings,
    ViewportResizeEvent, ViewportSize,
};

/// Fired when more items should be fetched.
pub type OnLoadMoreCallback = Arc<dyn Fn(&LoadMoreEvent) + Send + Sync>;

/// Fired at most once per scroll debounce window, with the latest offset of that window.
pub type OnScrollChangeCallback = Arc<dyn Fn(&ScrollChangeEvent) + Send + Sync>;

/// Fired at most once per resize debounce window.
pub type OnViewportResizeCallback = Arc<dyn Fn(&ViewportResizeEvent) + Send + Sync>;

/// Relay for row toggles. The engine does not interpret these.
pub type OnItemToggleCallback<T> = Arc<dyn Fn(&ItemToggleEvent<'_, T>) + Send + Sync>;

/// Relay for row actions. The engine does not interpret these.
pub type OnItemActionCallback<T> = Arc<dyn Fn(&ItemActionEvent<'_, T>) + Send + Sync>;

/// Configuration for [`crate::Engine`].
///
/// Cheap to clone: closures live behind `Arc`s, so adapters can tweak a field and hand the whole
/// thing back to `Engine::set_options`.
pub struct VirtualScrollOptions<T> {
    /// Content size per item. The model adds `item_overhead` on top.
    pub item_size: SizeDescriptor,
    /// Structural overhead (padding + border) added to every item.
    pub item_overhead: u32,

    /// Full dataset size when not everything is loaded yet. `None` means unbounded.
    pub total_count: Option<usize>,

    /// Pixels of overscan kept before and after the visible range.
    pub min_buffer_px: u32,
    /// Pixels of buffer laid out when the rendered range has to be rebuilt.
    ///
    /// Values below `min_buffer_px` are treated as `min_buffer_px`.
    pub max_buffer_px: u32,

    pub infinite_scroll: bool,
    /// Distance (in items) from the end of the loaded data that triggers a load-more.
    pub load_more_threshold: usize,
    /// Batch size requested by each load-more.
    pub load_more_count: usize,
    pub show_loading_items: bool,
    pub loading_items_count: usize,
    pub is_item_loaded: Option<IsItemLoadedFn>,

    /// Indexes that are always rendered (e.g. sticky section headers). The engine sorts and
    /// de-duplicates them.
    pub sticky_indices: Vec<usize>,

    /// Viewport size before the first resize signal.
    pub initial_viewport: ViewportSize,

    pub timings: ScrollTimings,

    pub on_load_more: Option<OnLoadMoreCallback>,
    pub on_scroll_change: Option<OnScrollChangeCallback>,
    pub on_viewport_resize: Option<OnViewportResizeCallback>,
    pub on_item_toggle: Option<OnItemToggleCallback<T>>,
    pub on_item_action: Option<OnItemActionCallback<T>>,
}

impl<T> Clone for VirtualScrollOptions<T> {
    fn clone(&self) -> Self {
        Self {
            item_size: self.item_size.clone(),
            item_overhead: self.item_overhead,
            total_count: self.total_count,
            min_buffer_px: self.min_buffer_px,
            max_buffer_px: self.max_buffer_px,
            infinite_scroll: self.infinite_scroll,
            load_more_threshold: self.load_more_threshold,
            load_more_count: self.load_more_count,
            show_loading_items: self.show_loading_items,
            loading_items_count: self.loading_items_count,
            is_item_loaded: self.is_item_loaded.clone(),
            sticky_indices: self.sticky_indices.clone(),
            initial_viewport: self.initial_viewport,
            timings: self.timings,
            on_load_more: self.on_load_more.clone(),
            on_scroll_change: self.on_scroll_change.clone(),
            on_viewport_resize: self.on_viewport_resize.clone(),
            on_item_toggle: self.on_item_toggle.clone(),
            on_item_action: self.on_item_action.clone(),
        }
    }
}

impl<T> Default for VirtualScrollOptions<T> {
    fn default() -> Self {
        let pagination = PaginationOptions::default();
        Self {
            item_size: SizeDescriptor::default(),
            item_overhead: DEFAULT_ITEM_OVERHEAD,
            total_count: None,
            min_buffer_px: 200,
            max_buffer_px: 200,
            infinite_scroll: pagination.enabled,
            load_more_threshold: pagination.load_more_threshold,
            load_more_count: pagination.load_more_count,
            show_loading_items: pagination.show_loading_items,
            loading_items_count: pagination.loading_items_count,
            is_item_loaded: None,
            sticky_indices: Vec::new(),
            initial_viewport: ViewportSize::default(),
            timings: ScrollTimings::default(),
            on_load_more: None,
            on_scroll_change: None,
            on_viewport_resize: None,
            on_item_toggle: None,
            on_item_action: None,
        }
    }
}

impl<T> VirtualScrollOptions<T> {
    /// Options for items of a fixed content size.
    pub fn new(item_size: u32) -> Self {
        Self {
            item_size: SizeDescriptor::Fixed(item_size),
            ..Self::default()
        }
    }

    /// Options for items sized by a pure per-index function.
    pub fn with_size_fn(item_size: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            item_size: SizeDescriptor::dynamic(item_size),
            ..Self::default()
        }
    }

    pub(crate) fn pagination(&self) -> PaginationOptions {
        PaginationOptions {
            enabled: self.infinite_scroll,
            load_more_threshold: self.load_more_threshold,
            load_more_count: self.load_more_count,
            show_loading_items: self.show_loading_items,
            loading_items_count: self.loading_items_count,
            is_item_loaded: self.is_item_loaded.clone(),
        }
    }

    pub(crate) fn effective_max_buffer_px(&self) -> u32 {
        self.max_buffer_px.max(self.min_buffer_px)
    }

    pub fn with_item_size(mut self, item_size: SizeDescriptor) -> Self {
        self.item_size = item_size;
        self
    }

    pub fn with_item_overhead(mut self, overhead: u32) -> Self {
        self.item_overhead = overhead;
        self
    }

    pub fn with_total_count(mut self, total_count: Option<usize>) -> Self {
        self.total_count = total_count;
        self
    }

    pub fn with_buffer_px(mut self, min_buffer_px: u32, max_buffer_px: u32) -> Self {
        self.min_buffer_px = min_buffer_px;
        self.max_buffer_px = max_buffer_px;
        self
    }

    pub fn with_infinite_scroll(mut self, enabled: bool) -> Self {
        self.infinite_scroll = enabled;
        self
    }

    pub fn with_load_more(mut self, threshold: usize, count: usize) -> Self {
        self.load_more_threshold = threshold;
        self.load_more_count = count;
        self
    }

    pub fn with_loading_items(mut self, show: bool, count: usize) -> Self {
        self.show_loading_items = show;
        self.loading_items_count = count;
        self
    }

    pub fn with_is_item_loaded(
        mut self,
        f: Option<impl Fn(usize) -> bool + Send + Sync + 'static>,
    ) -> Self {
        self.is_item_loaded = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_sticky_indices(mut self, mut sticky_indices: Vec<usize>) -> Self {
        crate::engine::normalize_indices(&mut sticky_indices);
        self.sticky_indices = sticky_indices;
        self
    }

    pub fn with_initial_viewport(mut self, viewport: ViewportSize) -> Self {
        self.initial_viewport = viewport;
        self
    }

    pub fn with_timings(mut self, timings: ScrollTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_on_load_more(
        mut self,
        f: Option<impl Fn(&LoadMoreEvent) + Send + Sync + 'static>,
    ) -> Self {
        self.on_load_more = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_scroll_change(
        mut self,
        f: Option<impl Fn(&ScrollChangeEvent) + Send + Sync + 'static>,
    ) -> Self {
        self.on_scroll_change = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_viewport_resize(
        mut self,
        f: Option<impl Fn(&ViewportResizeEvent) + Send + Sync + 'static>,
    ) -> Self {
        self.on_viewport_resize = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_item_toggle(
        mut self,
        f: Option<impl Fn(&ItemToggleEvent<'_, T>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_item_toggle = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_item_action(
        mut self,
        f: Option<impl Fn(&ItemActionEvent<'_, T>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_item_action = f.map(|f| Arc::new(f) as _);
        self
    }
}

impl<T> core::fmt::Debug for VirtualScrollOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualScrollOptions")
            .field("item_size", &self.item_size)
            .field("item_overhead", &self.item_overhead)
            .field("total_count", &self.total_count)
            .field("min_buffer_px", &self.min_buffer_px)
            .field("max_buffer_px", &self.max_buffer_px)
            .field("infinite_scroll", &self.infinite_scroll)
            .field("load_more_threshold", &self.load_more_threshold)
            .field("load_more_count", &self.load_more_count)
            .field("show_loading_items", &self.show_loading_items)
            .field("loading_items_count", &self.loading_items_count)
            .field("sticky_indices", &self.sticky_indices)
            .field("initial_viewport", &self.initial_viewport)
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}
