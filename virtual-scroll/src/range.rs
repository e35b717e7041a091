//! Offset → index range math.
//!
//! Everything here is a pure function of its arguments; the [`crate::Engine`] owns the inputs and
//! calls into this module whenever one of them changes.

use crate::{ItemRange, SizeModel};

/// Visible and overscanned ranges for one scroll position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ranges {
    /// Items whose pixel span intersects the viewport.
    pub visible: ItemRange,
    /// `visible` grown by `buffer_item_count` on both sides, clamped to the data bounds.
    pub overscan: ItemRange,
    pub buffer_item_count: usize,
}

/// Converts a pixel buffer into an item count: `ceil(buffer_px / effective_item_size)`.
///
/// A zero effective size is treated as 1px.
pub fn buffer_item_count(buffer_px: u32, effective_item_size: u32) -> usize {
    buffer_px.div_ceil(effective_item_size.max(1)) as usize
}

/// Largest meaningful scroll offset for `data_length` items in a viewport of `viewport_size`.
pub fn max_scroll_offset(sizes: &SizeModel, viewport_size: u32, data_length: usize) -> u64 {
    sizes
        .total_size(data_length)
        .saturating_sub(viewport_size as u64)
}

/// Indexes whose pixel span intersects `[scroll_offset, scroll_offset + viewport_size)`.
///
/// `scroll_offset` is clamped to [`max_scroll_offset`]. A zero-sized viewport yields the single
/// item under the offset. Returns `None` when there is no data.
pub fn visible_range(
    sizes: &SizeModel,
    scroll_offset: u64,
    viewport_size: u32,
    data_length: usize,
) -> Option<ItemRange> {
    if data_length == 0 {
        return None;
    }
    let offset = scroll_offset.min(max_scroll_offset(sizes, viewport_size, data_length));
    let start = sizes.index_at_offset(offset, data_length)?;
    let last_px = offset.saturating_add((viewport_size as u64).saturating_sub(1));
    let end = sizes
        .index_at_offset(last_px, data_length)
        .unwrap_or(start)
        .max(start);
    Some(ItemRange { start, end })
}

/// `visible` grown by `buffer` items before and after, clamped to `[0, data_length - 1]`.
pub fn overscan_range(visible: ItemRange, buffer: usize, data_length: usize) -> ItemRange {
    visible.expand(buffer, buffer, data_length)
}

/// Computes the visible range and its overscan in one pass.
///
/// The buffer is `ceil(min_buffer_px / effective_item_size)` items, applied symmetrically.
pub fn compute_ranges(
    sizes: &SizeModel,
    scroll_offset: u64,
    viewport_size: u32,
    data_length: usize,
    min_buffer_px: u32,
) -> Option<Ranges> {
    let visible = visible_range(sizes, scroll_offset, viewport_size, data_length)?;
    let buffer = buffer_item_count(min_buffer_px, sizes.effective_item_size());
    Some(Ranges {
        visible,
        overscan: overscan_range(visible, buffer, data_length),
        buffer_item_count: buffer,
    })
}

/// Decides which range the caller should keep materialized.
///
/// `prev` is kept as long as it still covers `visible` with at least `min_count` items of buffer
/// on each side (a side that already reaches the data bounds counts as covered). Otherwise the
/// range is rebuilt around `visible` with `max_count` items on each side.
pub fn next_rendered_range(
    prev: Option<ItemRange>,
    visible: ItemRange,
    data_length: usize,
    min_count: usize,
    max_count: usize,
) -> ItemRange {
    debug_assert!(data_length > 0);
    let last = data_length.saturating_sub(1);
    if let Some(prev) = prev {
        let prev_fits = prev.end <= last;
        let before_ok = prev.start == 0 || visible.start.saturating_sub(prev.start) >= min_count;
        let after_ok = prev.end == last || prev.end.saturating_sub(visible.end) >= min_count;
        if prev_fits && prev.contains_range(&visible) && before_ok && after_ok {
            return prev;
        }
    }
    visible.expand(max_count, max_count, data_length)
}
