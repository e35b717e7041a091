use crate::range::{
    buffer_item_count, compute_ranges, max_scroll_offset, next_rendered_range, visible_range,
};
use crate::*;

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

/// Brute-force reference over occupied sizes (overhead already included).
fn expected_visible_range(sizes: &[u32], scroll_offset: u64, viewport: u32) -> Option<ItemRange> {
    if sizes.is_empty() {
        return None;
    }
    let total: u64 = sizes.iter().map(|&s| s as u64).sum();
    let offset = scroll_offset.min(total.saturating_sub(viewport as u64));
    let locate = |px: u64| {
        let mut end = 0u64;
        for (i, &s) in sizes.iter().enumerate() {
            end += s as u64;
            if end > px {
                return i;
            }
        }
        sizes.len() - 1
    };
    let start = locate(offset);
    let end = locate(offset + (viewport as u64).saturating_sub(1)).max(start);
    Some(ItemRange { start, end })
}

#[derive(Default)]
struct Recorder {
    load_more: Mutex<Vec<LoadMoreEvent>>,
    scroll: Mutex<Vec<ScrollChangeEvent>>,
    resize: Mutex<Vec<ViewportResizeEvent>>,
}

impl Recorder {
    fn load_more(&self) -> Vec<LoadMoreEvent> {
        self.load_more.lock().unwrap().clone()
    }

    fn scroll(&self) -> Vec<ScrollChangeEvent> {
        self.scroll.lock().unwrap().clone()
    }

    fn resize(&self) -> Vec<ViewportResizeEvent> {
        self.resize.lock().unwrap().clone()
    }
}

fn recorded<T>(rec: &Arc<Recorder>, options: VirtualScrollOptions<T>) -> VirtualScrollOptions<T> {
    let (a, b, c) = (Arc::clone(rec), Arc::clone(rec), Arc::clone(rec));
    options
        .with_on_load_more(Some(move |e: &LoadMoreEvent| a.load_more.lock().unwrap().push(*e)))
        .with_on_scroll_change(Some(move |e: &ScrollChangeEvent| {
            b.scroll.lock().unwrap().push(*e)
        }))
        .with_on_viewport_resize(Some(move |e: &ViewportResizeEvent| {
            c.resize.lock().unwrap().push(*e)
        }))
}

/// 100px rows (67 content + 33 overhead) in a 300px-high viewport.
fn hundred_px_options<T>() -> VirtualScrollOptions<T> {
    VirtualScrollOptions::new(67).with_initial_viewport(ViewportSize::new(400, 300))
}

struct MockViewport {
    offset: u64,
    calls: Vec<(u64, ScrollBehavior)>,
}

impl MockViewport {
    fn new() -> Self {
        Self {
            offset: 0,
            calls: Vec::new(),
        }
    }
}

impl ScrollViewport for MockViewport {
    fn scroll_offset(&self) -> u64 {
        self.offset
    }

    fn scroll_to_offset(&mut self, offset: u64, behavior: ScrollBehavior) {
        self.calls.push((offset, behavior));
        if behavior == ScrollBehavior::Instant {
            self.offset = offset;
        }
    }

    fn size(&self) -> ViewportSize {
        ViewportSize::new(400, 300)
    }
}

#[test]
fn fixed_effective_size_adds_overhead_once() {
    let m = SizeModel::fixed(104);
    assert_eq!(m.effective_item_size(), 137);
    assert_eq!(m.size_at(0), 137);
    assert_eq!(m.size_at(12_345), 137);
    assert_eq!(m.start_of(3), 411);
    assert_eq!(m.total_size(10), 1370);
}

#[test]
fn dynamic_effective_size_adds_overhead() {
    let mut m = SizeModel::dynamic(|_| 50);
    assert_eq!(m.effective_item_size(), 83);
    m.ensure_cached(10);
    assert_eq!(m.effective_item_size(), 83);
    assert_eq!(m.size_at(4), 83);
}

#[test]
fn dynamic_effective_size_is_mean_of_cached_prefix() {
    let mut m = SizeModel::dynamic(|i| if i % 2 == 0 { 17 } else { 67 });
    m.ensure_cached(10);
    assert_eq!(m.size_at(0), 50);
    assert_eq!(m.size_at(1), 100);
    assert_eq!(m.effective_item_size(), 75);
}

#[test]
fn custom_overhead_is_applied() {
    let m = SizeModel::fixed(40).with_overhead(0);
    assert_eq!(m.effective_item_size(), 40);
    let m = SizeModel::new(SizeDescriptor::Fixed(40), 10);
    assert_eq!(m.size_at(7), 50);
}

#[test]
fn offset_cache_is_append_only_and_reset_on_descriptor_change() {
    let mut m = SizeModel::dynamic(|i| i as u32);
    m.ensure_cached(20);
    assert_eq!(m.cached_len(), 20);
    m.ensure_cached(5);
    assert_eq!(m.cached_len(), 20);

    m.set_descriptor(SizeDescriptor::dynamic(|_| 1));
    assert_eq!(m.cached_len(), 0);
    m.ensure_cached(3);
    assert_eq!(m.start_of(3), 3 * 34);

    m.set_descriptor(SizeDescriptor::Fixed(10));
    m.ensure_cached(100);
    assert_eq!(m.cached_len(), 0);
}

#[test]
fn cached_and_uncached_queries_agree() {
    let f = |i: usize| ((i * 37) % 91) as u32;
    let mut cached = SizeModel::dynamic(f);
    cached.ensure_cached(300);
    let partial = {
        let mut m = SizeModel::dynamic(f);
        m.ensure_cached(120);
        m
    };
    let cold = SizeModel::dynamic(f);

    for index in [0usize, 1, 2, 50, 119, 120, 121, 299, 300] {
        let want = cached.start_of(index);
        assert_eq!(partial.start_of(index), want, "start_of({index})");
        assert_eq!(cold.start_of(index), want, "start_of({index})");
    }

    let total = cached.total_size(300);
    let mut rng = Lcg::new(7);
    for _ in 0..500 {
        let offset = rng.gen_range_u64(0, total + 200);
        let want = cached.index_at_offset(offset, 300);
        assert_eq!(partial.index_at_offset(offset, 300), want, "offset={offset}");
        assert_eq!(cold.index_at_offset(offset, 300), want, "offset={offset}");
    }
}

#[test]
fn index_at_offset_handles_bounds() {
    let m = SizeModel::fixed(67);
    assert_eq!(m.index_at_offset(0, 0), None);
    assert_eq!(m.index_at_offset(0, 10), Some(0));
    assert_eq!(m.index_at_offset(99, 10), Some(0));
    assert_eq!(m.index_at_offset(100, 10), Some(1));
    assert_eq!(m.index_at_offset(u64::MAX, 10), Some(9));

    let zero = SizeModel::fixed(0).with_overhead(0);
    assert_eq!(zero.index_at_offset(0, 4), Some(3));
}

#[test]
fn float_pixels_are_sanitized() {
    assert_eq!(px::offset_from_f64(-5.0), 0);
    assert_eq!(px::offset_from_f64(f64::NAN), 0);
    assert_eq!(px::offset_from_f64(12.9), 12);
    assert_eq!(px::offset_from_f64(f64::INFINITY), u64::MAX);
    assert_eq!(px::size_from_f64(-1.0), 0);
    assert_eq!(px::size_from_f64(f64::NAN), 0);
    assert_eq!(px::size_from_f64(104.5), 104);
    assert!(matches!(SizeDescriptor::fixed_px(-3.0), SizeDescriptor::Fixed(0)));
}

#[test]
fn buffer_count_rounds_up() {
    assert_eq!(buffer_item_count(200, 100), 2);
    assert_eq!(buffer_item_count(201, 100), 3);
    assert_eq!(buffer_item_count(200, 137), 2);
    assert_eq!(buffer_item_count(0, 137), 0);
    assert_eq!(buffer_item_count(5, 0), 5);
}

#[test]
fn overscan_grows_visible_range_by_buffer() {
    let m = SizeModel::new(SizeDescriptor::Fixed(100), 0);
    let r = compute_ranges(&m, 1000, 1100, 100, 200).unwrap();
    assert_eq!(r.buffer_item_count, 2);
    assert_eq!(r.visible, ItemRange::new(10, 20));
    assert_eq!(r.overscan, ItemRange::new(8, 22));
}

#[test]
fn overscan_is_clamped_for_small_collections() {
    let m = SizeModel::new(SizeDescriptor::Fixed(100), 0);
    let r = compute_ranges(&m, 1000, 1100, 21, 200).unwrap();
    assert_eq!(r.visible, ItemRange::new(10, 20));
    assert_eq!(r.overscan, ItemRange::new(8, 20));

    let r = compute_ranges(&m, 0, 250, 2, 1000).unwrap();
    assert_eq!(r.visible, ItemRange::new(0, 1));
    assert_eq!(r.overscan, ItemRange::new(0, 1));
}

#[test]
fn visible_range_clamps_offset_and_handles_degenerate_inputs() {
    let m = SizeModel::new(SizeDescriptor::Fixed(100), 0);
    assert_eq!(visible_range(&m, 0, 300, 0), None);
    // Past the end: clamped to the last full page.
    assert_eq!(
        visible_range(&m, 1_000_000, 300, 10),
        Some(ItemRange::new(7, 9))
    );
    // Zero-height viewport: the item under the offset.
    assert_eq!(visible_range(&m, 450, 0, 10), Some(ItemRange::single(4)));
    // Viewport larger than the content.
    assert_eq!(visible_range(&m, 50, 5000, 10), Some(ItemRange::new(0, 9)));
    assert_eq!(max_scroll_offset(&m, 5000, 10), 0);
}

#[test]
fn ranges_match_brute_force_and_hold_invariants() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..300 {
        let count = rng.gen_range_usize(1, 200);
        let contents: Vec<u32> = (0..count).map(|_| rng.gen_range_u32(0, 100)).collect();
        let occupied: Vec<u32> = contents.iter().map(|&c| c + DEFAULT_ITEM_OVERHEAD).collect();

        let table = contents.clone();
        let mut m = SizeModel::dynamic(move |i| table[i]);
        m.ensure_cached(rng.gen_range_usize(0, count + 1));

        let total: u64 = occupied.iter().map(|&s| s as u64).sum();
        let viewport = rng.gen_range_u32(0, 2000);
        let offset = rng.gen_range_u64(0, total + 500);
        let min_buffer_px = rng.gen_range_u32(0, 500);

        let got = compute_ranges(&m, offset, viewport, count, min_buffer_px).unwrap();
        assert_eq!(
            Some(got.visible),
            expected_visible_range(&occupied, offset, viewport),
            "count={count} offset={offset} viewport={viewport}"
        );

        assert!(got.visible.start <= got.visible.end);
        assert!(got.visible.end < count);
        assert!(got.overscan.contains_range(&got.visible));
        assert!(got.overscan.end < count);

        let buffer = buffer_item_count(min_buffer_px, m.effective_item_size());
        assert_eq!(got.buffer_item_count, buffer);
        assert_eq!(got.overscan.start, got.visible.start.saturating_sub(buffer));
        assert_eq!(got.overscan.end, (got.visible.end + buffer).min(count - 1));

        // Same inputs, same output.
        assert_eq!(
            compute_ranges(&m, offset, viewport, count, min_buffer_px),
            Some(got)
        );
    }
}

#[test]
fn rendered_range_is_kept_while_buffer_suffices() {
    let visible = ItemRange::new(5, 10);
    assert_eq!(
        next_rendered_range(None, visible, 100, 2, 5),
        ItemRange::new(0, 15)
    );

    let prev = ItemRange::new(0, 20);
    assert_eq!(next_rendered_range(Some(prev), visible, 100, 2, 5), prev);

    // Only one item of buffer left after the visible range: rebuild with the max buffer.
    assert_eq!(
        next_rendered_range(Some(prev), ItemRange::new(15, 19), 100, 2, 5),
        ItemRange::new(10, 24)
    );
}

#[test]
fn rendered_range_treats_data_bounds_as_buffer() {
    let prev = ItemRange::new(90, 99);
    assert_eq!(
        next_rendered_range(Some(prev), ItemRange::new(97, 99), 100, 2, 5),
        prev
    );
    // The data shrank below the previous range.
    assert_eq!(
        next_rendered_range(Some(prev), ItemRange::new(45, 49), 50, 2, 5),
        ItemRange::new(40, 49)
    );
}

fn infinite(threshold: usize, count: usize) -> PaginationOptions {
    PaginationOptions {
        enabled: true,
        load_more_threshold: threshold,
        load_more_count: count,
        ..PaginationOptions::default()
    }
}

#[test]
fn first_scroll_on_empty_data_requests_first_batch() {
    let mut p = PaginationController::new(infinite(5, 50));
    assert_eq!(p.sync(0, Some(100)), None);
    assert_eq!(p.state(), PaginationState::Idle);

    let ev = p.on_index(0, 0, true).unwrap();
    assert_eq!(
        ev,
        LoadMoreEvent {
            start_index: 0,
            stop_index: 49,
            load_index: 0,
            scroll_offset: 0,
            user_scroll: true,
        }
    );
    assert_eq!(ev.len(), 50);
    assert_eq!(p.state(), PaginationState::AwaitingMore);
    assert_eq!(p.outstanding(), Some(ItemRange::new(0, 49)));
}

#[test]
fn at_most_one_request_per_prefix() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(0, Some(100));
    assert!(p.on_index(0, 0, true).is_some());
    for i in 0..3 {
        assert_eq!(p.on_index(i, i as u64 * 10, true), None);
    }
    // Changing the total alone does not retire the request.
    assert_eq!(p.sync(0, Some(120)), None);
    assert_eq!(p.state(), PaginationState::AwaitingMore);
}

#[test]
fn served_request_returns_to_idle_then_next_batch_triggers() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(0, Some(100));
    p.on_index(1, 100, true).unwrap();

    assert_eq!(p.sync(50, Some(100)), None);
    assert_eq!(p.state(), PaginationState::Idle);
    assert_eq!(p.outstanding(), None);

    assert_eq!(p.on_index(40, 4000, true), None);
    let ev = p.on_index(46, 4600, false).unwrap();
    assert_eq!((ev.start_index, ev.stop_index, ev.load_index), (50, 99, 46));
    assert_eq!((ev.scroll_offset, ev.user_scroll), (4600, false));

    assert_eq!(p.sync(100, Some(100)), None);
    assert_eq!(p.state(), PaginationState::Exhausted);
    assert_eq!(p.on_index(99, 9900, true), None);
}

#[test]
fn partial_batch_re_triggers_from_last_index() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(0, Some(200));
    p.on_index(0, 0, true).unwrap();

    let ev = p.sync(3, Some(200)).unwrap();
    assert_eq!((ev.start_index, ev.stop_index, ev.load_index), (3, 52, 0));
    assert_eq!(p.state(), PaginationState::AwaitingMore);
}

#[test]
fn stop_index_is_clamped_to_total() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(90, Some(100));
    let ev = p.on_index(88, 0, true).unwrap();
    assert_eq!((ev.start_index, ev.stop_index), (90, 99));
}

#[test]
fn placeholders_follow_real_items_until_exhausted() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(95, Some(100));
    assert_eq!(p.placeholder_range(), 95..98);
    assert_eq!(p.data_length(), 98);
    assert!(p.is_placeholder(97));
    assert!(!p.is_placeholder(94));
    assert!(!p.is_placeholder(98));

    p.sync(99, Some(100));
    assert_eq!(p.placeholder_range(), 99..100);

    p.sync(100, Some(100));
    assert_eq!(p.placeholder_count(), 0);
    assert_eq!(p.state(), PaginationState::Exhausted);
    assert_eq!(p.data_length(), 100);
}

#[test]
fn hidden_or_disabled_placeholders() {
    let mut p = PaginationController::new(PaginationOptions {
        show_loading_items: false,
        ..infinite(5, 50)
    });
    p.sync(10, Some(100));
    assert_eq!(p.placeholder_count(), 0);

    let mut p = PaginationController::new(PaginationOptions::default());
    p.sync(10, Some(100));
    assert_eq!(p.placeholder_count(), 0);
    assert_eq!(p.on_index(9, 0, true), None);
    p.sync(100, Some(100));
    assert_eq!(p.state(), PaginationState::Exhausted);
}

#[test]
fn growing_total_reopens_exhausted_pagination() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(100, Some(100));
    assert_eq!(p.on_index(97, 9700, true), None);
    assert_eq!(p.state(), PaginationState::Exhausted);

    let ev = p.sync(100, Some(150)).unwrap();
    assert_eq!((ev.start_index, ev.stop_index, ev.load_index), (100, 149, 97));
    assert_eq!(p.state(), PaginationState::AwaitingMore);
}

#[test]
fn total_below_loaded_means_nothing_left() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(120, Some(100));
    assert_eq!(p.remaining(), Some(0));
    assert_eq!(p.state(), PaginationState::Exhausted);
    assert_eq!(p.on_index(119, 0, true), None);
}

#[test]
fn unset_total_is_unbounded() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(10, None);
    assert_eq!(p.remaining(), None);
    assert_eq!(p.placeholder_range(), 10..13);
    let ev = p.on_index(8, 0, true).unwrap();
    assert_eq!((ev.start_index, ev.stop_index), (10, 59));
    p.sync(60, None);
    assert_ne!(p.state(), PaginationState::Exhausted);
}

#[test]
fn loaded_predicate_suppresses_request() {
    let mut p = PaginationController::new(PaginationOptions {
        is_item_loaded: Some(Arc::new(|i: usize| i < 60)),
        ..infinite(5, 50)
    });
    p.sync(50, Some(100));
    assert_eq!(p.on_index(48, 0, true), None);
    assert_eq!(p.state(), PaginationState::Idle);

    p.sync(60, Some(100));
    assert!(p.on_index(58, 0, true).is_some());
}

#[test]
fn disabling_pagination_drops_outstanding_request() {
    let mut p = PaginationController::new(infinite(5, 50));
    p.sync(0, Some(100));
    p.on_index(0, 0, true).unwrap();
    assert_eq!(p.set_options(PaginationOptions::default()), None);
    assert_eq!(p.state(), PaginationState::Idle);
    assert_eq!(p.outstanding(), None);

    // Re-enabling re-evaluates against the last index.
    assert!(p.set_options(infinite(5, 50)).is_some());
}

#[test]
fn burst_inside_debounce_window_emits_latest_offset_once() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    c.start();
    assert!(c.signal(100, 0, ScrollOrigin::User));
    assert!(c.signal(250, 5, ScrollOrigin::User));

    assert_eq!(c.tick(16).scroll_changed, None);
    let fired = c.tick(21).scroll_changed.unwrap();
    assert_eq!(
        fired,
        ScrollTick {
            offset: 250,
            forward: true,
            user_scroll: true,
        }
    );
    assert_eq!(c.tick(40).scroll_changed, None);
}

#[test]
fn quiet_periods_reset_flags() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    c.start();
    c.signal(100, 0, ScrollOrigin::User);
    assert!(c.state().is_user_initiated);
    assert!(c.state().is_scrolling);

    c.tick(99);
    assert!(c.state().is_user_initiated);
    c.tick(100);
    assert!(!c.state().is_user_initiated);
    assert!(c.state().is_scrolling);
    c.tick(149);
    assert!(c.state().is_scrolling);
    c.tick(150);
    assert!(!c.state().is_scrolling);
}

#[test]
fn later_signal_postpones_quiet_period() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    c.start();
    c.signal(100, 0, ScrollOrigin::User);
    c.signal(120, 90, ScrollOrigin::User);
    c.tick(150);
    assert!(c.state().is_user_initiated);
    assert!(c.state().is_scrolling);
    c.tick(240);
    assert!(!c.state().is_scrolling);
}

#[test]
fn programmatic_scroll_is_not_user_initiated() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    c.start();
    c.signal(300, 0, ScrollOrigin::Programmatic);
    assert!(!c.state().is_user_initiated);
    assert!(c.state().is_scrolling);
    let fired = c.tick(16).scroll_changed.unwrap();
    assert!(!fired.user_scroll);
}

#[test]
fn late_tick_still_reports_user_flag() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    c.start();
    c.signal(300, 0, ScrollOrigin::User);
    let out = c.tick(1000);
    assert!(out.scroll_changed.unwrap().user_scroll);
    assert!(!c.state().is_user_initiated);
}

#[test]
fn direction_compares_with_last_emitted_offset() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    c.start();
    c.signal(100, 0, ScrollOrigin::User);
    assert!(c.tick(16).scroll_changed.unwrap().forward);

    c.signal(100, 20, ScrollOrigin::User);
    assert!(c.tick(36).scroll_changed.unwrap().forward);

    c.signal(50, 40, ScrollOrigin::User);
    assert!(!c.tick(56).scroll_changed.unwrap().forward);
    assert_eq!(c.state().direction, ScrollDirection::Backward);

    // Net movement of the window counts, not the last step.
    c.signal(10, 60, ScrollOrigin::User);
    c.signal(70, 65, ScrollOrigin::User);
    assert!(c.tick(81).scroll_changed.unwrap().forward);
}

#[test]
fn resize_is_debounced_separately() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    c.start();
    c.signal_resize(ViewportSize::new(100, 100), 0);
    c.signal_resize(ViewportSize::new(300, 200), 50);
    assert_eq!(c.next_deadline(), Some(150));
    assert_eq!(c.tick(149).resized, None);
    assert_eq!(c.tick(150).resized, Some(ViewportSize::new(300, 200)));
    assert_eq!(c.tick(400).resized, None);
}

#[test]
fn next_deadline_is_earliest_pending() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    c.start();
    assert_eq!(c.next_deadline(), None);
    c.signal(10, 10, ScrollOrigin::User);
    assert_eq!(c.next_deadline(), Some(26));
    c.tick(26);
    assert_eq!(c.next_deadline(), Some(110));
}

#[test]
fn detached_coordinator_ignores_everything() {
    let mut c = ScrollCoordinator::new(ScrollTimings::default());
    assert!(!c.signal(100, 0, ScrollOrigin::User));
    assert_eq!(c.state(), ScrollState::default());

    c.start();
    c.signal(100, 0, ScrollOrigin::User);
    c.signal_resize(ViewportSize::new(1, 1), 0);
    c.stop();
    let frozen = c.state();
    assert_eq!(frozen.offset, 100);
    assert!(!frozen.is_user_initiated);
    assert!(!frozen.is_scrolling);
    assert_eq!(c.next_deadline(), None);
    assert!(!c.signal(900, 5, ScrollOrigin::User));
    assert!(!c.signal_resize(ViewportSize::new(2, 2), 5));
    assert_eq!(c.tick(10_000), CoordinatorOutput::default());
    assert_eq!(c.state(), frozen);
}

#[test]
fn engine_drives_infinite_scroll_end_to_end() {
    let rec = Arc::new(Recorder::default());
    let options = recorded(
        &rec,
        hundred_px_options::<u32>()
            .with_total_count(Some(100))
            .with_infinite_scroll(true)
            .with_load_more(5, 50),
    );
    let mut e = Engine::new(options);
    e.start();

    let mut items: Vec<u32> = Vec::new();
    e.sync_items(&items);
    assert_eq!(e.data_length(), 3);
    assert_eq!(e.placeholder_range(), 0..3);

    assert!(e.on_scroll(0, 0));
    assert_eq!(
        rec.load_more(),
        vec![LoadMoreEvent {
            start_index: 0,
            stop_index: 49,
            load_index: 0,
            scroll_offset: 0,
            user_scroll: true,
        }]
    );
    assert_eq!(e.pagination_state(), PaginationState::AwaitingMore);

    items.extend(0..50);
    e.sync_items(&items);
    assert_eq!(e.pagination_state(), PaginationState::Idle);
    assert_eq!(e.data_length(), 53);
    assert_eq!(e.placeholder_range(), 50..53);
    assert!(e.is_loading_item(51));
    assert_eq!(e.entry(&items, 51), Some(Entry::Placeholder { index: 51 }));
    assert_eq!(e.entry(&items, 51).unwrap().key(), EntryKey::Loading(51));
    assert_eq!(e.entry(&items, 7).unwrap().item(), Some(&7));
    assert_eq!(e.entry(&items, 53), None);

    assert!(e.on_scroll(4600, 100));
    let lm = rec.load_more();
    assert_eq!(lm.len(), 2);
    assert_eq!((lm[1].start_index, lm[1].stop_index, lm[1].load_index), (50, 99, 46));
    assert_eq!(lm[1].scroll_offset, 4600);

    e.tick(116);
    let scrolls = rec.scroll();
    assert_eq!(scrolls.len(), 1);
    assert_eq!(
        scrolls[0],
        ScrollChangeEvent {
            overscan_start_index: 44,
            overscan_stop_index: 50,
            visible_start_index: 46,
            visible_stop_index: 48,
            scroll_offset: 4600,
            scroll_forward: true,
            user_scroll: true,
        }
    );

    items.extend(50..100);
    e.sync_items(&items);
    assert_eq!(e.pagination_state(), PaginationState::Exhausted);
    assert_eq!(e.data_length(), 100);
    assert!(e.placeholder_range().is_empty());
    assert_eq!(rec.load_more().len(), 2);
}

#[test]
fn engine_ranges_are_idempotent() {
    let mut e = Engine::<()>::new(hundred_px_options());
    e.set_loaded_len(1000);
    e.start();
    e.on_scroll(12_345, 0);
    let a = e.ranges();
    let b = e.ranges();
    assert_eq!(a, b);
    let r = a.unwrap();
    assert_eq!(r.visible, ItemRange::new(123, 126));
    assert_eq!(r.overscan, ItemRange::new(121, 128));
}

#[test]
fn engine_rendered_range_and_is_item_rendered() {
    let mut e = Engine::<()>::new(hundred_px_options());
    e.set_loaded_len(100);
    assert_eq!(e.rendered_range(), Some(ItemRange::new(0, 4)));
    assert!(e.is_item_rendered(4));
    assert!(!e.is_item_rendered(5));

    e.start();
    e.on_scroll(0, 0);
    assert_eq!(e.rendered_range(), Some(ItemRange::new(0, 4)));
    // One item of buffer left after the visible range: rebuilt.
    e.on_scroll(100, 5);
    assert_eq!(e.rendered_range(), Some(ItemRange::new(0, 5)));

    e.on_scroll(5000, 10);
    assert_eq!(e.rendered_range(), Some(ItemRange::new(48, 54)));
    assert!(!e.is_item_rendered(4));
}

#[test]
fn larger_max_buffer_renders_ahead() {
    let mut e = Engine::<()>::new(hundred_px_options().with_buffer_px(200, 500));
    e.set_loaded_len(100);
    assert_eq!(e.rendered_range(), Some(ItemRange::new(0, 7)));
    e.start();
    e.on_scroll(300, 0);
    assert_eq!(e.rendered_range(), Some(ItemRange::new(0, 7)));
    e.on_scroll(400, 5);
    assert_eq!(e.rendered_range(), Some(ItemRange::new(0, 11)));
}

#[test]
fn sticky_indices_are_merged_into_rendering() {
    let mut e = Engine::<()>::new(hundred_px_options().with_sticky_indices(vec![0, 10, 60, 200]));
    e.set_loaded_len(100);
    e.start();
    e.on_scroll(5000, 0);

    let mut out = Vec::new();
    e.for_each_rendered_index(|i| out.push(i));
    assert_eq!(out, vec![0, 10, 48, 49, 50, 51, 52, 53, 54, 60]);

    assert!(e.is_item_rendered(10));
    assert!(e.is_item_rendered(60));
    assert!(!e.is_item_rendered(47));
    assert!(!e.is_item_rendered(200));
}

#[test]
fn rendered_entries_include_placeholders() {
    let mut e = Engine::new(
        hundred_px_options::<String>()
            .with_total_count(Some(10))
            .with_infinite_scroll(true)
            .with_loading_items(true, 2),
    );
    let items: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    e.sync_items(&items);

    let mut out = Vec::new();
    e.collect_rendered_entries(&items, &mut out);
    let keys: Vec<EntryKey> = out.iter().map(|entry| entry.key()).collect();
    assert_eq!(
        keys,
        vec![
            EntryKey::Item(0),
            EntryKey::Item(1),
            EntryKey::Item(2),
            EntryKey::Loading(3),
            EntryKey::Loading(4),
        ]
    );
    assert_eq!(out[1].item().map(String::as_str), Some("b"));
    assert!(out[4].is_placeholder());
}

#[test]
fn engine_teardown_leaves_no_observable_mutation() {
    let rec = Arc::new(Recorder::default());
    let mut e = Engine::new(recorded(&rec, hundred_px_options::<()>()));
    e.set_loaded_len(100);
    e.start();
    e.on_scroll(500, 0);
    e.on_resize(ViewportSize::new(400, 600), 0);
    e.stop();

    let state = e.scroll_state();
    let rendered = e.rendered_range();
    let viewport = e.viewport_size();
    assert_eq!(e.next_deadline(), None);

    assert!(!e.on_scroll(900, 5));
    assert!(!e.on_programmatic_scroll(900, 5));
    assert!(!e.on_resize(ViewportSize::new(10, 10), 5));
    e.tick(10_000);

    assert_eq!(e.scroll_state(), state);
    assert_eq!(e.rendered_range(), rendered);
    assert_eq!(e.viewport_size(), viewport);
    assert!(rec.scroll().is_empty());
    assert!(rec.resize().is_empty());

    let mut vp = MockViewport::new();
    assert_eq!(e.scroll_to_index(&mut vp, 10, ScrollBehavior::Instant, 20), None);
    assert!(vp.calls.is_empty());
}

#[test]
fn restart_clears_stale_scroll_flags() {
    let rec = Arc::new(Recorder::default());
    let mut e = Engine::new(recorded(&rec, hundred_px_options::<()>()));
    e.set_loaded_len(100);
    e.start();
    e.on_scroll(500, 0);
    assert!(e.is_user_scrolling());
    e.stop();
    assert!(!e.is_user_scrolling());
    assert!(!e.is_scrolling());

    e.start();
    e.tick(10_000);
    let state = e.scroll_state();
    assert_eq!(state.offset, 500);
    assert!(!state.is_user_initiated);
    assert!(!state.is_scrolling);

    let mut vp = MockViewport::new();
    assert_eq!(
        e.scroll_to_offset(&mut vp, 1000, ScrollBehavior::Instant, 20_000),
        Some(1000)
    );
    assert!(!e.is_user_scrolling());
    e.tick(20_016);
    let last = rec.scroll().last().copied().unwrap();
    assert_eq!(last.scroll_offset, 1000);
    assert!(!last.user_scroll);
    e.tick(20_150);
    assert!(!e.is_scrolling());
}

#[test]
fn unsorted_sticky_indices_are_normalized() {
    let mut e = Engine::<()>::new(hundred_px_options());
    e.set_loaded_len(100);
    e.start();
    e.set_sticky_indices(vec![60, 10, 0, 10, 200]);
    assert_eq!(e.options().sticky_indices, vec![0, 10, 60, 200]);
    e.on_scroll(5000, 0);

    let mut out = Vec::new();
    e.for_each_rendered_index(|i| out.push(i));
    assert_eq!(out, vec![0, 10, 48, 49, 50, 51, 52, 53, 54, 60]);
    assert!(e.is_item_rendered(0));
    assert!(e.is_item_rendered(60));
    assert!(!e.is_item_rendered(30));

    e.update_options(|o| o.sticky_indices = vec![70, 5, 70]);
    assert_eq!(e.options().sticky_indices, vec![5, 70]);
    assert!(e.is_item_rendered(5));
    assert!(e.is_item_rendered(70));

    let mut raw = hundred_px_options::<()>();
    raw.sticky_indices = vec![9, 3];
    let e = Engine::new(raw);
    assert_eq!(e.options().sticky_indices, vec![3, 9]);

    let built = hundred_px_options::<()>().with_sticky_indices(vec![8, 1, 8]);
    assert_eq!(built.sticky_indices, vec![1, 8]);
}

#[test]
fn resize_updates_layout_now_and_notifies_later() {
    let rec = Arc::new(Recorder::default());
    let mut e = Engine::new(recorded(&rec, hundred_px_options::<()>()));
    e.set_loaded_len(100);
    e.start();
    e.on_resize(ViewportSize::new(400, 500), 0);
    assert_eq!(e.visible_range(), Some(ItemRange::new(0, 4)));
    e.on_resize(ViewportSize::new(400, 600), 30);
    e.tick(100);
    assert!(rec.resize().is_empty());
    e.tick(130);
    assert_eq!(
        rec.resize(),
        vec![ViewportResizeEvent {
            width: 400,
            height: 600
        }]
    );
}

#[test]
fn scroll_to_index_delegates_to_viewport() {
    let rec = Arc::new(Recorder::default());
    let mut e = Engine::new(recorded(&rec, hundred_px_options::<()>()));
    e.set_loaded_len(100);
    e.start();

    let mut vp = MockViewport::new();
    assert_eq!(
        e.scroll_to_index(&mut vp, 10, ScrollBehavior::Instant, 0),
        Some(1000)
    );
    assert_eq!(vp.calls, vec![(1000, ScrollBehavior::Instant)]);
    assert_eq!(e.scroll_offset(), 1000);
    assert!(!e.is_user_scrolling());
    assert!(e.is_scrolling());

    e.tick(16);
    let scrolls = rec.scroll();
    assert_eq!(scrolls.len(), 1);
    assert!(!scrolls[0].user_scroll);
    assert_eq!(scrolls[0].visible_start_index, 10);

    // Clamped to the scrollable extent.
    assert_eq!(
        e.scroll_to_index(&mut vp, 99, ScrollBehavior::Instant, 50),
        Some(9700)
    );
    assert_eq!(
        e.scroll_to_offset(&mut vp, u64::MAX, ScrollBehavior::Instant, 60),
        Some(9700)
    );

    // Smooth scrolls are left to the viewport.
    assert_eq!(
        e.scroll_to_offset(&mut vp, 2000, ScrollBehavior::Smooth, 70),
        Some(2000)
    );
    assert_eq!(e.scroll_offset(), 9700);
    assert_eq!(vp.calls.last(), Some(&(2000, ScrollBehavior::Smooth)));
}

#[test]
fn invalid_float_scroll_clamps_to_zero() {
    let mut e = Engine::<()>::new(hundred_px_options());
    e.set_loaded_len(100);
    e.start();
    e.on_scroll(700, 0);
    assert!(e.on_scroll_px(f64::NAN, 5));
    assert_eq!(e.scroll_offset(), 0);
    assert!(e.on_scroll_px(-20.0, 6));
    assert_eq!(e.visible_range(), Some(ItemRange::new(0, 2)));
}

#[test]
fn dynamic_sizes_flow_through_engine() {
    let mut e = Engine::<()>::new(
        VirtualScrollOptions::with_size_fn(|i| if i % 2 == 0 { 17 } else { 67 })
            .with_initial_viewport(ViewportSize::new(400, 300)),
    );
    e.set_loaded_len(10);
    assert_eq!(e.size_model().cached_len(), 10);
    assert_eq!(e.effective_item_size(), 75);
    assert_eq!(e.total_size(), 750);
    assert_eq!(e.size_at(1), 100);
    assert_eq!(e.offset_for_index(3), Some(200));

    // 0..50, 50..150, 150..200, 200..300, 300..350
    e.start();
    e.on_scroll(160, 0);
    assert_eq!(e.visible_range(), Some(ItemRange::new(2, 6)));

    e.set_item_size(SizeDescriptor::Fixed(67));
    assert_eq!(e.effective_item_size(), 100);
    assert_eq!(e.visible_range(), Some(ItemRange::new(1, 4)));
}

#[test]
fn update_options_rebuilds_what_changed() {
    let rec = Arc::new(Recorder::default());
    let mut e = Engine::new(recorded(&rec, hundred_px_options::<()>()));
    e.set_loaded_len(20);
    e.start();
    e.on_scroll(1500, 0);
    assert!(rec.load_more().is_empty());

    e.update_options(|o| {
        o.infinite_scroll = true;
        o.total_count = Some(40);
        o.load_more_threshold = 5;
        o.item_overhead = 0;
    });
    assert_eq!(e.effective_item_size(), 67);
    let lm = rec.load_more();
    assert_eq!(lm.len(), 1);
    assert_eq!((lm[0].start_index, lm[0].stop_index, lm[0].load_index), (20, 39, 15));
}

#[test]
fn item_events_are_relayed() {
    let toggles: Arc<Mutex<Vec<(usize, Option<String>, bool)>>> = Arc::default();
    let actions: Arc<Mutex<Vec<(usize, EntryKey)>>> = Arc::default();
    let (t, a) = (Arc::clone(&toggles), Arc::clone(&actions));
    let options = hundred_px_options::<String>()
        .with_total_count(Some(10))
        .with_infinite_scroll(true)
        .with_on_item_toggle(Some(move |e: &ItemToggleEvent<'_, String>| {
            t.lock()
                .unwrap()
                .push((e.index, e.item.item().cloned(), e.checked));
        }))
        .with_on_item_action(Some(move |e: &ItemActionEvent<'_, String>| {
            a.lock().unwrap().push((e.index, e.item.key()));
        }));
    let mut e = Engine::new(options);
    let items: Vec<String> = vec!["x".to_string(), "y".to_string()];
    e.sync_items(&items);

    e.item_toggle(&items, 1, true);
    e.item_toggle(&items, 2, false);
    e.item_toggle(&items, 50, true);
    e.item_action(&items, 0);
    e.item_action(&items, 3);

    assert_eq!(
        *toggles.lock().unwrap(),
        vec![(1, Some("y".to_string()), true), (2, None, false)]
    );
    assert_eq!(
        *actions.lock().unwrap(),
        vec![(0, EntryKey::Item(0)), (3, EntryKey::Loading(3))]
    );
}

#[test]
fn index_emitter_enforces_order_and_bounds() {
    let mut out = Vec::new();
    let mut push = |i: usize| out.push(i);
    let mut emitter = IndexEmitter::new(10, &mut push);
    emitter.emit(1);
    emitter.emit(1);
    emitter.emit_range(ItemRange::new(2, 4));
    emitter.emit_range(ItemRange::new(8, 20));
    drop(emitter);
    assert_eq!(out, vec![1, 2, 3, 4, 8, 9]);
}

#[test]
fn index_emitter_merges_sticky_around_range() {
    let mut out = Vec::new();
    let mut push = |i: usize| out.push(i);
    let mut emitter = IndexEmitter::new(20, &mut push);
    emitter.emit_with_sticky(ItemRange::new(5, 7), &[0, 3, 6, 12, 25]);
    drop(emitter);
    assert_eq!(out, vec![0, 3, 5, 6, 7, 12]);
}

#[test]
fn load_more_keys_off_first_visible_index() {
    let rec = Arc::new(Recorder::default());
    let options = recorded(
        &rec,
        hundred_px_options::<()>()
            .with_total_count(Some(100))
            .with_infinite_scroll(true)
            .with_loading_items(false, 0)
            .with_load_more(0, 10),
    );
    let mut e = Engine::new(options);
    e.set_loaded_len(10);
    e.start();

    // Rows 7..=9 are on screen, yet the first visible index is still 3 rows short.
    e.on_scroll(700, 0);
    assert_eq!(e.visible_range(), Some(ItemRange::new(7, 9)));
    assert!(rec.load_more().is_empty());

    // A threshold covering a viewport's worth of rows fires right away.
    e.set_load_more(3, 10);
    let lm = rec.load_more();
    assert_eq!(lm.len(), 1);
    assert_eq!((lm[0].start_index, lm[0].stop_index, lm[0].load_index), (10, 19, 7));
}
