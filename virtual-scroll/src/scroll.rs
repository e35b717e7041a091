use crate::{ScrollDirection, ScrollOrigin, ViewportSize};

/// Debounce and quiet-period delays, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollTimings {
    /// Window for coalescing scroll signals into one scroll-changed notification (~60fps).
    pub scroll_debounce_ms: u64,
    /// Window for coalescing viewport size changes.
    pub resize_debounce_ms: u64,
    /// Quiet period after which a user scroll stops counting as user-initiated.
    pub user_scroll_reset_ms: u64,
    /// Quiet period after which `is_scrolling` drops back to `false`.
    pub is_scrolling_reset_ms: u64,
}

impl Default for ScrollTimings {
    fn default() -> Self {
        Self {
            scroll_debounce_ms: 16,
            resize_debounce_ms: 100,
            user_scroll_reset_ms: 100,
            is_scrolling_reset_ms: 150,
        }
    }
}

/// A lightweight, serializable snapshot of the current scroll state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub direction: ScrollDirection,
    pub is_user_initiated: bool,
    pub is_scrolling: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            direction: ScrollDirection::Forward,
            is_user_initiated: false,
            is_scrolling: false,
        }
    }
}

/// A single-slot delayed callback: scheduling again replaces the pending one.
#[derive(Clone, Copy, Debug, Default)]
struct Deadline<P> {
    pending: Option<(u64, P)>,
}

impl<P: Copy> Deadline<P> {
    fn schedule(&mut self, now_ms: u64, delay_ms: u64, payload: P) {
        self.pending = Some((now_ms.saturating_add(delay_ms), payload));
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn due_at(&self) -> Option<u64> {
        self.pending.map(|(due, _)| due)
    }

    fn take_due(&mut self, now_ms: u64) -> Option<P> {
        match self.pending {
            Some((due, payload)) if now_ms >= due => {
                self.pending = None;
                Some(payload)
            }
            _ => None,
        }
    }
}

/// A debounced scroll-changed notification, ready to be turned into a
/// [`crate::ScrollChangeEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollTick {
    pub offset: u64,
    pub forward: bool,
    pub user_scroll: bool,
}

/// What fired during one [`ScrollCoordinator::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorOutput {
    pub scroll_changed: Option<ScrollTick>,
    pub resized: Option<ViewportSize>,
}

/// Turns raw, high-frequency scroll and resize signals into debounced notifications.
///
/// Time is supplied by the caller: every signal carries `now_ms`, and [`ScrollCoordinator::tick`]
/// fires whatever deadline has passed. Each channel holds at most one pending deadline; a new
/// signal cancels and reschedules it, so a burst produces one notification carrying the latest
/// value.
///
/// The coordinator starts detached. Between [`ScrollCoordinator::stop`] and the next
/// [`ScrollCoordinator::start`], signals and ticks are ignored.
#[derive(Clone, Debug)]
pub struct ScrollCoordinator {
    timings: ScrollTimings,
    attached: bool,
    state: ScrollState,
    last_emitted_offset: u64,

    scroll_changed: Deadline<()>,
    resized: Deadline<ViewportSize>,
    user_reset: Deadline<()>,
    scrolling_reset: Deadline<()>,
}

impl ScrollCoordinator {
    pub fn new(timings: ScrollTimings) -> Self {
        Self {
            timings,
            attached: false,
            state: ScrollState::default(),
            last_emitted_offset: 0,
            scroll_changed: Deadline::default(),
            resized: Deadline::default(),
            user_reset: Deadline::default(),
            scrolling_reset: Deadline::default(),
        }
    }

    pub fn timings(&self) -> ScrollTimings {
        self.timings
    }

    /// New delays apply to deadlines scheduled from now on.
    pub fn set_timings(&mut self, timings: ScrollTimings) {
        self.timings = timings;
    }

    pub fn start(&mut self) {
        self.attached = true;
    }

    /// Detaches from the scroll source and cancels every pending deadline.
    ///
    /// The pending resets can no longer fire, so the user and scrolling flags are cleared here.
    /// The offset and direction are kept.
    pub fn stop(&mut self) {
        self.attached = false;
        self.state.is_user_initiated = false;
        self.state.is_scrolling = false;
        self.scroll_changed.cancel();
        self.resized.cancel();
        self.user_reset.cancel();
        self.scrolling_reset.cancel();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn offset(&self) -> u64 {
        self.state.offset
    }

    /// Records a scroll signal. Returns `false` when detached.
    pub fn signal(&mut self, offset: u64, now_ms: u64, origin: ScrollOrigin) -> bool {
        if !self.attached {
            return false;
        }
        vtrace!(offset, now_ms, ?origin, "ScrollCoordinator::signal");
        self.state.offset = offset;
        self.state.is_scrolling = true;
        self.scrolling_reset
            .schedule(now_ms, self.timings.is_scrolling_reset_ms, ());
        if origin == ScrollOrigin::User {
            self.state.is_user_initiated = true;
            self.user_reset
                .schedule(now_ms, self.timings.user_scroll_reset_ms, ());
        }
        self.scroll_changed
            .schedule(now_ms, self.timings.scroll_debounce_ms, ());
        true
    }

    /// Records a viewport size change. Returns `false` when detached.
    pub fn signal_resize(&mut self, size: ViewportSize, now_ms: u64) -> bool {
        if !self.attached {
            return false;
        }
        self.resized
            .schedule(now_ms, self.timings.resize_debounce_ms, size);
        true
    }

    /// Earliest pending deadline, for adapters that arm a single timer.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.scroll_changed.due_at(),
            self.resized.due_at(),
            self.user_reset.due_at(),
            self.scrolling_reset.due_at(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Fires every deadline that has passed at `now_ms`.
    ///
    /// The scroll-changed notification is produced before the quiet-period resets, so a late tick
    /// still reports the user flag that was current when the window closed.
    pub fn tick(&mut self, now_ms: u64) -> CoordinatorOutput {
        let mut out = CoordinatorOutput::default();
        if !self.attached {
            return out;
        }

        if self.scroll_changed.take_due(now_ms).is_some() {
            let offset = self.state.offset;
            let direction = ScrollDirection::between(self.last_emitted_offset, offset);
            self.last_emitted_offset = offset;
            self.state.direction = direction;
            out.scroll_changed = Some(ScrollTick {
                offset,
                forward: direction.is_forward(),
                user_scroll: self.state.is_user_initiated,
            });
        }

        out.resized = self.resized.take_due(now_ms);

        if self.user_reset.take_due(now_ms).is_some() {
            self.state.is_user_initiated = false;
        }
        if self.scrolling_reset.take_due(now_ms).is_some() {
            self.state.is_scrolling = false;
        }
        out
    }
}
