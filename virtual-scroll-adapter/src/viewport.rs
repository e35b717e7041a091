use virtual_scroll::{ScrollBehavior, ScrollViewport, ViewportSize};

use crate::{Easing, ScrollTween};

/// Default duration of a smooth scroll.
pub const DEFAULT_SMOOTH_SCROLL_MS: u64 = 240;

/// An in-memory scroll container.
///
/// Useful for toolkits without a native scroll container (terminals, canvases) and in tests.
/// Instant scrolls jump right away. A smooth scroll is recorded as a pending target and starts
/// animating on the next [`ScrollViewport::advance`]; a second smooth scroll during an animation
/// retargets it from wherever it currently is.
#[derive(Clone, Debug)]
pub struct HeadlessViewport {
    size: ViewportSize,
    offset: u64,
    duration_ms: u64,
    easing: Easing,
    pending: Option<u64>,
    tween: Option<ScrollTween>,
}

impl HeadlessViewport {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            size,
            offset: 0,
            duration_ms: DEFAULT_SMOOTH_SCROLL_MS,
            easing: Easing::default(),
            pending: None,
            tween: None,
        }
    }

    pub fn with_animation(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.duration_ms = duration_ms;
        self.easing = easing;
        self
    }

    pub fn set_size(&mut self, size: ViewportSize) {
        self.size = size;
    }

    /// Moves the container without animation, e.g. to mirror a scroll the user made.
    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    pub fn is_animating(&self) -> bool {
        self.pending.is_some() || self.tween.is_some()
    }

    /// Where the current animation ends, if one is running or pending.
    pub fn animation_target(&self) -> Option<u64> {
        self.pending.or(self.tween.map(|t| t.to))
    }
}

impl ScrollViewport for HeadlessViewport {
    fn scroll_offset(&self) -> u64 {
        self.offset
    }

    fn scroll_to_offset(&mut self, offset: u64, behavior: ScrollBehavior) {
        match behavior {
            ScrollBehavior::Instant => {
                self.cancel_animation();
                self.offset = offset;
            }
            ScrollBehavior::Smooth => {
                atrace!(from = self.offset, to = offset, "HeadlessViewport: smooth scroll");
                self.pending = Some(offset);
            }
        }
    }

    fn size(&self) -> ViewportSize {
        self.size
    }

    fn advance(&mut self, now_ms: u64) -> Option<u64> {
        if let Some(to) = self.pending.take() {
            match &mut self.tween {
                Some(tween) => tween.retarget(now_ms, to, self.duration_ms),
                None => {
                    self.tween = Some(ScrollTween::new(
                        self.offset,
                        to,
                        now_ms,
                        self.duration_ms,
                        self.easing,
                    ));
                }
            }
        }

        let tween = self.tween?;
        let next = tween.sample(now_ms);
        if tween.is_done(now_ms) {
            self.tween = None;
        }
        if next == self.offset {
            return None;
        }
        self.offset = next;
        Some(next)
    }

    fn cancel_animation(&mut self) {
        self.pending = None;
        self.tween = None;
    }
}
