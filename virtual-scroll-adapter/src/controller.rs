use virtual_scroll::{
    Engine, ItemRange, ScrollBehavior, ScrollViewport, ViewportSize, VirtualScrollOptions,
};

use crate::{Easing, HeadlessViewport};

/// A framework-neutral driver owning an [`Engine`] and a [`HeadlessViewport`].
///
/// It holds no UI objects. Adapters drive it by calling:
/// - `on_scroll` / `on_resize` when UI events occur
/// - `tick(now_ms)` each frame or whenever [`Controller::next_deadline`] is reached
///
/// While a smooth scroll is animating, every `tick` returns the new offset; apply it to the real
/// scroll container (if any). Animation steps reach the engine as programmatic scrolls, so they
/// never count as user scrolling.
#[derive(Clone, Debug)]
pub struct Controller<T> {
    engine: Engine<T>,
    viewport: HeadlessViewport,
}

impl<T> Controller<T> {
    pub fn new(options: VirtualScrollOptions<T>) -> Self {
        let viewport = HeadlessViewport::new(options.initial_viewport);
        Self {
            engine: Engine::new(options),
            viewport,
        }
    }

    pub fn from_parts(engine: Engine<T>, viewport: HeadlessViewport) -> Self {
        Self { engine, viewport }
    }

    pub fn with_animation(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.viewport = self.viewport.with_animation(duration_ms, easing);
        self
    }

    pub fn engine(&self) -> &Engine<T> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<T> {
        &mut self.engine
    }

    pub fn viewport(&self) -> &HeadlessViewport {
        &self.viewport
    }

    pub fn into_parts(self) -> (Engine<T>, HeadlessViewport) {
        (self.engine, self.viewport)
    }

    pub fn start(&mut self) {
        self.engine.start();
    }

    /// Stops the engine and drops any animation in flight.
    pub fn stop(&mut self) {
        self.viewport.cancel_animation();
        self.engine.stop();
    }

    pub fn is_animating(&self) -> bool {
        self.viewport.is_animating()
    }

    pub fn cancel_animation(&mut self) {
        self.viewport.cancel_animation();
    }

    /// Call this when the UI reports a scroll offset change (wheel, drag, keyboard).
    ///
    /// This cancels any active animation.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) -> bool {
        if !self.engine.is_running() {
            return false;
        }
        if self.viewport.is_animating() {
            adebug!(offset, "Controller: user scroll interrupts animation");
        }
        self.viewport.cancel_animation();
        self.viewport.set_offset(offset);
        self.engine.on_scroll(offset, now_ms)
    }

    pub fn on_resize(&mut self, size: ViewportSize, now_ms: u64) -> bool {
        if !self.engine.is_running() {
            return false;
        }
        self.viewport.set_size(size);
        self.engine.on_resize(size, now_ms)
    }

    pub fn sync_items(&mut self, items: &[T]) {
        self.engine.sync_items(items);
    }

    /// Scrolls so that `index` starts at the top. Returns the clamped target offset.
    pub fn scroll_to_index(
        &mut self,
        index: usize,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> Option<u64> {
        self.engine
            .scroll_to_index(&mut self.viewport, index, behavior, now_ms)
    }

    /// Scrolls to `offset`. Returns the clamped target offset.
    pub fn scroll_to_offset(
        &mut self,
        offset: u64,
        behavior: ScrollBehavior,
        now_ms: u64,
    ) -> Option<u64> {
        self.engine
            .scroll_to_offset(&mut self.viewport, offset, behavior, now_ms)
    }

    /// Advances the animation (if any), then fires the engine's due notifications.
    ///
    /// Returns the new offset when the animation moved the viewport.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        let moved = if self.engine.is_running() {
            self.viewport.advance(now_ms)
        } else {
            None
        };
        if let Some(offset) = moved {
            atrace!(offset, now_ms, "Controller: animation step");
            self.engine.on_programmatic_scroll(offset, now_ms);
        }
        self.engine.tick(now_ms);
        moved
    }

    /// Earliest time at which the engine has a notification due.
    ///
    /// Animations are not included: tick every frame while [`Controller::is_animating`].
    pub fn next_deadline(&self) -> Option<u64> {
        self.engine.next_deadline()
    }

    pub fn scroll_offset(&self) -> u64 {
        self.viewport.scroll_offset()
    }

    pub fn visible_range(&self) -> Option<ItemRange> {
        self.engine.visible_range()
    }

    pub fn rendered_range(&self) -> Option<ItemRange> {
        self.engine.rendered_range()
    }

    pub fn is_item_rendered(&self, index: usize) -> bool {
        self.engine.is_item_rendered(index)
    }
}
