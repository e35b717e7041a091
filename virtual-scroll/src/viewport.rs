use crate::{ScrollBehavior, ViewportSize};

/// The scroll container the engine delegates imperative scrolling to.
///
/// Implemented by the UI layer (a DOM element, a terminal pane, ...). The engine never reads
/// pixels from it on its own; the adapter keeps reporting offsets and sizes through the engine's
/// signal methods.
pub trait ScrollViewport {
    /// Current scroll offset of the container.
    fn scroll_offset(&self) -> u64;

    /// Moves the container. With [`ScrollBehavior::Smooth`] the move may complete over several
    /// frames; see [`ScrollViewport::advance`].
    fn scroll_to_offset(&mut self, offset: u64, behavior: ScrollBehavior);

    fn size(&self) -> ViewportSize;

    /// Advances an in-progress animated scroll.
    ///
    /// Returns the new offset when the container moved. Containers that animate on their own
    /// (or never animate) keep the default.
    fn advance(&mut self, _now_ms: u64) -> Option<u64> {
        None
    }

    /// Stops an in-progress animated scroll where it is.
    fn cancel_animation(&mut self) {}
}
