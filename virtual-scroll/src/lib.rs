//! A headless virtual-scroll engine.
//!
//! For adapter-level utilities (a headless viewport, tween-driven smooth scrolling, a controller
//! that drives both), see the `virtual-scroll-adapter` crate.
//!
//! Given a scroll offset and an item size model, the engine decides which slice of a large
//! collection must be rendered, keeps an overscan buffer around it, and runs infinite-scroll
//! pagination: when to ask for the next batch and which loading placeholders to show meanwhile.
//! Raw scroll and resize signals are debounced into typed notifications.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport size and scroll offsets (plus a monotonic `now_ms`)
//! - the item collection length, and optionally a total count
//! - a fixed item size or a pure per-index size function
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod emitter;
mod engine;
mod events;
mod options;
mod pagination;
pub mod px;
pub mod range;
mod scroll;
mod size;
mod types;
mod viewport;

#[cfg(test)]
mod tests;

pub use emitter::IndexEmitter;
pub use engine::Engine;
pub use events::{
    ItemActionEvent, ItemToggleEvent, LoadMoreEvent, ScrollChangeEvent, ViewportResizeEvent,
};
pub use options::{
    OnItemActionCallback, OnItemToggleCallback, OnLoadMoreCallback, OnScrollChangeCallback,
    OnViewportResizeCallback, VirtualScrollOptions,
};
pub use pagination::{IsItemLoadedFn, PaginationController, PaginationOptions, PaginationState};
pub use range::Ranges;
pub use scroll::{CoordinatorOutput, ScrollCoordinator, ScrollState, ScrollTick, ScrollTimings};
pub use size::{DEFAULT_ITEM_OVERHEAD, DEFAULT_ITEM_SIZE, SizeDescriptor, SizeFn, SizeModel};
pub use types::{
    Entry, EntryKey, ItemRange, ScrollBehavior, ScrollDirection, ScrollOrigin, ViewportSize,
};
pub use viewport::ScrollViewport;
