//! Adapter utilities for the `virtual-scroll` crate.
//!
//! The `virtual-scroll` engine is UI-agnostic: it delegates imperative scrolling to a
//! [`virtual_scroll::ScrollViewport`] and takes time from the caller. This crate provides small,
//! framework-neutral helpers commonly needed by adapters:
//!
//! - [`HeadlessViewport`]: an in-memory scroll container with tween-driven smooth scrolling
//! - [`Controller`]: an engine plus a viewport, driven by one `tick(now_ms)`
//!
//! No toolkit bindings live here.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod tween;
mod viewport;


pub use controller::Controller;
pub use tween::{Easing, ScrollTween};
pub use viewport::{DEFAULT_SMOOTH_SCROLL_MS, HeadlessViewport};
