use crate::Entry;

/// Emitted when the caller should fetch the items `start_index..=stop_index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadMoreEvent {
    pub start_index: usize,
    pub stop_index: usize,
    /// The scrolled-to index that triggered the request.
    pub load_index: usize,
    pub scroll_offset: u64,
    pub user_scroll: bool,
}

impl LoadMoreEvent {
    pub fn len(&self) -> usize {
        self.stop_index - self.start_index + 1
    }
}

/// Debounced notification of a scroll position change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollChangeEvent {
    pub overscan_start_index: usize,
    pub overscan_stop_index: usize,
    pub visible_start_index: usize,
    pub visible_stop_index: usize,
    pub scroll_offset: u64,
    pub scroll_forward: bool,
    pub user_scroll: bool,
}

/// Debounced notification of a viewport size change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportResizeEvent {
    pub width: u32,
    pub height: u32,
}

/// Relayed as-is from the rendering layer (e.g. a row checkbox).
#[derive(Debug)]
pub struct ItemToggleEvent<'a, T> {
    pub index: usize,
    pub item: Entry<'a, T>,
    pub checked: bool,
}

/// Relayed as-is from the rendering layer (e.g. a row action button).
#[derive(Debug)]
pub struct ItemActionEvent<'a, T> {
    pub index: usize,
    pub item: Entry<'a, T>,
}
