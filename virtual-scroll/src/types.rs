use core::cmp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

impl ScrollDirection {
    /// Direction of a move from `prev` to `next`. Ties resolve to `Forward`.
    pub fn between(prev: u64, next: u64) -> Self {
        if next >= prev {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    pub fn is_forward(self) -> bool {
        self == Self::Forward
    }
}

/// How a programmatic scroll should reach its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBehavior {
    /// Jump to the target immediately.
    #[default]
    Instant,
    /// Let the viewport animate towards the target.
    Smooth,
}

/// Where a scroll signal came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollOrigin {
    /// Wheel, drag, keyboard: anything the user did to the scroll container.
    User,
    /// A `scroll_to_*` call or an animation step driven by the adapter.
    Programmatic,
}

/// Pixel dimensions of the scroll container. `height` is the virtualized axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A contiguous range of item indexes. Both bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRange {
    pub start: usize,
    pub end: usize,
}

impl ItemRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "ItemRange: start > end ({start} > {end})");
        Self {
            start,
            end: cmp::max(start, end),
        }
    }

    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    pub fn contains_range(&self, other: &ItemRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Grows the range by `before`/`after` items, clamped to `[0, data_length - 1]`.
    ///
    /// `data_length` must be non-zero.
    pub fn expand(&self, before: usize, after: usize, data_length: usize) -> Self {
        debug_assert!(data_length > 0);
        let last = data_length.saturating_sub(1);
        Self {
            start: self.start.saturating_sub(before).min(last),
            end: self.end.saturating_add(after).min(last),
        }
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Identity of an entry in the combined (real + placeholder) collection.
///
/// Placeholders have their own key space: a loading row and the real item that later replaces
/// it never share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKey {
    Item(usize),
    Loading(usize),
}

/// One slot of the combined collection: a caller record or a loading placeholder.
#[derive(Debug, PartialEq, Eq)]
pub enum Entry<'a, T> {
    Real { index: usize, item: &'a T },
    Placeholder { index: usize },
}

impl<T> Clone for Entry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Entry<'_, T> {}

impl<'a, T> Entry<'a, T> {
    pub fn index(&self) -> usize {
        match *self {
            Self::Real { index, .. } | Self::Placeholder { index } => index,
        }
    }

    pub fn key(&self) -> EntryKey {
        match *self {
            Self::Real { index, .. } => EntryKey::Item(index),
            Self::Placeholder { index } => EntryKey::Loading(index),
        }
    }

    pub fn item(&self) -> Option<&'a T> {
        match *self {
            Self::Real { item, .. } => Some(item),
            Self::Placeholder { .. } => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}
