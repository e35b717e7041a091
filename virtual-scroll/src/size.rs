use alloc::sync::Arc;
use alloc::vec::Vec;

/// Default content size of an item, in pixels.
pub const DEFAULT_ITEM_SIZE: u32 = 104;

/// Default per-item structural overhead (padding + border), in pixels.
///
/// Callers pass *content* sizes; the model adds this once per item.
pub const DEFAULT_ITEM_OVERHEAD: u32 = 33;

/// A per-index content size function.
///
/// Must be pure: the same index must always yield the same size. The size model caches cumulative
/// offsets and never re-validates them, so an impure function leaves stale offsets behind.
pub type SizeFn = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// How item sizes are described.
#[derive(Clone)]
pub enum SizeDescriptor {
    /// Every item has the same content size.
    Fixed(u32),
    /// Content size per index.
    Dynamic(SizeFn),
}

impl SizeDescriptor {
    pub fn dynamic(f: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(f))
    }

    /// A fixed size from raw float pixels (negative/NaN clamp to 0).
    pub fn fixed_px(px: f64) -> Self {
        Self::Fixed(crate::px::size_from_f64(px))
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

impl Default for SizeDescriptor {
    fn default() -> Self {
        Self::Fixed(DEFAULT_ITEM_SIZE)
    }
}

impl core::fmt::Debug for SizeDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Item measurement: per-index occupied size and index ↔ pixel conversion.
///
/// Fixed mode is pure arithmetic. Dynamic mode keeps an append-only cache of item end offsets
/// (`ends[i]` is the end of item `i`), grown on demand with [`SizeModel::ensure_cached`].
/// Queries past the cached extent are still answered (by summing on the fly), so every query is
/// a pure function of its inputs; the cache only makes them cheap.
#[derive(Clone, Debug)]
pub struct SizeModel {
    descriptor: SizeDescriptor,
    overhead: u32,
    ends: Vec<u64>,
}

impl Default for SizeModel {
    fn default() -> Self {
        Self::new(SizeDescriptor::default(), DEFAULT_ITEM_OVERHEAD)
    }
}

impl SizeModel {
    pub fn new(descriptor: SizeDescriptor, overhead: u32) -> Self {
        Self {
            descriptor,
            overhead,
            ends: Vec::new(),
        }
    }

    pub fn fixed(content_size: u32) -> Self {
        Self::new(SizeDescriptor::Fixed(content_size), DEFAULT_ITEM_OVERHEAD)
    }

    pub fn dynamic(f: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::new(SizeDescriptor::dynamic(f), DEFAULT_ITEM_OVERHEAD)
    }

    pub fn with_overhead(mut self, overhead: u32) -> Self {
        self.set_overhead(overhead);
        self
    }

    pub fn descriptor(&self) -> &SizeDescriptor {
        &self.descriptor
    }

    pub fn overhead(&self) -> u32 {
        self.overhead
    }

    /// Replaces the size descriptor and drops every cached offset.
    pub fn set_descriptor(&mut self, descriptor: SizeDescriptor) {
        vdebug!(
            fixed = descriptor.is_fixed(),
            cached = self.ends.len(),
            "SizeModel::set_descriptor"
        );
        self.descriptor = descriptor;
        self.ends.clear();
    }

    pub fn set_overhead(&mut self, overhead: u32) {
        if self.overhead == overhead {
            return;
        }
        self.overhead = overhead;
        self.ends.clear();
    }

    /// Number of indexes whose offsets are cached (always 0 in fixed mode).
    pub fn cached_len(&self) -> usize {
        self.ends.len()
    }

    /// Extends the offset cache to cover `[0, len)`. Never shrinks it.
    pub fn ensure_cached(&mut self, len: usize) {
        let SizeDescriptor::Dynamic(f) = &self.descriptor else {
            return;
        };
        if len <= self.ends.len() {
            return;
        }
        vtrace!(from = self.ends.len(), to = len, "SizeModel::ensure_cached");
        self.ends.reserve_exact(len - self.ends.len());
        let mut end = self.ends.last().copied().unwrap_or(0);
        for i in self.ends.len()..len {
            end = end.saturating_add(with_overhead(f(i), self.overhead) as u64);
            self.ends.push(end);
        }
    }

    /// Occupied size of the item at `index`: content size plus overhead.
    pub fn size_at(&self, index: usize) -> u32 {
        match &self.descriptor {
            SizeDescriptor::Fixed(size) => with_overhead(*size, self.overhead),
            SizeDescriptor::Dynamic(f) => {
                if index < self.ends.len() {
                    let start = if index == 0 { 0 } else { self.ends[index - 1] };
                    (self.ends[index] - start).min(u32::MAX as u64) as u32
                } else {
                    with_overhead(f(index), self.overhead)
                }
            }
        }
    }

    /// A single representative item size, used for pixel → item-count conversions.
    ///
    /// Fixed mode: `content + overhead`. Dynamic mode: the mean occupied size of the cached
    /// prefix, or the size of index 0 when nothing is cached yet.
    pub fn effective_item_size(&self) -> u32 {
        match &self.descriptor {
            SizeDescriptor::Fixed(size) => with_overhead(*size, self.overhead),
            SizeDescriptor::Dynamic(f) => match self.ends.last() {
                Some(&total) => (total / self.ends.len() as u64).min(u32::MAX as u64) as u32,
                None => with_overhead(f(0), self.overhead),
            },
        }
    }

    /// Pixel offset where the item at `index` starts.
    pub fn start_of(&self, index: usize) -> u64 {
        match &self.descriptor {
            SizeDescriptor::Fixed(size) => {
                (index as u64).saturating_mul(with_overhead(*size, self.overhead) as u64)
            }
            SizeDescriptor::Dynamic(f) => {
                if index == 0 {
                    return 0;
                }
                let cached = self.ends.len();
                if index <= cached {
                    return self.ends[index - 1];
                }
                let mut start = self.ends.last().copied().unwrap_or(0);
                for i in cached..index {
                    start = start.saturating_add(with_overhead(f(i), self.overhead) as u64);
                }
                start
            }
        }
    }

    pub fn end_of(&self, index: usize) -> u64 {
        self.start_of(index)
            .saturating_add(self.size_at(index) as u64)
    }

    /// Total pixel extent of the first `count` items.
    pub fn total_size(&self, count: usize) -> u64 {
        self.start_of(count)
    }

    /// Index of the item covering `offset`, among the first `count` items.
    ///
    /// Offsets past the end map to the last item. Returns `None` when `count == 0`.
    pub fn index_at_offset(&self, offset: u64, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let last = count - 1;
        match &self.descriptor {
            SizeDescriptor::Fixed(size) => {
                let size = with_overhead(*size, self.overhead) as u64;
                if size == 0 {
                    return Some(last);
                }
                Some(((offset / size).min(last as u64)) as usize)
            }
            SizeDescriptor::Dynamic(f) => {
                // Number of items that end at or before `offset`.
                let cached = count.min(self.ends.len());
                let consumed = self.ends[..cached].partition_point(|&end| end <= offset);
                if consumed < cached || cached == count {
                    return Some(consumed.min(last));
                }
                let mut end = self.ends[..cached].last().copied().unwrap_or(0);
                for i in cached..count {
                    end = end.saturating_add(with_overhead(f(i), self.overhead) as u64);
                    if end > offset {
                        return Some(i);
                    }
                }
                Some(last)
            }
        }
    }
}

fn with_overhead(content: u32, overhead: u32) -> u32 {
    content.saturating_add(overhead)
}
