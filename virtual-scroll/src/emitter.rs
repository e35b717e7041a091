use crate::ItemRange;

/// Emits item indexes in ascending order without allocating.
///
/// It enforces the rendering contract:
/// - Out-of-bounds indexes are ignored (and debug-asserted).
/// - Duplicates are ignored.
/// - Out-of-order indexes are ignored (and debug-asserted).
pub struct IndexEmitter<'a> {
    data_length: usize,
    last: Option<usize>,
    emit: &'a mut dyn FnMut(usize),
}

impl<'a> IndexEmitter<'a> {
    pub fn new(data_length: usize, emit: &'a mut dyn FnMut(usize)) -> Self {
        Self {
            data_length,
            last: None,
            emit,
        }
    }

    pub fn data_length(&self) -> usize {
        self.data_length
    }

    pub fn emit(&mut self, index: usize) {
        if index >= self.data_length {
            vwarn!(
                index,
                data_length = self.data_length,
                "IndexEmitter: out-of-bounds index"
            );
            debug_assert!(
                index < self.data_length,
                "IndexEmitter: out-of-bounds index (i={index}, len={})",
                self.data_length
            );
            return;
        }

        if let Some(prev) = self.last {
            if index == prev {
                return;
            }
            if index < prev {
                vwarn!(
                    prev,
                    next = index,
                    "IndexEmitter: indexes must be emitted in ascending order"
                );
                debug_assert!(
                    index > prev,
                    "IndexEmitter: indexes must be emitted in ascending order (prev={prev}, next={index})"
                );
                return;
            }
        }

        self.last = Some(index);
        (self.emit)(index);
    }

    pub fn emit_range(&mut self, range: ItemRange) {
        let end = range.end.min(self.data_length.saturating_sub(1));
        if self.data_length == 0 || range.start > end {
            return;
        }
        for i in range.start..=end {
            self.emit(i);
        }
    }

    /// Emits `range` merged with `sticky` (ascending), skipping sticky indexes past the data.
    pub fn emit_with_sticky(&mut self, range: ItemRange, sticky: &[usize]) {
        let data_length = self.data_length;
        let mut sticky = sticky
            .iter()
            .copied()
            .take_while(move |&i| i < data_length)
            .peekable();
        while let Some(&i) = sticky.peek() {
            if i >= range.start {
                break;
            }
            self.emit(i);
            sticky.next();
        }
        self.emit_range(range);
        for i in sticky {
            if i > range.end {
                self.emit(i);
            }
        }
    }
}

impl core::fmt::Debug for IndexEmitter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexEmitter")
            .field("data_length", &self.data_length)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}
