use crate::renderer::resources::BufferId;

/// A byte range inside a registered buffer, read as `element_count` elements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferView {
    pub buffer_id: BufferId,
    pub byte_offset: u64,
    pub byte_length: u64,
    pub element_count: u32,
}

impl BufferView {
    pub fn new(buffer_id: BufferId, byte_offset: u64, byte_length: u64, element_count: u32) -> Self {
        Self {
            buffer_id,
            byte_offset,
            byte_length,
            element_count,
        }
    }

    /// One past the last byte covered by the view. `None` on overflow.
    pub fn byte_end(&self) -> Option<u64> {
        self.byte_offset.checked_add(self.byte_length)
    }

    /// Whether the view lies entirely within a buffer of `buffer_size` bytes.
    pub fn fits_within(&self, buffer_size: u64) -> bool {
        self.byte_end().is_some_and(|end| end <= buffer_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_ending_at_buffer_end_fits() {
        let view = BufferView::new(BufferId::new(0), 16, 48, 4);
        assert_eq!(view.byte_end(), Some(64));
        assert!(view.fits_within(64));
        assert!(!view.fits_within(63));
    }

    #[test]
    fn overflowing_range_never_fits() {
        let view = BufferView::new(BufferId::new(0), u64::MAX, 1, 1);
        assert_eq!(view.byte_end(), None);
        assert!(!view.fits_within(u64::MAX));
    }
}
