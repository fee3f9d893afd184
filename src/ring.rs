//! Ring descriptors and the geometry-derived capacity function.

use crate::bit_buffer::BitBuffer;

/// Data slot count of the innermost ring.
pub const INNERMOST_RING_BITS: usize = 96;
/// Additional data slots gained per ring as the radius grows.
pub const RING_BITS_STEP: usize = 48;

/// Bit capacity of the ring at `index` (0 = innermost).
///
/// Capacity is a pure function of the index alone: the circumference,
/// and with it the slot count, grows linearly with the radius.
pub fn bit_capacity(index: usize) -> usize {
    INNERMOST_RING_BITS + index * RING_BITS_STEP
}

/// One concentric data ring.
///
/// Carries a fixed bit capacity and, once a nimiqode has been encoded
/// or scanned, the slice of the overall bit-stream that this ring
/// physically holds.
#[derive(Debug, Clone)]
pub struct Ring {
    index: usize,
    capacity: usize,
    data: Option<BitBuffer>,
}

impl Ring {
    /// Create the empty ring at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            capacity: bit_capacity(index),
            data: None,
        }
    }

    /// Create a ring at `index` already populated with scanned bits.
    pub fn with_data(index: usize, data: BitBuffer) -> Self {
        Self {
            index,
            capacity: bit_capacity(index),
            data: Some(data),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Fixed bit capacity of this ring.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The ring's share of the bit-stream, if assigned.
    pub fn data(&self) -> Option<&BitBuffer> {
        self.data.as_ref()
    }

    pub(crate) fn attach(&mut self, data: BitBuffer) {
        self.data = Some(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_grows_with_index() {
        for i in 1..16 {
            assert!(bit_capacity(i) > bit_capacity(i - 1));
        }
    }

    #[test]
    fn ring_capacity_matches_function() {
        let ring = Ring::new(3);
        assert_eq!(ring.capacity(), bit_capacity(3));
        assert!(ring.data().is_none());
    }
}
