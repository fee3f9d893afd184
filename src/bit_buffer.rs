//! Fixed-length bit buffer with MSB-first addressing.
//!
//! The engine owns exactly one [`BitBuffer`] per encode or decode and
//! passes explicit `(start, end)` bit bounds into the codecs instead of
//! handing out aliasing views. `copy_range` produces an independent
//! snapshot where one is needed.

/// A bit-addressable buffer of fixed length, packed MSB-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitBuffer {
    /// Create a zeroed buffer of `bit_len` bits.
    pub fn new(bit_len: usize) -> Self {
        Self {
            bytes: vec![0; (bit_len + 7) / 8],
            bit_len,
        }
    }

    /// Wrap whole bytes; the bit length is `bytes.len() * 8`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            bit_len: bytes.len() * 8,
        }
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Read the bit at `pos`.
    pub fn get(&self, pos: usize) -> bool {
        assert!(pos < self.bit_len, "bit index out of range");
        (self.bytes[pos / 8] >> (7 - (pos % 8))) & 1 != 0
    }

    /// Write the bit at `pos`.
    pub fn set(&mut self, pos: usize, bit: bool) {
        assert!(pos < self.bit_len, "bit index out of range");
        let mask = 1u8 << (7 - (pos % 8));
        if bit {
            self.bytes[pos / 8] |= mask;
        } else {
            self.bytes[pos / 8] &= !mask;
        }
    }

    /// Flip the bit at `pos`.
    pub fn flip(&mut self, pos: usize) {
        let bit = self.get(pos);
        self.set(pos, !bit);
    }

    /// Independent snapshot of the bits in `[start, end)`.
    pub fn copy_range(&self, start: usize, end: usize) -> BitBuffer {
        assert!(start <= end && end <= self.bit_len, "range out of bounds");
        let mut out = BitBuffer::new(end - start);
        for i in start..end {
            out.set(i - start, self.get(i));
        }
        out
    }

    /// Copy all of `src` into this buffer starting at bit `pos`.
    pub fn write_range(&mut self, pos: usize, src: &BitBuffer) {
        assert!(pos + src.len() <= self.bit_len, "range out of bounds");
        for i in 0..src.len() {
            self.set(pos + i, src.get(i));
        }
    }

    /// Pack the low `width` bits of `value` MSB-first starting at `pos`.
    pub fn write_bits(&mut self, pos: usize, value: u64, width: usize) {
        assert!(width <= 64, "width out of range");
        for i in 0..width {
            self.set(pos + i, (value >> (width - 1 - i)) & 1 != 0);
        }
    }

    /// Read `width` bits MSB-first starting at `pos`.
    pub fn read_bits(&self, pos: usize, width: usize) -> u64 {
        assert!(width <= 64, "width out of range");
        let mut value = 0u64;
        for i in 0..width {
            value = (value << 1) | self.get(pos + i) as u64;
        }
        value
    }

    /// Write whole bytes bit-by-bit starting at an arbitrary bit offset.
    pub fn write_bytes(&mut self, pos: usize, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.write_bits(pos + i * 8, b as u64, 8);
        }
    }

    /// Read `n` whole bytes starting at an arbitrary bit offset.
    pub fn read_bytes(&self, pos: usize, n: usize) -> Vec<u8> {
        (0..n).map(|i| self.read_bits(pos + i * 8, 8) as u8).collect()
    }

    /// The packed backing bytes. Trailing bits of the last byte beyond
    /// `len()` are zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}
