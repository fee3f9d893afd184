//! Core logic for the nimiqode concentric-ring barcode format.
//!
//! A nimiqode distributes a single logical bit-stream across a set of
//! concentric data rings. The stream is laid out as a self-describing
//! header followed by the payload and its Reed-Solomon parity, with a
//! per-ring XOR mask applied to the outer rings to break up structural
//! bit bias. [`Nimiqode::encode`] and [`Nimiqode::decode`] drive the two
//! pipelines; the remaining modules supply the bit buffer, checksum,
//! masking, FEC and header codecs they orchestrate.

pub mod bit_buffer;
pub mod checksum;
pub mod dump;
pub mod error;
pub mod fec;
pub mod header;
pub mod io_utils;
pub mod mask;
pub mod nimiqode;
pub mod ring;

pub use bit_buffer::BitBuffer;
pub use error::NimiqodeError;
pub use header::{header_length, mask_count, Header};
pub use nimiqode::Nimiqode;
pub use ring::{bit_capacity, Ring};

/// The single supported format version.
pub const VERSION: u8 = 0;

/// Minimum number of rings in any valid nimiqode. A lone ring is not
/// decodable by convention; it cannot be told apart from noise.
pub const MIN_RINGS: usize = 2;

/// Upper bound on the error correction factor accepted at encode time.
pub const MAX_EC_FACTOR: f64 = 2.0;
