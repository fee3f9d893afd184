//! The bit-stream's self-describing prefix.
//!
//! MSB-first field layout:
//!
//! ```text
//! [version(2)][payload_len(10)][ec_len(12)][checksum(16)][mask ids(2 each)]
//! ```
//!
//! One mask id is stored per masked ring. The two pure layout
//! functions, [`mask_count`] and [`header_length`], depend only on the
//! shape of the ring set and are shared verbatim by the encode and
//! decode pipelines; if they ever disagreed the header could not be
//! found, let alone parsed.

use crate::bit_buffer::BitBuffer;
use crate::error::NimiqodeError;
use crate::mask::MASK_ID_BITS;
use crate::ring::Ring;

/// Width of the version field.
pub const VERSION_BITS: usize = 2;
/// Width of the payload bit-length field.
pub const PAYLOAD_LENGTH_BITS: usize = 10;
/// Width of the error correction bit-length field.
pub const EC_LENGTH_BITS: usize = 12;
/// Width of the checksum field.
pub const CHECKSUM_BITS: usize = 16;

/// Largest payload bit-length the header can describe.
pub const MAX_PAYLOAD_BITS: usize = (1 << PAYLOAD_LENGTH_BITS) - 1;
/// Largest error correction bit-length the header can describe.
pub const MAX_EC_BITS: usize = (1 << EC_LENGTH_BITS) - 1;

/// Parsed header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub payload_length: usize,
    pub ec_length: usize,
    pub checksum: u16,
    /// Mask ids, innermost masked ring first.
    pub masks: Vec<u8>,
}

/// Number of masked rings for a ring set of `num_rings` rings.
///
/// Every ring except the innermost is masked; the innermost mostly
/// carries the header, whose structure the masks must not touch.
pub fn mask_count(num_rings: usize) -> usize {
    num_rings.saturating_sub(1)
}

/// Total header length in bits when `masks` mask ids are stored.
pub fn header_length(masks: usize) -> usize {
    VERSION_BITS + PAYLOAD_LENGTH_BITS + EC_LENGTH_BITS + CHECKSUM_BITS + masks * MASK_ID_BITS
}

/// Serialize the header into the stream prefix `[0, header_length)`.
pub fn write_header(
    stream: &mut BitBuffer,
    version: u8,
    payload_length: usize,
    ec_length: usize,
    checksum: u16,
    masks: &[u8],
) -> Result<(), NimiqodeError> {
    if version as usize >= 1 << VERSION_BITS {
        return Err(NimiqodeError::Header(format!(
            "version {version} overflows the version field"
        )));
    }
    if payload_length > MAX_PAYLOAD_BITS {
        return Err(NimiqodeError::Header(format!(
            "payload length {payload_length} overflows the length field"
        )));
    }
    if ec_length > MAX_EC_BITS {
        return Err(NimiqodeError::Header(format!(
            "error correction length {ec_length} overflows the length field"
        )));
    }
    let mut pos = 0;
    stream.write_bits(pos, version as u64, VERSION_BITS);
    pos += VERSION_BITS;
    stream.write_bits(pos, payload_length as u64, PAYLOAD_LENGTH_BITS);
    pos += PAYLOAD_LENGTH_BITS;
    stream.write_bits(pos, ec_length as u64, EC_LENGTH_BITS);
    pos += EC_LENGTH_BITS;
    stream.write_bits(pos, checksum as u64, CHECKSUM_BITS);
    pos += CHECKSUM_BITS;
    for &mask in masks {
        stream.write_bits(pos, mask as u64, MASK_ID_BITS);
        pos += MASK_ID_BITS;
    }
    Ok(())
}

/// Parse the header from the stream prefix. The mask id count comes
/// from the ring set's shape, never from the (possibly corrupt) data.
pub fn read_header(stream: &BitBuffer, rings: &[Ring]) -> Result<Header, NimiqodeError> {
    let masks = mask_count(rings.len());
    if stream.len() < header_length(masks) {
        return Err(NimiqodeError::Header(format!(
            "bit-stream of {} bits is shorter than the {} bit header",
            stream.len(),
            header_length(masks)
        )));
    }
    let mut pos = 0;
    let version = stream.read_bits(pos, VERSION_BITS) as u8;
    pos += VERSION_BITS;
    let payload_length = stream.read_bits(pos, PAYLOAD_LENGTH_BITS) as usize;
    pos += PAYLOAD_LENGTH_BITS;
    let ec_length = stream.read_bits(pos, EC_LENGTH_BITS) as usize;
    pos += EC_LENGTH_BITS;
    let checksum = stream.read_bits(pos, CHECKSUM_BITS) as u16;
    pos += CHECKSUM_BITS;
    let mut mask_ids = Vec::with_capacity(masks);
    for _ in 0..masks {
        mask_ids.push(stream.read_bits(pos, MASK_ID_BITS) as u8);
        pos += MASK_ID_BITS;
    }
    Ok(Header {
        version,
        payload_length,
        ec_length,
        checksum,
        masks: mask_ids,
    })
}
