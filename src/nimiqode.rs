//! Encode and decode orchestration.
//!
//! The engine owns the whole layout problem: how many rings a payload
//! needs, where the header and the payload+parity region sit inside the
//! bit-stream, which rings get masked and in what order, and how the
//! checksum and Reed-Solomon codec are driven on both sides. A
//! [`Nimiqode`] is ephemeral: constructed by one of the two pipelines,
//! then read-only.

use crate::bit_buffer::BitBuffer;
use crate::checksum::payload_checksum;
use crate::error::NimiqodeError;
use crate::header::{self, header_length, mask_count, MAX_EC_BITS, MAX_PAYLOAD_BITS};
use crate::ring::Ring;
use crate::{fec, mask, MAX_EC_FACTOR, MIN_RINGS, VERSION};

/// A fully constructed nimiqode: the payload and the ring set carrying
/// its physical bit data.
#[derive(Debug, Clone)]
pub struct Nimiqode {
    payload: Vec<u8>,
    rings: Vec<Ring>,
}

impl Nimiqode {
    /// Encode `payload` into a populated ring set.
    ///
    /// `ec_factor` sizes the preliminary parity budget relative to the
    /// payload; leftover ring capacity is folded into the parity region
    /// on top of that. `version` must be the single supported
    /// [`VERSION`].
    pub fn encode(payload: &[u8], ec_factor: f64, version: u8) -> Result<Self, NimiqodeError> {
        if payload.is_empty() {
            return Err(NimiqodeError::InvalidArgument(
                "payload must not be empty".into(),
            ));
        }
        if version != VERSION {
            return Err(NimiqodeError::InvalidArgument(format!(
                "cannot encode version {version}, only version {VERSION} is supported"
            )));
        }
        if !ec_factor.is_finite() || !(0.0..=MAX_EC_FACTOR).contains(&ec_factor) {
            return Err(NimiqodeError::InvalidArgument(format!(
                "error correction factor {ec_factor} outside [0, {MAX_EC_FACTOR}]"
            )));
        }
        let payload_bits = payload.len() * 8;
        if payload_bits > MAX_PAYLOAD_BITS {
            return Err(NimiqodeError::PayloadTooLarge {
                bits: payload_bits,
                max: MAX_PAYLOAD_BITS,
            });
        }

        let checksum = payload_checksum(payload);
        let preliminary_ec_bits = (payload_bits as f64 * ec_factor).ceil() as usize;
        let (mut rings, total_bits) = size_rings(payload_bits, preliminary_ec_bits);
        let header_bits = header_length(mask_count(rings.len()));

        // Whatever ring capacity exceeds the requested total becomes
        // extra parity, never padding.
        let ec_bits = total_bits - header_bits - payload_bits;
        if ec_bits > MAX_EC_BITS {
            return Err(NimiqodeError::Header(format!(
                "error correction length {ec_bits} overflows the header field"
            )));
        }

        let mut stream = BitBuffer::new(total_bits);
        let codeword = fec::encode(payload, ec_bits);
        stream.write_bytes(header_bits, &codeword);

        // Encode-side masking works on the shared stream in place; the
        // region was freshly allocated and nothing else aliases it.
        let masks = select_masks(&mut stream, header_bits, total_bits, &rings)?;
        header::write_header(&mut stream, version, payload_bits, ec_bits, checksum, &masks)?;
        assign_ring_data(&mut rings, &stream)?;

        Ok(Self {
            payload: payload.to_vec(),
            rings,
        })
    }

    /// Decode a scanned ring set back into its payload.
    ///
    /// The rings must already carry their scanned bit data; acquisition
    /// is not this crate's concern. Every failure is terminal for this
    /// attempt. A caller retrying with a different ring-count
    /// hypothesis simply calls again with a different ring set.
    pub fn decode(rings: Vec<Ring>) -> Result<Self, NimiqodeError> {
        if rings.len() < MIN_RINGS {
            return Err(NimiqodeError::InvalidArgument(format!(
                "a nimiqode has at least {MIN_RINGS} rings, got {}",
                rings.len()
            )));
        }
        let stream = reassemble_stream(&rings)?;
        let total_bits = stream.len();
        let header_bits = header_length(mask_count(rings.len()));

        let header = header::read_header(&stream, &rings)?;
        if header.version != VERSION {
            return Err(NimiqodeError::UnsupportedVersion(header.version));
        }
        let declared = header_bits + header.payload_length + header.ec_length;
        if declared != total_bits {
            return Err(NimiqodeError::LengthMismatch {
                declared,
                observed: total_bits,
            });
        }
        if header.payload_length == 0 || header.payload_length % 8 != 0 {
            return Err(NimiqodeError::Header(format!(
                "payload length {} is not a positive whole number of bytes",
                header.payload_length
            )));
        }

        // Unmask an independent snapshot; the caller's ring buffers and
        // the reassembled stream stay untouched.
        let mut region = stream.copy_range(header_bits, total_bits);
        let region_bits = region.len();
        apply_masks(&mut region, 0, region_bits, &rings, &header.masks)?;

        let payload_len = header.payload_length / 8;
        let nsym = fec::parity_len(payload_len, header.ec_length);
        let mut codeword = region.read_bytes(0, payload_len + nsym);
        fec::decode(&mut codeword, nsym)?;
        codeword.truncate(payload_len);
        let payload = codeword;

        let computed = payload_checksum(&payload);
        if computed != header.checksum {
            return Err(NimiqodeError::ChecksumMismatch {
                stored: header.checksum,
                computed,
            });
        }

        Ok(Self { payload, rings })
    }

    /// The payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The ring set, each ring carrying its share of the bit-stream.
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }
}

/// Grow the ring set until it can carry header, payload and the
/// preliminary parity budget.
///
/// The required total depends on the header length, which depends on
/// the mask count, which depends on the ring count; the loop resolves
/// that cycle as a monotone fixpoint search. Termination: each added
/// ring grows capacity by at least the innermost ring's slot count
/// while the target only grows by one mask id width, so capacity
/// overtakes the target after finitely many rings.
fn size_rings(payload_bits: usize, preliminary_ec_bits: usize) -> (Vec<Ring>, usize) {
    let mut rings: Vec<Ring> = Vec::new();
    let mut capacity = 0usize;
    loop {
        let ring = Ring::new(rings.len());
        capacity += ring.capacity();
        rings.push(ring);
        let target =
            header_length(mask_count(rings.len())) + payload_bits + preliminary_ec_bits;
        if rings.len() >= MIN_RINGS && capacity >= target {
            return (rings, capacity);
        }
    }
}

/// Concatenate the scanned ring data, in ring order, into one stream.
fn reassemble_stream(rings: &[Ring]) -> Result<BitBuffer, NimiqodeError> {
    let total: usize = rings.iter().map(Ring::capacity).sum();
    let mut stream = BitBuffer::new(total);
    let mut pos = 0;
    for ring in rings {
        let data = ring.data().ok_or_else(|| {
            NimiqodeError::InvalidArgument(format!("ring {} carries no scanned data", ring.index()))
        })?;
        if data.len() != ring.capacity() {
            return Err(NimiqodeError::InvalidArgument(format!(
                "ring {} holds {} bits but has capacity {}",
                ring.index(),
                data.len(),
                ring.capacity()
            )));
        }
        stream.write_range(pos, data);
        pos += ring.capacity();
    }
    Ok(stream)
}

/// Slice the stream into consecutive per-ring sub-ranges and attach
/// them. Concatenating the slices in ring order gives back the stream
/// bit for bit.
fn assign_ring_data(rings: &mut [Ring], stream: &BitBuffer) -> Result<(), NimiqodeError> {
    let total: usize = rings.iter().map(Ring::capacity).sum();
    if total != stream.len() {
        return Err(NimiqodeError::Internal(format!(
            "ring capacities sum to {total} but the stream holds {} bits",
            stream.len()
        )));
    }
    let mut pos = 0;
    for ring in rings.iter_mut() {
        let end = pos + ring.capacity();
        ring.attach(stream.copy_range(pos, end));
        pos = end;
    }
    Ok(())
}

/// Bit bounds of each masked ring's share of the payload+parity region
/// `[region_start, region_end)`, computed once and walked outermost
/// ring first. The same bounds drive masking and unmasking.
fn mask_chunks(
    rings: &[Ring],
    region_start: usize,
    region_end: usize,
) -> Result<Vec<(usize, usize, usize)>, NimiqodeError> {
    let masked = mask_count(rings.len());
    let first_masked = rings.len() - masked;
    let mut chunks = Vec::with_capacity(masked);
    let mut offset = region_end;
    for ring_index in (first_masked..rings.len()).rev() {
        let cap = rings[ring_index].capacity();
        if offset < region_start + cap {
            return Err(NimiqodeError::Internal(
                "mask window extends past the start of the payload region".into(),
            ));
        }
        chunks.push((ring_index, offset - cap, offset));
        offset -= cap;
    }
    Ok(chunks)
}

/// Pick and apply the best mask per masked ring (encode side). Returns
/// the mask ids in header order, innermost masked ring first.
fn select_masks(
    stream: &mut BitBuffer,
    region_start: usize,
    region_end: usize,
    rings: &[Ring],
) -> Result<Vec<u8>, NimiqodeError> {
    let first_masked = rings.len() - mask_count(rings.len());
    let mut masks = vec![0u8; mask_count(rings.len())];
    for (ring_index, start, end) in mask_chunks(rings, region_start, region_end)? {
        let id = mask::find_best_mask(stream, start, end);
        mask::apply_mask(stream, start, end, id);
        masks[ring_index - first_masked] = id;
    }
    Ok(masks)
}

/// Re-apply stored mask ids (decode side). XOR masks are self-inverse,
/// so the identical walk undoes encode's masking.
fn apply_masks(
    region: &mut BitBuffer,
    region_start: usize,
    region_end: usize,
    rings: &[Ring],
    masks: &[u8],
) -> Result<(), NimiqodeError> {
    if masks.len() != mask_count(rings.len()) {
        return Err(NimiqodeError::Internal(format!(
            "{} mask ids for {} masked rings",
            masks.len(),
            mask_count(rings.len())
        )));
    }
    let first_masked = rings.len() - masks.len();
    for (ring_index, start, end) in mask_chunks(rings, region_start, region_end)? {
        mask::apply_mask(region, start, end, masks[ring_index - first_masked]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::bit_capacity;

    #[test]
    fn sizing_reaches_fixpoint() {
        // 16 byte payload at factor 0.5: two rings carry 240 bits, the
        // target of 42 + 128 + 64 = 234 is met on the second ring.
        let (rings, total) = size_rings(128, 64);
        assert_eq!(rings.len(), 2);
        assert_eq!(total, bit_capacity(0) + bit_capacity(1));
        let target = header_length(mask_count(rings.len())) + 128 + 64;
        assert!(total >= target);
    }

    #[test]
    fn sizing_never_returns_a_single_ring() {
        let (rings, _) = size_rings(8, 0);
        assert!(rings.len() >= MIN_RINGS);
    }

    #[test]
    fn sizing_capacity_meets_target_exactly_or_above() {
        for payload_bits in [8usize, 64, 256, 640, 1016] {
            for ec_bits in [0usize, 100, 500, 1000] {
                let (rings, total) = size_rings(payload_bits, ec_bits);
                let target =
                    header_length(mask_count(rings.len())) + payload_bits + ec_bits;
                assert!(total >= target);
                // Minimality: dropping the outermost ring must fall
                // short (unless the ring-minimum forced it).
                if rings.len() > MIN_RINGS {
                    let shorter_total = total - rings.last().unwrap().capacity();
                    let shorter_target =
                        header_length(mask_count(rings.len() - 1)) + payload_bits + ec_bits;
                    assert!(shorter_total < shorter_target);
                }
            }
        }
    }

    #[test]
    fn mask_chunks_cover_trailing_window_without_overlap() {
        let rings: Vec<Ring> = (0..4).map(Ring::new).collect();
        let total: usize = rings.iter().map(Ring::capacity).sum();
        let region_start = header_length(mask_count(rings.len()));
        let chunks = mask_chunks(&rings, region_start, total).unwrap();
        assert_eq!(chunks.len(), 3);
        // Outermost first, each chunk abutting the previous one.
        let mut expected_end = total;
        for &(ring_index, start, end) in &chunks {
            assert_eq!(end, expected_end);
            assert_eq!(end - start, rings[ring_index].capacity());
            expected_end = start;
        }
        assert!(expected_end >= region_start);
    }
}
