//! JSON ring dump, the CLI stand-in for rendering and scanning.
//!
//! Image acquisition and visual rendering sit outside this crate, so
//! the binaries exchange ring contents as a `.nmq` JSON document: one
//! entry per ring with its capacity and hex-packed bit data.

use serde::{Deserialize, Serialize};

use crate::bit_buffer::BitBuffer;
use crate::error::NimiqodeError;
use crate::ring::Ring;

/// One ring's scanned or rendered bits.
#[derive(Debug, Serialize, Deserialize)]
pub struct RingDump {
    pub capacity: usize,
    /// Packed bits, MSB-first, hex encoded.
    pub bits: String,
}

/// A complete ring dump.
#[derive(Debug, Serialize, Deserialize)]
pub struct NimiqodeDump {
    pub rings: Vec<RingDump>,
}

impl NimiqodeDump {
    /// Capture a populated ring set.
    pub fn from_rings(rings: &[Ring]) -> Result<Self, NimiqodeError> {
        let mut out = Vec::with_capacity(rings.len());
        for ring in rings {
            let data = ring.data().ok_or_else(|| {
                NimiqodeError::Internal(format!("ring {} has no data to dump", ring.index()))
            })?;
            out.push(RingDump {
                capacity: data.len(),
                bits: hex::encode(data.to_bytes()),
            });
        }
        Ok(Self { rings: out })
    }

    /// Rebuild a ring set for decoding.
    pub fn into_rings(self) -> Result<Vec<Ring>, NimiqodeError> {
        let mut rings = Vec::with_capacity(self.rings.len());
        for (index, ring) in self.rings.into_iter().enumerate() {
            let bytes = hex::decode(&ring.bits)
                .map_err(|e| NimiqodeError::InvalidArgument(format!("ring {index}: {e}")))?;
            if bytes.len() != (ring.capacity + 7) / 8 {
                return Err(NimiqodeError::InvalidArgument(format!(
                    "ring {index}: {} bytes cannot hold {} bits",
                    bytes.len(),
                    ring.capacity
                )));
            }
            let data = BitBuffer::from_bytes(&bytes).copy_range(0, ring.capacity);
            rings.push(Ring::with_data(index, data));
        }
        Ok(rings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Nimiqode;

    #[test]
    fn dump_roundtrip_preserves_ring_bits() {
        let code = Nimiqode::encode(b"ring dump test", 0.25, 0).unwrap();
        let dump = NimiqodeDump::from_rings(code.rings()).unwrap();
        let json = serde_json::to_string(&dump).unwrap();
        let parsed: NimiqodeDump = serde_json::from_str(&json).unwrap();
        let rings = parsed.into_rings().unwrap();
        assert_eq!(rings.len(), code.rings().len());
        for (a, b) in rings.iter().zip(code.rings()) {
            assert_eq!(a.data().unwrap(), b.data().unwrap());
        }
    }
}
