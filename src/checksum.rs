use sha2::{Digest, Sha256};

/// Compute the 16-bit truncated SHA-256 checksum of the payload bytes.
///
/// The header stores this value so decode can tell a miscorrected
/// payload from the real one after error correction has run.
pub fn payload_checksum(data: &[u8]) -> u16 {
    let digest = Sha256::digest(data);
    let arr: [u8; 32] = digest.into();
    ((arr[30] as u16) << 8) | arr[31] as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(payload_checksum(b"nimiqode"), payload_checksum(b"nimiqode"));
    }

    #[test]
    fn sensitive_to_single_byte() {
        let a = payload_checksum(&[0u8; 16]);
        let mut data = [0u8; 16];
        data[7] = 1;
        assert_ne!(a, payload_checksum(&data));
    }
}
