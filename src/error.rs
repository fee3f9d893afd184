use thiserror::Error;

use crate::fec::FecError;

/// Failure modes of nimiqode encoding and decoding.
///
/// Every variant is terminal for the current encode or decode attempt.
/// Nothing is retried internally; callers that want to retry a decode
/// with a different ring-count hypothesis drive that loop themselves.
#[derive(Error, Debug)]
pub enum NimiqodeError {
    /// Malformed encode input: empty payload, out-of-range error
    /// correction factor or unsupported version.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Payload bit length exceeds the header's payload length field.
    #[error("payload of {bits} bits exceeds the maximum of {max}")]
    PayloadTooLarge { bits: usize, max: usize },

    /// Scanned header declares a version this implementation does not
    /// understand.
    #[error("unsupported version {0}")]
    UnsupportedVersion(u8),

    /// Header-declared lengths do not sum to the observed bit-stream
    /// length. Usually means the wrong number of rings was recognized
    /// during acquisition.
    #[error("declared length {declared} does not match observed bit-stream length {observed}")]
    LengthMismatch { declared: usize, observed: usize },

    /// The error correction budget was exhausted; the payload is
    /// unrecoverable.
    #[error("error correction failed: {0}")]
    FecDecodeFailure(#[from] FecError),

    /// Payload recovered but corrupted beyond what the error correction
    /// could detect.
    #[error("checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { stored: u16, computed: u16 },

    /// Malformed or overflowing header field.
    #[error("header error: {0}")]
    Header(String),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch all for unexpected internal problems.
    #[error("internal error: {0}")]
    Internal(String),
}
