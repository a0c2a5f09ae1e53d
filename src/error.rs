//! Error types for container decoding and animation encoding.

use thiserror::Error;

/// Errors that can occur while decoding a pixel-bean container.
///
/// Every error is fatal to the `decode` call that produced it: no partial
/// animation is ever returned, and nothing is retried internally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The container declares more payload bytes than the input holds.
    #[error("declared payload length {declared} exceeds the {available} available bytes")]
    TruncatedHeader {
        /// Payload length declared by the 4-byte big-endian prefix.
        declared: usize,
        /// Bytes actually present after the prefix.
        available: usize,
    },

    /// The one-byte format tag is not one of the seven known codecs.
    #[error("unsupported format tag {0}")]
    UnsupportedFormat(u8),

    /// AES-CBC ciphertext length is not a multiple of the 16-byte block size.
    #[error("AES-CBC input of {0} bytes is not a multiple of 16")]
    CryptoAlignment(usize),

    /// LZO1X-1 output did not match the expected length, or the compressed
    /// stream itself was corrupt (bad match distance, input overrun).
    #[error("LZO output length mismatch: expected {expected} bytes, got {actual}")]
    LzoLength {
        /// Uncompressed length declared by the container.
        expected: usize,
        /// Bytes actually produced before the stream ended or went bad.
        actual: usize,
    },

    /// The Zstandard stream was malformed.
    #[error("zstd decode failed: {0}")]
    ZstdDecodeFailed(String),

    /// A tile-grid frame carried an invalid block tree.
    #[error("malformed tile tree: {0}")]
    MalformedTree(String),

    /// The frame stream ended with leftover bytes that are too many to be
    /// trailing padding but too few to hold another frame header.
    #[error("bit reader advanced more than one byte past the plaintext end")]
    BitstreamOverrun,

    /// A frame header declares a size extending more than one byte past the
    /// end of the plaintext.
    #[error("frame of {declared} bytes exceeds the {remaining} remaining plaintext bytes")]
    TruncatedFrame {
        /// Frame size declared by the header.
        declared: usize,
        /// Plaintext bytes remaining at the frame start.
        remaining: usize,
    },

    /// Embedded images within one container do not share dimensions.
    #[error("embedded frame is {got_w}x{got_h}, expected {want_w}x{want_h}")]
    DimensionMismatch {
        /// Width established by the first frame.
        want_w: u32,
        /// Height established by the first frame.
        want_h: u32,
        /// Width of the offending frame.
        got_w: u32,
        /// Height of the offending frame.
        got_h: u32,
    },

    /// An embedded JPEG/GIF/WebP payload failed to decode.
    #[error("embedded image decode failed: {0}")]
    EmbeddedDecode(String),

    /// A decoder postcondition did not hold. Seeing this on a well-formed
    /// container indicates a bug in this crate.
    #[error("decoder invariant violated: {0}")]
    InvariantViolation(String),
}

/// Errors that can occur while encoding a decoded animation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// The GIF writer rejected the stream.
    #[error("GIF encoding failed: {0}")]
    Gif(String),

    /// Frame dimensions exceed what the output container can express.
    #[error("invalid output dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Canvas width.
        width: u32,
        /// Canvas height.
        height: u32,
    },
}
