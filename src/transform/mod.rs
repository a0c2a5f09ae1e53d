//! Stateless byte-slice transforms applied between the container and the
//! frame decoders: AES-CBC decryption, LZO1X-1 decompression, and
//! Zstandard decompression.
//!
//! Each primitive is a pure function allocating nothing beyond its output
//! buffer. The format tag dictates which transforms run and in what order.

pub(crate) mod aes;
pub(crate) mod lzo;
pub(crate) mod zstd;
