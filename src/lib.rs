//! Decoding of pixel-bean animation containers.
//!
//! Pixel-bean files are the binary animation containers served by a
//! pixel-display cloud gallery: a small self-describing header, a one-byte
//! format tag, and one of seven codec payloads mixing AES-CBC encryption,
//! LZO1X-1 and Zstandard compression, packed palette bitstreams on
//! hierarchical tile grids, and embedded JPEG/GIF/WebP images.
//!
//! Decoding always lands in the same canonical value: a [`PixelBean`]
//! holding an ordered list of RGB frames on a square canvas plus one
//! uniform per-frame delay. Two encoders turn that value back into
//! standard formats: a lossless animated WebP and an animated GIF.
//!
//! # Decoding
//!
//! ```rust,no_run
//! let payload: &[u8] = &[]; // container bytes
//! let bean = pixelbean::decode(payload)?;
//! println!(
//!     "{} frames, {}x{}, {} ms",
//!     bean.total_frames(),
//!     bean.width(),
//!     bean.height(),
//!     bean.speed_ms()
//! );
//! let first_frame: &[u8] = bean.frame(0).unwrap(); // RGB, row-major
//! # Ok::<(), pixelbean::DecodeError>(())
//! ```
//!
//! # Re-encoding
//!
//! ```rust,no_run
//! # let payload: &[u8] = &[];
//! let bean = pixelbean::decode(payload)?;
//! let webp = pixelbean::encode_webp(&bean).expect("webp");
//! let gif = pixelbean::encode_gif(&bean).expect("gif");
//! # Ok::<(), pixelbean::DecodeError>(())
//! ```
//!
//! A `decode` call is synchronous, performs no I/O, touches no global
//! state, and either returns a complete animation or a single
//! [`DecodeError`]; distinct inputs can be decoded from any number of
//! threads concurrently.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bean;
mod bitstream;
mod codec;
mod encoder;
mod error;
mod mux;
mod palette;
mod slice_reader;
mod transform;

pub use bean::PixelBean;
pub use codec::decode;
pub use encoder::{encode_gif, encode_webp};
pub use error::{DecodeError, EncodeError};
