//! Assembly of animated WebP containers from encoded frame bitstreams.

mod assemble;

pub(crate) use assemble::{MuxFrame, Muxer};
