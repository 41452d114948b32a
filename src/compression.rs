//! Compression eligibility, negotiation and codecs.

pub use kinema_compression::*;
