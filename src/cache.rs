//! Validator keys, conditional evaluation and cache header synthesis.

pub use kinema_cache::*;
