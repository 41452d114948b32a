//! The response factory, payload producers and static file serving.

pub use kinema_response::*;
