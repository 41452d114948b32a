//! Layered response settings.
//!
//! ```
//! use kinema::conf::ResponseSettings;
//!
//! let settings = ResponseSettings::from_toml_str("[compression]\nenabled = false").unwrap();
//! assert!(!settings.compression.enabled);
//! ```

pub use kinema_conf::*;
