//! # Kinema Conf
//!
//! Settings that tune the response layer: which encodings are offered and
//! at what level, and how static files are read and cached.
//!
//! Settings are layered, lowest priority first:
//!
//! 1. Built-in defaults ([`ResponseSettings::default`])
//! 2. A TOML file ([`TomlFileSource`]); a missing file contributes nothing
//! 3. Environment variables ([`EnvSource`], prefix `KINEMA_`)
//!
//! ## Example
//!
//! ```
//! use kinema_conf::{ResponseSettings, SettingsBuilder};
//!
//! let settings = SettingsBuilder::new().build().unwrap();
//! assert_eq!(settings, ResponseSettings::default());
//! assert!(settings.compression.enabled);
//! ```

pub mod settings;
pub mod sources;

pub use settings::{CompressionSettings, ResponseSettings, StaticFileSettings};
pub use sources::{EnvSource, SettingsBuilder, SettingsError, SettingsSource, TomlFileSource};
