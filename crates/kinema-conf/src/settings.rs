//! Typed response-layer settings.

use std::path::Path;
use std::time::Duration;

use kinema_compression::{CompressionConfig, Encoding};
use serde::{Deserialize, Serialize};

use crate::sources::{EnvSource, SettingsBuilder, SettingsError, TomlFileSource};

/// Default number of bytes read from a static file per body chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Root settings object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseSettings {
	pub compression: CompressionSettings,
	pub static_files: StaticFileSettings,
}

/// Response compression settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionSettings {
	/// Master switch; when off no response is compressed and no
	/// `Vary: Accept-Encoding` is emitted.
	pub enabled: bool,
	/// Offered encodings in server preference order.
	pub encodings: Vec<Encoding>,
	/// Gzip and deflate level (0-9).
	pub gzip_level: u32,
	/// Brotli quality (0-11).
	pub brotli_quality: u32,
}

impl Default for CompressionSettings {
	fn default() -> Self {
		let codec = CompressionConfig::default();
		Self {
			enabled: true,
			encodings: Encoding::ALL.to_vec(),
			gzip_level: codec.gzip_level,
			brotli_quality: codec.brotli_quality,
		}
	}
}

impl CompressionSettings {
	/// Encoder tuning derived from these settings.
	pub fn codec(&self) -> CompressionConfig {
		CompressionConfig::default()
			.with_gzip_level(self.gzip_level)
			.with_brotli_quality(self.brotli_quality)
	}
}

/// Static file serving settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFileSettings {
	/// Bytes per read when streaming a file.
	pub chunk_size: usize,
	/// Freshness applied to files served without an explicit one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_freshness_secs: Option<u64>,
	/// Whether single byte ranges are honored and `Accept-Ranges` advertised.
	pub accept_ranges: bool,
}

impl Default for StaticFileSettings {
	fn default() -> Self {
		Self {
			chunk_size: DEFAULT_CHUNK_SIZE,
			default_freshness_secs: None,
			accept_ranges: true,
		}
	}
}

impl StaticFileSettings {
	/// The default freshness as a duration.
	pub fn default_freshness(&self) -> Option<Duration> {
		self.default_freshness_secs.map(Duration::from_secs)
	}
}

impl ResponseSettings {
	/// Parses settings from TOML text over the defaults.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_conf::ResponseSettings;
	///
	/// let settings = ResponseSettings::from_toml_str(r#"
	/// [compression]
	/// encodings = ["gzip"]
	///
	/// [static_files]
	/// default_freshness_secs = 3600
	/// "#).unwrap();
	///
	/// assert_eq!(settings.compression.gzip_level, 6);
	/// assert_eq!(settings.static_files.default_freshness_secs, Some(3600));
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Loads defaults, then `path` if it exists, then `KINEMA_*` variables.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		SettingsBuilder::new()
			.add_source(TomlFileSource::new(path.as_ref()))
			.add_source(EnvSource::new())
			.build()
	}

	/// Checks value ranges.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.compression.gzip_level > 9 {
			return Err(SettingsError::Validation(format!(
				"compression.gzip_level must be 0-9, got {}",
				self.compression.gzip_level
			)));
		}
		if self.compression.brotli_quality > 11 {
			return Err(SettingsError::Validation(format!(
				"compression.brotli_quality must be 0-11, got {}",
				self.compression.brotli_quality
			)));
		}
		if self.static_files.chunk_size == 0 {
			return Err(SettingsError::Validation(
				"static_files.chunk_size must be greater than zero".to_string(),
			));
		}
		Ok(())
	}
}
