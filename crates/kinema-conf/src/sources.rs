//! Settings sources layered over the defaults
//!
//! Each source patches the settings produced by the layers below it.
//! [`SettingsBuilder`] applies sources in insertion order and validates the
//! result once at the end.

use std::fs;
use std::path::PathBuf;

use kinema_compression::Encoding;

use crate::settings::ResponseSettings;

/// Error type for settings loading
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("TOML serialization error: {0}")]
	TomlSerialize(#[from] toml::ser::Error),

	#[error("Invalid value for {key}: {value:?}")]
	InvalidValue { key: String, value: String },

	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<SettingsError> for kinema_http::Error {
	fn from(err: SettingsError) -> Self {
		kinema_http::Error::InvalidArgument(err.to_string())
	}
}

/// A layer of settings
pub trait SettingsSource: Send + Sync {
	/// Applies this source on top of `settings`.
	fn apply(&self, settings: &mut ResponseSettings) -> Result<(), SettingsError>;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Builds [`ResponseSettings`] from layered sources.
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn SettingsSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a source above those already added.
	pub fn add_source(mut self, source: impl SettingsSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Applies every source over the defaults and validates the result.
	pub fn build(self) -> Result<ResponseSettings, SettingsError> {
		let mut settings = ResponseSettings::default();
		for source in &self.sources {
			tracing::debug!(source = %source.description(), "applying settings source");
			source.apply(&mut settings)?;
		}
		settings.validate()?;
		Ok(settings)
	}
}

/// TOML file settings source
///
/// Keys present in the file replace the corresponding values; everything
/// else is left as the lower layers set it.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Create a new TOML file settings source
	///
	/// # Examples
	///
	/// ```
	/// use kinema_conf::TomlFileSource;
	///
	/// let source = TomlFileSource::new("kinema.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl SettingsSource for TomlFileSource {
	fn apply(&self, settings: &mut ResponseSettings) -> Result<(), SettingsError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "settings file not found, skipping");
			return Ok(());
		}

		let content = fs::read_to_string(&self.path)?;
		let overlay: toml::Table = toml::from_str(&content)?;

		let toml::Value::Table(mut base) = toml::Value::try_from(&*settings)? else {
			return Err(SettingsError::Validation(
				"settings did not serialize to a table".to_string(),
			));
		};
		merge_tables(&mut base, overlay);
		*settings = toml::Value::Table(base).try_into()?;
		Ok(())
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
	for (key, value) in overlay {
		match (base.get_mut(&key), value) {
			(Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
				merge_tables(base_table, overlay_table);
			}
			(_, value) => {
				base.insert(key, value);
			}
		}
	}
}

/// Environment variable settings source
///
/// Recognized variables, shown with the default `KINEMA_` prefix:
///
/// | variable | setting |
/// |----------|---------|
/// | `KINEMA_COMPRESSION_ENABLED` | `compression.enabled` |
/// | `KINEMA_COMPRESSION_ENCODINGS` | `compression.encodings` (comma-separated) |
/// | `KINEMA_COMPRESSION_GZIP_LEVEL` | `compression.gzip_level` |
/// | `KINEMA_COMPRESSION_BROTLI_QUALITY` | `compression.brotli_quality` |
/// | `KINEMA_STATIC_CHUNK_SIZE` | `static_files.chunk_size` |
/// | `KINEMA_STATIC_DEFAULT_FRESHNESS_SECS` | `static_files.default_freshness_secs` (empty clears) |
/// | `KINEMA_STATIC_ACCEPT_RANGES` | `static_files.accept_ranges` |
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	/// Create a new environment variable source with the `KINEMA_` prefix
	pub fn new() -> Self {
		Self {
			prefix: "KINEMA_".to_string(),
		}
	}

	/// Set the environment variable prefix
	///
	/// # Examples
	///
	/// ```
	/// use kinema_conf::EnvSource;
	///
	/// let source = EnvSource::new().with_prefix("MEDIA_");
	/// ```
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	fn var(&self, name: &str) -> Option<(String, String)> {
		let key = format!("{}{}", self.prefix, name);
		std::env::var(&key).ok().map(|value| (key, value))
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl SettingsSource for EnvSource {
	fn apply(&self, settings: &mut ResponseSettings) -> Result<(), SettingsError> {
		if let Some((key, value)) = self.var("COMPRESSION_ENABLED") {
			settings.compression.enabled = parse_bool(&key, &value)?;
		}
		if let Some((key, value)) = self.var("COMPRESSION_ENCODINGS") {
			settings.compression.encodings = parse_encodings(&key, &value)?;
		}
		if let Some((key, value)) = self.var("COMPRESSION_GZIP_LEVEL") {
			settings.compression.gzip_level = parse_number(&key, &value)?;
		}
		if let Some((key, value)) = self.var("COMPRESSION_BROTLI_QUALITY") {
			settings.compression.brotli_quality = parse_number(&key, &value)?;
		}
		if let Some((key, value)) = self.var("STATIC_CHUNK_SIZE") {
			settings.static_files.chunk_size = parse_number(&key, &value)?;
		}
		if let Some((key, value)) = self.var("STATIC_DEFAULT_FRESHNESS_SECS") {
			settings.static_files.default_freshness_secs = if value.trim().is_empty() {
				None
			} else {
				Some(parse_number(&key, &value)?)
			};
		}
		if let Some((key, value)) = self.var("STATIC_ACCEPT_RANGES") {
			settings.static_files.accept_ranges = parse_bool(&key, &value)?;
		}
		Ok(())
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

fn invalid(key: &str, value: &str) -> SettingsError {
	SettingsError::InvalidValue {
		key: key.to_string(),
		value: value.to_string(),
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(invalid(key, value)),
	}
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
	value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_encodings(key: &str, value: &str) -> Result<Vec<Encoding>, SettingsError> {
	let mut encodings = Vec::new();
	for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
		let encoding = Encoding::from_token(token).ok_or_else(|| invalid(key, value))?;
		if !encodings.contains(&encoding) {
			encodings.push(encoding);
		}
	}
	Ok(encodings)
}
