//! Per-call response options.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};
use kinema_cache::{CacheKey, CacheParams};

use crate::producer::Producer;

/// Options for a lazily produced response.
///
/// # Examples
///
/// ```
/// use kinema_cache::CacheKey;
/// use kinema_response::ResultOptions;
/// use std::time::Duration;
///
/// let options = ResultOptions::new("application/json")
///     .with_key(CacheKey::from_seed("/Items/42").unwrap())
///     .with_freshness(Duration::from_secs(300))
///     .with_header("X-Response-Source", "library")
///     .with_producer(|| async { Ok::<_, kinema_http::Error>("{}") });
///
/// assert!(options.has_producer());
/// ```
pub struct ResultOptions {
	pub content_type: String,
	pub cache: CacheParams,
	/// Extra headers applied before the cache headers.
	pub response_headers: HeaderMap,
	pub(crate) producer: Option<Box<dyn Producer>>,
}

impl ResultOptions {
	pub fn new(content_type: impl Into<String>) -> Self {
		Self {
			content_type: content_type.into(),
			cache: CacheParams::new(),
			response_headers: HeaderMap::new(),
			producer: None,
		}
	}

	pub fn with_key(mut self, key: CacheKey) -> Self {
		self.cache.key = Some(key);
		self
	}

	pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
		self.cache.last_modified = Some(last_modified);
		self
	}

	pub fn with_freshness(mut self, freshness: Duration) -> Self {
		self.cache.freshness = Some(freshness);
		self
	}

	/// Replaces all caching parameters at once.
	pub fn with_cache(mut self, cache: CacheParams) -> Self {
		self.cache = cache;
		self
	}

	/// Adds a custom response header; invalid names or values are skipped.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		insert_header(&mut self.response_headers, name, value);
		self
	}

	pub fn with_producer(mut self, producer: impl Producer) -> Self {
		self.producer = Some(Box::new(producer));
		self
	}

	pub fn has_producer(&self) -> bool {
		self.producer.is_some()
	}
}

impl fmt::Debug for ResultOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResultOptions")
			.field("content_type", &self.content_type)
			.field("cache", &self.cache)
			.field("response_headers", &self.response_headers)
			.field("producer", &self.producer.as_ref().map(|_| ".."))
			.finish()
	}
}

/// Options for serving a file from disk.
///
/// Anything left unset is derived from the file: content type from the
/// extension, modification time and key from its metadata, freshness from
/// settings.
#[derive(Debug, Clone)]
pub struct StaticFileOptions {
	pub path: PathBuf,
	pub content_type: Option<String>,
	pub key: Option<CacheKey>,
	pub last_modified: Option<DateTime<Utc>>,
	pub freshness: Option<Duration>,
	pub response_headers: HeaderMap,
}

impl StaticFileOptions {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			content_type: None,
			key: None,
			last_modified: None,
			freshness: None,
			response_headers: HeaderMap::new(),
		}
	}

	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn with_key(mut self, key: CacheKey) -> Self {
		self.key = Some(key);
		self
	}

	pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
		self.last_modified = Some(last_modified);
		self
	}

	pub fn with_freshness(mut self, freshness: Duration) -> Self {
		self.freshness = Some(freshness);
		self
	}

	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		insert_header(&mut self.response_headers, name, value);
		self
	}
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
	match (
		HeaderName::from_bytes(name.as_bytes()),
		HeaderValue::from_str(value),
	) {
		(Ok(name), Ok(value)) => {
			headers.append(name, value);
		}
		_ => tracing::debug!(header = name, "skipping invalid custom response header"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_invalid_headers_are_skipped() {
		let options = ResultOptions::new("text/plain")
			.with_header("X-Good", "yes")
			.with_header("bad header", "x")
			.with_header("X-Bad-Value", "line\nbreak");

		assert_eq!(options.response_headers.len(), 1);
		assert_eq!(options.response_headers["x-good"], "yes");
	}

	#[rstest]
	fn test_builder_fills_cache_params() {
		let key = CacheKey::from_seed("/Items/1").unwrap();
		let options = ResultOptions::new("application/json")
			.with_key(key)
			.with_freshness(Duration::from_secs(5));

		assert_eq!(options.cache.key, Some(key));
		assert_eq!(options.cache.freshness, Some(Duration::from_secs(5)));
		assert!(!options.has_producer());
	}

	#[rstest]
	fn test_static_options_defaults() {
		let options = StaticFileOptions::new("/media/a.mp4");
		assert!(options.content_type.is_none());
		assert!(options.key.is_none());
		assert!(options.response_headers.is_empty());
	}
}
