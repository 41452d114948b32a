//! The response factory
//!
//! Turns an endpoint's caching intent and deferred payload into a complete
//! [`Response`]. For every call the order is fixed:
//!
//! 1. validate arguments
//! 2. apply custom headers, then cache headers
//! 3. decide compression eligibility and advertise `Vary`
//! 4. evaluate conditionals; a match returns 304 without producing
//! 5. negotiate the encoding; HEAD stops here with the GET headers
//! 6. produce, then compress or stream

use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use http::HeaderMap;
use http::header::{
	ACCEPT_RANGES, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_RANGE, HeaderValue, VARY,
};
use kinema_cache::{CacheParams, ConditionalRequest, evaluate_at, write_cache_headers_at};
use kinema_compression::{Encoding, select_encoding, should_compress};
use kinema_conf::ResponseSettings;
use kinema_http::{Body, Error, RequestHead, Response, Result};

use crate::options::{ResultOptions, StaticFileOptions};
use crate::producer::Payload;
use crate::range::{ByteRange, content_range, unsatisfied_range};
use crate::static_file::{FileMetadata, chunked, open_at, read_all};

/// Builds cached, conditional and compressed responses.
///
/// Holds only immutable settings, so one instance can be shared across
/// every request handler.
///
/// # Examples
///
/// ```
/// use kinema_cache::CacheKey;
/// use kinema_http::{RequestHead, StatusCode};
/// use kinema_response::{ResponseFactory, ResultOptions};
///
/// # tokio_test::block_on(async {
/// let factory = ResponseFactory::default();
/// let key = CacheKey::from_seed("/Users/1/Items").unwrap();
///
/// let options = ResultOptions::new("application/json")
///     .with_key(key)
///     .with_producer(|| async { Ok::<_, kinema_http::Error>("[]") });
///
/// let response = factory.serve(&RequestHead::get(), options).await.unwrap();
/// assert_eq!(response.status, StatusCode::OK);
/// assert_eq!(response.headers["etag"], key.to_hex().as_str());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseFactory {
	settings: ResponseSettings,
}

impl ResponseFactory {
	pub fn new(settings: ResponseSettings) -> Self {
		Self { settings }
	}

	/// Serves a lazily produced payload.
	///
	/// # Errors
	///
	/// [`Error::InvalidArgument`] for a nil key or a missing producer,
	/// before any header is written. Producer and compression failures are
	/// passed through.
	pub async fn serve(&self, request: &RequestHead, options: ResultOptions) -> Result<Response> {
		let ResultOptions {
			content_type,
			cache,
			response_headers,
			producer,
		} = options;

		cache.validate()?;
		let producer =
			producer.ok_or_else(|| Error::invalid_argument("a payload producer is required"))?;

		let compressible = self.is_compressible(&content_type, request);
		let mut response = self.start_response(&content_type, response_headers, &cache, compressible);
		if let Some(not_modified) = Self::check_conditional(request, &cache, &mut response) {
			return Ok(not_modified);
		}

		let encoding = self.negotiate(request, compressible, &mut response);
		if request.is_head() {
			return Ok(response);
		}

		let payload = producer.produce().await?;

		if let Some(encoding) = encoding {
			let body = Body::from(payload).into_bytes().await?;
			return self.compressed(response, &body, encoding);
		}

		match payload {
			Payload::Bytes(bytes) => {
				response.headers.insert(CONTENT_LENGTH, HeaderValue::from(bytes.len()));
				response.body = Body::Full(bytes);
			}
			Payload::Stream(stream) => response.body = Body::Stream(stream),
		}
		Ok(response)
	}

	/// Serves a file from disk.
	///
	/// Unset options are derived from the file; see [`StaticFileOptions`].
	/// A single byte range yields 206, or 416 when it cannot be satisfied.
	///
	/// # Errors
	///
	/// [`Error::ResourceUnavailable`] when the file is missing, is a
	/// directory, or cannot be opened. [`Error::InvalidArgument`] for a nil
	/// key.
	pub async fn serve_file(
		&self,
		request: &RequestHead,
		options: StaticFileOptions,
	) -> Result<Response> {
		let metadata = FileMetadata::from_path(&options.path).await.inspect_err(|e| {
			tracing::warn!(path = %options.path.display(), error = %e, "static file unavailable");
		})?;

		let key = match options.key {
			Some(key) => key,
			None => metadata.derive_key()?,
		};
		let cache = CacheParams {
			key: Some(key),
			last_modified: options.last_modified.or(metadata.modified),
			freshness: options.freshness.or_else(|| self.default_freshness()),
		};
		cache.validate()?;

		let content_type = options.content_type.unwrap_or_else(|| metadata.mime_type.clone());
		let compressible = self.is_compressible(&content_type, request);
		let mut response =
			self.start_response(&content_type, options.response_headers, &cache, compressible);

		let accept_ranges = self.settings.static_files.accept_ranges;
		if accept_ranges {
			response
				.headers
				.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
		}

		if let Some(not_modified) = Self::check_conditional(request, &cache, &mut response) {
			return Ok(not_modified);
		}

		let size = metadata.size;
		let range = accept_ranges
			.then(|| request.range().and_then(ByteRange::parse))
			.flatten();

		let (offset, length) = match range.map(|range| range.resolve(size)) {
			Some(Some((first, last))) => {
				response.status = http::StatusCode::PARTIAL_CONTENT;
				insert_str(&mut response.headers, CONTENT_RANGE, &content_range(first, last, size));
				(first, last - first + 1)
			}
			Some(None) => {
				tracing::debug!(path = %metadata.path.display(), size, "range not satisfiable");
				response.status = http::StatusCode::RANGE_NOT_SATISFIABLE;
				insert_str(&mut response.headers, CONTENT_RANGE, &unsatisfied_range(size));
				response.headers.insert(CONTENT_LENGTH, HeaderValue::from(0u64));
				return Ok(response);
			}
			None => (0, size),
		};

		if let Some(encoding) = self.negotiate(request, compressible, &mut response) {
			if request.is_head() {
				return Ok(response);
			}
			let file = open_at(&metadata.path, offset).await?;
			let body = read_all(file, length).await?;
			return self.compressed(response, &body, encoding);
		}

		response.headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
		if request.is_head() {
			return Ok(response);
		}

		let file = open_at(&metadata.path, offset).await.inspect_err(|e| {
			tracing::warn!(path = %metadata.path.display(), error = %e, "failed to open static file");
		})?;
		response.body = Body::Stream(chunked(file, length, self.settings.static_files.chunk_size));
		Ok(response)
	}

	fn default_freshness(&self) -> Option<Duration> {
		self.settings.static_files.default_freshness()
	}

	fn is_compressible(&self, content_type: &str, request: &RequestHead) -> bool {
		self.settings.compression.enabled
			&& !self.settings.compression.encodings.is_empty()
			&& should_compress(content_type, request.is_range_request())
	}

	/// Picks the encoding to apply, if any, and announces it in
	/// `Content-Encoding` so HEAD and GET carry the same headers.
	fn negotiate(
		&self,
		request: &RequestHead,
		compressible: bool,
		response: &mut Response,
	) -> Option<Encoding> {
		if !compressible {
			return None;
		}
		let encoding = request
			.accept_encoding()
			.and_then(|accept| select_encoding(accept, &self.settings.compression.encodings));
		tracing::debug!(encoding = ?encoding, "negotiated content encoding");
		if let Some(encoding) = encoding {
			insert_str(&mut response.headers, CONTENT_ENCODING, encoding.as_str());
		}
		encoding
	}

	/// A 200 response carrying every header known before the verdict.
	fn start_response(
		&self,
		content_type: &str,
		custom_headers: HeaderMap,
		cache: &CacheParams,
		compressible: bool,
	) -> Response {
		let mut response = Response::ok();
		// Custom first so the cache headers written below win on conflict.
		for (name, value) in &custom_headers {
			response.headers.append(name, value.clone());
		}
		response = response.media_type(content_type);

		write_cache_headers_at(&mut response.headers, cache, Utc::now());

		if compressible {
			add_vary_accept_encoding(&mut response.headers);
		}
		response
	}

	/// Returns the 304 response when the client's copy is current.
	fn check_conditional(
		request: &RequestHead,
		cache: &CacheParams,
		response: &mut Response,
	) -> Option<Response> {
		let conditional = ConditionalRequest::from_headers(&request.headers);
		if !evaluate_at(&conditional, cache, Utc::now()).is_match() {
			return None;
		}

		tracing::debug!(etag = ?cache.key.map(|k| k.to_hex()), "not modified");
		let mut not_modified = Response::not_modified();
		not_modified.headers = std::mem::take(&mut response.headers);
		not_modified.headers.remove(CONTENT_LENGTH);
		Some(not_modified)
	}

	fn compressed(&self, mut response: Response, body: &Bytes, encoding: Encoding) -> Result<Response> {
		let compressed = self.settings.compression.codec().compress(body, encoding)?;
		response
			.headers
			.insert(CONTENT_LENGTH, HeaderValue::from(compressed.len()));
		response.body = Body::Full(Bytes::from(compressed));
		Ok(response)
	}
}

fn insert_str(headers: &mut HeaderMap, name: http::header::HeaderName, value: &str) {
	if let Ok(value) = HeaderValue::from_str(value) {
		headers.insert(name, value);
	}
}

fn add_vary_accept_encoding(headers: &mut HeaderMap) {
	let already = headers
		.get_all(VARY)
		.iter()
		.filter_map(|v| v.to_str().ok())
		.flat_map(|v| v.split(','))
		.any(|v| {
			let v = v.trim();
			v == "*" || v.eq_ignore_ascii_case("accept-encoding")
		});
	if !already {
		headers.append(VARY, HeaderValue::from_static("Accept-Encoding"));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_vary_not_duplicated() {
		let mut headers = HeaderMap::new();
		headers.insert(VARY, HeaderValue::from_static("Origin, accept-encoding"));
		add_vary_accept_encoding(&mut headers);
		assert_eq!(headers.get_all(VARY).iter().count(), 1);

		let mut headers = HeaderMap::new();
		headers.insert(VARY, HeaderValue::from_static("Origin"));
		add_vary_accept_encoding(&mut headers);
		assert_eq!(headers.get_all(VARY).iter().count(), 2);
	}

	#[rstest]
	#[case(true, "application/json", true)]
	#[case(false, "application/json", false)]
	#[case(true, "video/mp4", false)]
	fn test_is_compressible(#[case] enabled: bool, #[case] content_type: &str, #[case] expected: bool) {
		let mut settings = ResponseSettings::default();
		settings.compression.enabled = enabled;
		let factory = ResponseFactory::new(settings);

		assert_eq!(factory.is_compressible(content_type, &RequestHead::get()), expected);
	}

	#[rstest]
	fn test_empty_encoding_list_disables_compression() {
		let mut settings = ResponseSettings::default();
		settings.compression.encodings.clear();
		let factory = ResponseFactory::new(settings);

		assert!(!factory.is_compressible("text/plain", &RequestHead::get()));
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_producer_is_invalid_argument() {
		let factory = ResponseFactory::default();
		let err = factory
			.serve(&RequestHead::get(), ResultOptions::new("text/plain"))
			.await
			.unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}
}
