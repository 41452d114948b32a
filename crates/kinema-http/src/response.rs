use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use std::fmt;
use std::pin::Pin;

use crate::{Error, Result};

/// Boxed error yielded by body streams
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for streaming body
pub type StreamBody = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, BoxError>> + Send>>;

/// Response body: nothing, a buffer, or a stream that is pulled while writing
pub enum Body {
	Empty,
	Full(Bytes),
	Stream(StreamBody),
}

impl Body {
	/// Wrap a byte stream
	pub fn from_stream<S>(stream: S) -> Self
	where
		S: Stream<Item = std::result::Result<Bytes, BoxError>> + Send + 'static,
	{
		Self::Stream(Box::pin(stream))
	}

	/// Whether the body is known to carry no bytes
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Empty => true,
			Self::Full(bytes) => bytes.is_empty(),
			Self::Stream(_) => false,
		}
	}

	/// Length in bytes when known without reading the body
	pub fn known_len(&self) -> Option<u64> {
		match self {
			Self::Empty => Some(0),
			Self::Full(bytes) => Some(bytes.len() as u64),
			Self::Stream(_) => None,
		}
	}

	/// Read the whole body into memory
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::Body;
	/// use bytes::Bytes;
	/// use futures::stream;
	///
	/// # tokio_test::block_on(async {
	/// let chunks = vec![Ok(Bytes::from("hel")), Ok(Bytes::from("lo"))];
	/// let body = Body::from_stream(stream::iter(chunks));
	/// assert_eq!(body.into_bytes().await.unwrap(), Bytes::from("hello"));
	/// # });
	/// ```
	pub async fn into_bytes(self) -> Result<Bytes> {
		match self {
			Self::Empty => Ok(Bytes::new()),
			Self::Full(bytes) => Ok(bytes),
			Self::Stream(mut stream) => {
				let mut buffer = BytesMut::new();
				while let Some(chunk) = stream.next().await {
					let chunk = chunk.map_err(|e| Error::Payload(e.to_string()))?;
					buffer.extend_from_slice(&chunk);
				}
				Ok(buffer.freeze())
			}
		}
	}

	/// Consume the body as a stream regardless of its representation
	pub fn into_stream(self) -> StreamBody {
		match self {
			Self::Empty => Box::pin(stream::empty()),
			Self::Full(bytes) => Box::pin(stream::once(async move { Ok(bytes) })),
			Self::Stream(stream) => stream,
		}
	}
}

impl Default for Body {
	fn default() -> Self {
		Self::Empty
	}
}

impl fmt::Debug for Body {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("Body::Empty"),
			Self::Full(bytes) => f.debug_tuple("Body::Full").field(&bytes.len()).finish(),
			Self::Stream(_) => f.write_str("Body::Stream(..)"),
		}
	}
}

impl From<Bytes> for Body {
	fn from(bytes: Bytes) -> Self {
		Self::Full(bytes)
	}
}

impl From<Vec<u8>> for Body {
	fn from(bytes: Vec<u8>) -> Self {
		Self::Full(Bytes::from(bytes))
	}
}

impl From<String> for Body {
	fn from(text: String) -> Self {
		Self::Full(Bytes::from(text))
	}
}

impl From<&'static str> for Body {
	fn from(text: &'static str) -> Self {
		Self::Full(Bytes::from_static(text.as_bytes()))
	}
}

/// HTTP response assembled by the response layer
///
/// Headers are complete once a `Response` is handed back; the body is only
/// pulled afterwards by whoever writes it to the socket.
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Body,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Body::Empty,
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 304 Not Modified status
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::not_modified();
	/// assert_eq!(response.status, StatusCode::NOT_MODIFIED);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn not_modified() -> Self {
		Self::new(StatusCode::NOT_MODIFIED)
	}

	/// Create a Response with HTTP 500 Internal Server Error status
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::{Body, Response};
	///
	/// let response = Response::ok().with_body("Hello, World!");
	/// assert_eq!(response.body.known_len(), Some(13));
	/// ```
	pub fn with_body(mut self, body: impl Into<Body>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a custom header to the response
	///
	/// Names or values that are not valid HTTP are skipped.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::Response;
	///
	/// let response = Response::ok().with_header("X-Custom-Header", "custom-value");
	/// assert_eq!(
	///     response.headers.get("X-Custom-Header").unwrap().to_str().unwrap(),
	///     "custom-value"
	/// );
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	/// Add a custom header using typed HeaderName and HeaderValue
	pub fn with_typed_header(mut self, key: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(key, value);
		self
	}

	/// Set the Content-Type header (media type)
	///
	/// Falls back to `application/octet-stream` when the value is not a
	/// valid header value.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::Response;
	/// use http::header::CONTENT_TYPE;
	///
	/// let response = Response::ok().media_type("video/mp4");
	/// assert_eq!(response.headers.get(CONTENT_TYPE).unwrap(), "video/mp4");
	/// ```
	pub fn media_type(self, media_type: &str) -> Self {
		self.with_typed_header(
			CONTENT_TYPE,
			HeaderValue::from_str(media_type)
				.unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
		)
	}

	/// Header value as a string, `None` when absent or not visible ASCII
	pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let body = serde_json::json!({
			"error": error.to_string(),
		});
		match serde_json::to_vec(&body) {
			Ok(json) => Response::new(error.status_code())
				.with_typed_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
				.with_body(json),
			Err(_) => Response::internal_server_error(),
		}
	}
}
