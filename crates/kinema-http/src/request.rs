//! The parts of an incoming request the response layer reads.

use http::header::{ACCEPT_ENCODING, HeaderName, HeaderValue, RANGE};
use http::{HeaderMap, Method};

/// Method and headers of the request being answered.
///
/// The body and URI are never consulted when deciding how to answer, so
/// only the head is carried.
#[derive(Debug, Clone)]
pub struct RequestHead {
	pub method: Method,
	pub headers: HeaderMap,
}

impl RequestHead {
	/// Create a request head from a method and header map
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::RequestHead;
	/// use http::{HeaderMap, Method};
	///
	/// let head = RequestHead::new(Method::GET, HeaderMap::new());
	/// assert!(!head.is_head());
	/// ```
	pub fn new(method: Method, headers: HeaderMap) -> Self {
		Self { method, headers }
	}

	/// Create a GET request head without headers
	pub fn get() -> Self {
		Self::new(Method::GET, HeaderMap::new())
	}

	/// Create a HEAD request head without headers
	pub fn head() -> Self {
		Self::new(Method::HEAD, HeaderMap::new())
	}

	/// Add a header, ignoring names or values that are not valid HTTP
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::RequestHead;
	///
	/// let head = RequestHead::get().with_header("Range", "bytes=0-99");
	/// assert!(head.is_range_request());
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(value) = HeaderValue::from_str(value)
		{
			self.headers.insert(name, value);
		}
		self
	}

	/// Whether this is a HEAD request
	pub fn is_head(&self) -> bool {
		self.method == Method::HEAD
	}

	/// Whether the client asked for a byte range.
	///
	/// Presence alone counts, even if the value later turns out unusable.
	pub fn is_range_request(&self) -> bool {
		self.headers.contains_key(RANGE)
	}

	/// Raw `Range` header value, if it is visible ASCII
	pub fn range(&self) -> Option<&str> {
		self.header_str(&RANGE)
	}

	/// Raw `Accept-Encoding` header value, if present
	pub fn accept_encoding(&self) -> Option<&str> {
		self.header_str(&ACCEPT_ENCODING)
	}

	/// Header value as a string, `None` when absent or not visible ASCII
	pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}
}

impl Default for RequestHead {
	fn default() -> Self {
		Self::get()
	}
}
