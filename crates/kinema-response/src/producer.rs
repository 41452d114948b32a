//! Deferred payload production.
//!
//! Endpoints hand the factory a [`Producer`] instead of a body so that no
//! work is done when the client's cached copy is still good.

use std::future::Future;

use bytes::Bytes;
use futures::Stream;
use futures::future::BoxFuture;
use kinema_http::{Body, BoxError, Result, StreamBody};

/// A produced response body.
pub enum Payload {
	/// Fully buffered bytes; length is known up front.
	Bytes(Bytes),
	/// Chunks pulled as the response is written.
	Stream(StreamBody),
}

impl Payload {
	/// Wraps a chunk stream.
	pub fn from_stream<S>(stream: S) -> Self
	where
		S: Stream<Item = std::result::Result<Bytes, BoxError>> + Send + 'static,
	{
		Self::Stream(Box::pin(stream))
	}
}

impl std::fmt::Debug for Payload {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Bytes(bytes) => f.debug_tuple("Payload::Bytes").field(&bytes.len()).finish(),
			Self::Stream(_) => f.write_str("Payload::Stream(..)"),
		}
	}
}

impl From<Bytes> for Payload {
	fn from(bytes: Bytes) -> Self {
		Self::Bytes(bytes)
	}
}

impl From<Vec<u8>> for Payload {
	fn from(bytes: Vec<u8>) -> Self {
		Self::Bytes(Bytes::from(bytes))
	}
}

impl From<String> for Payload {
	fn from(text: String) -> Self {
		Self::Bytes(Bytes::from(text))
	}
}

impl From<&'static str> for Payload {
	fn from(text: &'static str) -> Self {
		Self::Bytes(Bytes::from_static(text.as_bytes()))
	}
}

impl From<StreamBody> for Payload {
	fn from(stream: StreamBody) -> Self {
		Self::Stream(stream)
	}
}

impl From<Payload> for Body {
	fn from(payload: Payload) -> Self {
		match payload {
			Payload::Bytes(bytes) => Body::Full(bytes),
			Payload::Stream(stream) => Body::Stream(stream),
		}
	}
}

/// Lazily produces a response payload, at most once.
///
/// Implemented for every `FnOnce() -> impl Future<Output = Result<T>>`
/// where `T: Into<Payload>`, so async closures and functions work directly.
///
/// # Examples
///
/// ```
/// use kinema_response::{Payload, Producer};
///
/// # tokio_test::block_on(async {
/// let producer = || async { Ok::<_, kinema_http::Error>("{\"Items\":[]}") };
/// let payload = Box::new(producer).produce().await.unwrap();
/// assert!(matches!(payload, Payload::Bytes(_)));
/// # });
/// ```
pub trait Producer: Send + 'static {
	/// Runs the producer.
	fn produce(self: Box<Self>) -> BoxFuture<'static, Result<Payload>>;
}

impl<F, Fut, T> Producer for F
where
	F: FnOnce() -> Fut + Send + 'static,
	Fut: Future<Output = Result<T>> + Send + 'static,
	T: Into<Payload>,
{
	fn produce(self: Box<Self>) -> BoxFuture<'static, Result<Payload>> {
		let future = self();
		Box::pin(async move { future.await.map(Into::into) })
	}
}
