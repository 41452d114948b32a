//! Error types shared by every Kinema crate.

use std::path::PathBuf;

use http::StatusCode;

/// Result type for response-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the endpoint that asked for a response.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The caller supplied arguments that can never produce a response,
	/// such as a nil cache key or a missing payload producer.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// The backing resource could not be opened.
	#[error("resource unavailable: {}: {source}", path.display())]
	ResourceUnavailable {
		/// Path that failed to open.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},

	/// A body could not be encoded.
	#[error("compression failed: {0}")]
	Compression(String),

	/// A payload stream yielded an error while being buffered.
	#[error("payload error: {0}")]
	Payload(String),

	/// IO error.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Creates an [`Error::InvalidArgument`].
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::Error;
	///
	/// let err = Error::invalid_argument("cache key must not be nil");
	/// assert_eq!(err.to_string(), "invalid argument: cache key must not be nil");
	/// ```
	pub fn invalid_argument(message: impl Into<String>) -> Self {
		Self::InvalidArgument(message.into())
	}

	/// Creates an [`Error::ResourceUnavailable`] for `path`.
	pub fn resource_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::ResourceUnavailable {
			path: path.into(),
			source,
		}
	}

	/// HTTP status code an endpoint should answer with for this error.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_http::Error;
	/// use http::StatusCode;
	/// use std::io;
	///
	/// let missing = Error::resource_unavailable(
	///     "/media/poster.jpg",
	///     io::Error::new(io::ErrorKind::NotFound, "gone"),
	/// );
	/// assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
	/// assert_eq!(
	///     Error::invalid_argument("x").status_code(),
	///     StatusCode::INTERNAL_SERVER_ERROR
	/// );
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::ResourceUnavailable { source, .. }
				if source.kind() == std::io::ErrorKind::NotFound =>
			{
				StatusCode::NOT_FOUND
			}
			Self::ResourceUnavailable { source, .. }
				if source.kind() == std::io::ErrorKind::PermissionDenied =>
			{
				StatusCode::FORBIDDEN
			}
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
