//! # Kinema
//!
//! HTTP caching, conditional-request and compression envelope for media
//! server responses.
//!
//! Endpoints state what they would send (a content type, an optional
//! validator key, an optional modification time, an optional freshness
//! lifetime, and a deferred payload) and Kinema decides what actually goes
//! on the wire: a `304 Not Modified`, a compressed body, a streamed file or
//! a byte range.
//!
//! ## Crates
//!
//! - [`http`]: request/response value types and the shared error type
//! - [`cache`]: validator keys, conditional evaluation, cache headers
//! - [`compression`]: Accept-Encoding negotiation and codecs
//! - [`response`]: the [`ResponseFactory`] tying everything together
//! - `conf` (feature `conf`): layered settings from TOML and environment
//!
//! ## Feature Flags
//!
//! - `conf` - Settings loading (TOML file and `KINEMA_*` environment variables)
//! - `full` (default) - All of the above
//!
//! ## Quick Example
//!
//! ```
//! use kinema::prelude::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let factory = ResponseFactory::default();
//! let key = CacheKey::from_seed("/Items/9f1c/Images/Backdrop").unwrap();
//!
//! let options = ResultOptions::new("application/json")
//!     .with_key(key)
//!     .with_freshness(Duration::from_secs(60))
//!     .with_producer(|| async { Ok::<_, Error>(r#"{"Name":"Backdrop"}"#) });
//!
//! let response = factory.serve(&RequestHead::get(), options).await.unwrap();
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.headers["cache-control"], "public, max-age=60");
//! # });
//! ```

pub mod cache;
pub mod compression;
#[cfg(feature = "conf")]
pub mod conf;
pub mod http;
pub mod response;

// Re-export the types most endpoints touch
pub use kinema_cache::{CacheKey, CacheParams, CachePolicy, ConditionalRequest, Verdict};
pub use kinema_compression::Encoding;
pub use kinema_http::{Body, Error, RequestHead, Response, Result, StatusCode};
pub use kinema_response::{Payload, Producer, ResponseFactory, ResultOptions, StaticFileOptions};

#[cfg(feature = "conf")]
pub use kinema_conf::ResponseSettings;

/// Prelude module for convenient imports
///
/// ```
/// use kinema::prelude::*;
/// ```
pub mod prelude {
	pub use crate::{
		Body, CacheKey, CacheParams, Encoding, Error, Payload, Producer, RequestHead, Response,
		ResponseFactory, Result, ResultOptions, StaticFileOptions, StatusCode,
	};

	#[cfg(feature = "conf")]
	pub use crate::ResponseSettings;
}
