//! # Kinema Response
//!
//! Materializes responses for media endpoints: cache headers, conditional
//! `304 Not Modified` answers, content-encoding negotiation, and streamed
//! static files with single byte-range support.
//!
//! Endpoints describe what they would send through [`ResultOptions`] or
//! [`StaticFileOptions`]; [`ResponseFactory`] decides what is actually sent.
//! The payload is produced only when the client needs it.
//!
//! ## Example
//!
//! ```
//! use kinema_cache::CacheKey;
//! use kinema_http::{RequestHead, StatusCode};
//! use kinema_response::{ResponseFactory, ResultOptions};
//!
//! # tokio_test::block_on(async {
//! let factory = ResponseFactory::default();
//! let key = CacheKey::from_seed("/Items/7/Images/Primary").unwrap();
//!
//! // The client already holds this version.
//! let request = RequestHead::get().with_header("If-None-Match", &key.to_hex());
//! let options = ResultOptions::new("application/json")
//!     .with_key(key)
//!     .with_producer(|| async {
//!         Err::<&str, _>(kinema_http::Error::Payload("never produced".into()))
//!     });
//!
//! let response = factory.serve(&request, options).await.unwrap();
//! assert_eq!(response.status, StatusCode::NOT_MODIFIED);
//! assert!(response.body.is_empty());
//! # });
//! ```

pub mod factory;
pub mod options;
pub mod producer;
pub mod range;
pub mod static_file;

pub use factory::ResponseFactory;
pub use options::{ResultOptions, StaticFileOptions};
pub use producer::{Payload, Producer};
pub use range::ByteRange;
pub use static_file::FileMetadata;
