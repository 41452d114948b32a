//! # Kinema Cache
//!
//! HTTP caching semantics for media server responses.
//!
//! ## Features
//!
//! - **Validator tokens**: [`CacheKey`], a 128-bit identifier rendered as
//!   32 lowercase hex characters in `ETag` and `If-None-Match`
//! - **Conditional requests**: [`evaluate`] decides between `304 Not Modified`
//!   and a full response
//! - **Cache headers**: [`write_cache_headers`] emits `ETag`,
//!   `Last-Modified`, `Age`, `Cache-Control` and `Expires`
//!
//! ## Example
//!
//! ```
//! use http::HeaderMap;
//! use http::header::IF_NONE_MATCH;
//! use kinema_cache::{CacheKey, CacheParams, ConditionalRequest, Verdict, evaluate};
//!
//! let key = CacheKey::from_seed("/library/albums/42/cover.jpg").unwrap();
//! let params = CacheParams::new().with_key(key);
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(IF_NONE_MATCH, key.to_hex().parse().unwrap());
//!
//! let request = ConditionalRequest::from_headers(&headers);
//! assert_eq!(evaluate(&request, &params), Verdict::Match);
//! ```

pub mod conditional;
pub mod headers;
pub mod http_date;
pub mod key;
pub mod params;

pub use conditional::{ConditionalRequest, Verdict, evaluate, evaluate_at};
pub use headers::{write_cache_headers, write_cache_headers_at};
pub use key::CacheKey;
pub use params::{CachePolicy, CacheParams};
