//! # Kinema Compression
//!
//! Decides whether a response body may be compressed, picks a
//! `Content-Encoding` the client accepts, and performs the compression.
//!
//! ## Supported Encodings
//!
//! - **Brotli** (`br`): quality 0-11
//! - **Gzip** (`gzip`): level 0-9
//! - **Deflate** (`deflate`): level 0-9, shares the gzip level
//!
//! ## Example
//!
//! ```
//! use kinema_compression::{CompressionConfig, Encoding, select_encoding, should_compress};
//!
//! assert!(should_compress("application/json", false));
//! assert!(!should_compress("video/mp4", false));
//!
//! let offered = [Encoding::Brotli, Encoding::Gzip, Encoding::Deflate];
//! let encoding = select_encoding("gzip, br;q=0.5", &offered).unwrap();
//! assert_eq!(encoding, Encoding::Gzip);
//!
//! let body = br#"{"items":[1,2,3,4,5,6,7,8,9,10]}"#;
//! let compressed = CompressionConfig::default().compress(body, encoding).unwrap();
//! assert!(!compressed.is_empty());
//! ```

pub mod codec;
pub mod encoding;
pub mod negotiate;

pub use codec::{CompressionConfig, CompressionError, decompress};
pub use encoding::{Encoding, UnknownEncoding};
pub use negotiate::{select_encoding, should_compress};
