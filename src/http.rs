//! Request and response value types.
//!
//! ```
//! use kinema::http::{RequestHead, Response};
//!
//! let request = RequestHead::get().with_header("Accept-Encoding", "gzip");
//! assert_eq!(request.accept_encoding(), Some("gzip"));
//!
//! let response = Response::ok().with_body("ok");
//! assert_eq!(response.body.known_len(), Some(2));
//! ```

pub use kinema_http::*;
