//! # Kinema HTTP
//!
//! Value types exchanged between API endpoints and the Kinema response layer.
//!
//! - [`RequestHead`]: the method and headers of the request being answered
//! - [`Response`] and [`Body`]: the assembled answer, buffered or streaming
//! - [`Error`]: failures surfaced to the endpoint
//!
//! Nothing here holds state across requests; every value is built per call
//! and threaded explicitly through the caching and compression steps.

pub mod error;
pub mod request;
pub mod response;

pub use error::{Error, Result};
pub use request::RequestHead;
pub use response::{Body, BoxError, Response, StreamBody};

// Re-export header and status types used throughout the workspace
pub use http::{HeaderMap, Method, StatusCode, header};
