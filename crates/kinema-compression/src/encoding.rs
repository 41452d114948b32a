//! Content codings the response layer can apply.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A supported `Content-Encoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
	#[serde(rename = "br")]
	Brotli,
	#[serde(rename = "gzip", alias = "x-gzip")]
	Gzip,
	#[serde(rename = "deflate")]
	Deflate,
}

impl Encoding {
	/// Every supported encoding, best ratio first.
	pub const ALL: [Encoding; 3] = [Encoding::Brotli, Encoding::Gzip, Encoding::Deflate];

	/// The `Content-Encoding` token for this encoding.
	pub fn as_str(&self) -> &'static str {
		match self {
			Encoding::Brotli => "br",
			Encoding::Gzip => "gzip",
			Encoding::Deflate => "deflate",
		}
	}

	/// Matches a coding token case-insensitively.
	pub fn from_token(token: &str) -> Option<Self> {
		let token = token.trim();
		if token.eq_ignore_ascii_case("br") {
			Some(Encoding::Brotli)
		} else if token.eq_ignore_ascii_case("gzip") || token.eq_ignore_ascii_case("x-gzip") {
			Some(Encoding::Gzip)
		} else if token.eq_ignore_ascii_case("deflate") {
			Some(Encoding::Deflate)
		} else {
			None
		}
	}
}

impl fmt::Display for Encoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when parsing an unknown coding token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported content encoding: {0}")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
	type Err = UnknownEncoding;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_token(s).ok_or_else(|| UnknownEncoding(s.to_string()))
	}
}
