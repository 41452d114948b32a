//! Strong validator tokens.

use std::fmt;

use kinema_http::{Error, Result};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Opaque 128-bit identifier naming one version of a cacheable artifact.
///
/// Rendered as 32 lowercase hex characters wherever it is used as a
/// validator token. The nil value means "no caching" and is rejected by
/// the response factory when supplied as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(Uuid);

impl CacheKey {
	/// Wraps an existing 128-bit identifier.
	pub const fn from_uuid(uuid: Uuid) -> Self {
		Self(uuid)
	}

	/// Wraps raw bytes.
	pub const fn from_bytes(bytes: [u8; 16]) -> Self {
		Self(Uuid::from_bytes(bytes))
	}

	/// The nil key.
	pub const fn nil() -> Self {
		Self(Uuid::nil())
	}

	/// Derives a key from a seed string.
	///
	/// The seed is typically a resource path followed by its modification
	/// tick count, so a touched file gets a fresh token.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidArgument`] when `seed` is empty.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_cache::CacheKey;
	///
	/// let a = CacheKey::from_seed("/library/movie.mkv638412345678901234").unwrap();
	/// let b = CacheKey::from_seed("/library/movie.mkv638412345678901234").unwrap();
	/// let c = CacheKey::from_seed("/library/movie.mkv638412345678909999").unwrap();
	///
	/// assert_eq!(a, b);
	/// assert_ne!(a, c);
	/// assert_eq!(a.to_hex().len(), 32);
	/// assert!(CacheKey::from_seed("").is_err());
	/// ```
	pub fn from_seed(seed: &str) -> Result<Self> {
		if seed.is_empty() {
			return Err(Error::invalid_argument("cache key seed must not be empty"));
		}

		let digest = Sha256::digest(seed.as_bytes());
		let mut bytes = [0u8; 16];
		bytes.copy_from_slice(&digest[..16]);
		Ok(Self::from_bytes(bytes))
	}

	/// Parses a token sent back by a client in `If-None-Match`.
	///
	/// Surrounding whitespace and one pair of double quotes are tolerated,
	/// as are the hyphenated and braced forms. Anything else, including the
	/// nil value, yields `None`.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_cache::CacheKey;
	///
	/// let key = CacheKey::from_seed("poster.jpg").unwrap();
	/// assert_eq!(CacheKey::parse(&key.to_hex()), Some(key));
	/// assert_eq!(CacheKey::parse(&format!("\"{}\"", key)), Some(key));
	/// assert_eq!(CacheKey::parse("not-a-token"), None);
	/// ```
	pub fn parse(value: &str) -> Option<Self> {
		let trimmed = value.trim();
		let unquoted = trimmed
			.strip_prefix('"')
			.and_then(|v| v.strip_suffix('"'))
			.unwrap_or(trimmed);

		Uuid::try_parse(unquoted)
			.ok()
			.filter(|uuid| !uuid.is_nil())
			.map(Self)
	}

	/// Whether this is the nil key.
	pub fn is_nil(&self) -> bool {
		self.0.is_nil()
	}

	/// 32 lowercase hex characters, no hyphens.
	pub fn to_hex(&self) -> String {
		self.0.simple().to_string()
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0.simple(), f)
	}
}

impl From<Uuid> for CacheKey {
	fn from(uuid: Uuid) -> Self {
		Self(uuid)
	}
}
