//! Caching intent supplied by an endpoint.

use chrono::{DateTime, Utc};
use kinema_http::{Error, Result};
use std::time::Duration;

use crate::key::CacheKey;

/// Validators and lifetime of the artifact being served.
///
/// All three parts are optional; which ones are present selects the
/// [`CachePolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheParams {
	/// Strong validator token.
	pub key: Option<CacheKey>,
	/// Modification time of the underlying resource.
	pub last_modified: Option<DateTime<Utc>>,
	/// How long a copy stays fresh without revalidation.
	pub freshness: Option<Duration>,
}

impl CacheParams {
	/// Parameters that request no caching at all.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the validator token.
	pub fn with_key(mut self, key: CacheKey) -> Self {
		self.key = Some(key);
		self
	}

	/// Sets the resource modification time.
	pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
		self.last_modified = Some(last_modified);
		self
	}

	/// Sets the freshness lifetime.
	pub fn with_freshness(mut self, freshness: Duration) -> Self {
		self.freshness = Some(freshness);
		self
	}

	/// Rejects a nil key.
	///
	/// A key is only supplied when caching is wanted, so the nil value can
	/// only be a caller bug.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_cache::{CacheKey, CacheParams};
	///
	/// assert!(CacheParams::new().validate().is_ok());
	/// assert!(CacheParams::new().with_key(CacheKey::nil()).validate().is_err());
	/// ```
	pub fn validate(&self) -> Result<()> {
		match self.key {
			Some(key) if key.is_nil() => Err(Error::invalid_argument(
				"cache key must not be nil when caching is requested",
			)),
			_ => Ok(()),
		}
	}

	/// The policy these parameters select.
	pub fn policy(&self) -> CachePolicy {
		CachePolicy::from_parts(self.key.is_some(), self.freshness.is_some())
	}
}

/// Which signal governs a cached copy's validity.
///
/// A modification time is an extra, weaker validator layered on top of any
/// policy; it never selects one on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
	/// Neither token nor lifetime: clients must not store the response.
	NoStore,
	/// A lifetime without a token.
	DurationBased,
	/// A token without a lifetime: always revalidate.
	ValidatorBased,
	/// A token and a lifetime.
	ValidatorWithDuration,
}

impl CachePolicy {
	/// Derives the policy from which parts are present.
	pub fn from_parts(has_key: bool, has_freshness: bool) -> Self {
		match (has_key, has_freshness) {
			(false, false) => Self::NoStore,
			(false, true) => Self::DurationBased,
			(true, false) => Self::ValidatorBased,
			(true, true) => Self::ValidatorWithDuration,
		}
	}

	/// Whether shared and private caches may keep the response.
	pub fn is_cacheable(&self) -> bool {
		!matches!(self, Self::NoStore)
	}

	/// Whether the response carries a lifetime.
	pub fn has_duration(&self) -> bool {
		matches!(self, Self::DurationBased | Self::ValidatorWithDuration)
	}

	/// Whether the response carries a strong validator token.
	pub fn has_validator(&self) -> bool {
		matches!(self, Self::ValidatorBased | Self::ValidatorWithDuration)
	}
}
