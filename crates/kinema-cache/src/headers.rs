//! Cache header synthesis
//!
//! Writes `ETag`, `Last-Modified`, `Age`, `Cache-Control` and `Expires` from
//! a [`CacheParams`]. Headers the rules leave out are removed from the sink
//! so a caller-supplied value can never contradict the chosen policy.
//!
//! | key | freshness | Cache-Control                         | Expires      |
//! |-----|-----------|---------------------------------------|--------------|
//! | no  | no        | `no-cache, no-store, must-revalidate` | `-1`         |
//! | no  | yes       | `public, max-age=N`                   | `now + N`    |
//! | yes | no        | `public`                              | omitted      |
//! | yes | yes       | `public, max-age=N`                   | `now + N`    |
//!
//! `Last-Modified` is written when a modification time is known and either
//! there is no key or there is a freshness lifetime. `Age` is written
//! whenever a modification time is known.

use chrono::{DateTime, Utc};
use http::HeaderMap;
use http::header::{AGE, CACHE_CONTROL, ETAG, EXPIRES, HeaderValue, LAST_MODIFIED};

use crate::http_date::{fmt_http_date, truncate_to_seconds};
use crate::params::{CacheParams, CachePolicy};

const NO_STORE: &str = "no-cache, no-store, must-revalidate";

/// Writes cache headers for `params` as of the current time.
pub fn write_cache_headers(out: &mut HeaderMap, params: &CacheParams) {
	write_cache_headers_at(out, params, Utc::now());
}

/// Writes cache headers for `params` as of `now`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use http::HeaderMap;
/// use kinema_cache::{CacheKey, CacheParams, write_cache_headers_at};
/// use std::time::Duration;
///
/// let key = CacheKey::from_seed("thumb.webp").unwrap();
/// let params = CacheParams::new()
///     .with_key(key)
///     .with_freshness(Duration::from_secs(60));
///
/// let mut headers = HeaderMap::new();
/// write_cache_headers_at(&mut headers, &params, Utc::now());
///
/// assert_eq!(headers["etag"], key.to_hex().as_str());
/// assert_eq!(headers["cache-control"], "public, max-age=60");
/// assert!(headers.contains_key("expires"));
/// ```
pub fn write_cache_headers_at(out: &mut HeaderMap, params: &CacheParams, now: DateTime<Utc>) {
	let policy = params.policy();

	match params.key.map(|key| HeaderValue::from_str(&key.to_hex())) {
		Some(Ok(etag)) => {
			out.insert(ETAG, etag);
		}
		_ => {
			out.remove(ETAG);
		}
	}

	match params.last_modified {
		Some(last_modified) => {
			if params.key.is_none() || params.freshness.is_some() {
				insert_date(out, LAST_MODIFIED, last_modified);
			} else {
				out.remove(LAST_MODIFIED);
			}

			let age = (truncate_to_seconds(now) - truncate_to_seconds(last_modified))
				.num_seconds()
				.max(0);
			out.insert(AGE, HeaderValue::from(age));
		}
		None => {
			out.remove(LAST_MODIFIED);
			out.remove(AGE);
		}
	}

	let cache_control = match (policy, params.freshness) {
		(_, Some(freshness)) => format!("public, max-age={}", freshness.as_secs()),
		(CachePolicy::ValidatorBased, None) => "public".to_string(),
		_ => NO_STORE.to_string(),
	};
	if let Ok(value) = HeaderValue::from_str(&cache_control) {
		out.insert(CACHE_CONTROL, value);
	}

	match (policy, params.freshness) {
		(_, Some(freshness)) => {
			let expires = chrono::Duration::from_std(freshness)
				.ok()
				.and_then(|lifetime| now.checked_add_signed(lifetime))
				.unwrap_or(DateTime::<Utc>::MAX_UTC);
			insert_date(out, EXPIRES, expires);
		}
		(CachePolicy::NoStore, None) => {
			out.insert(EXPIRES, HeaderValue::from_static("-1"));
		}
		_ => {
			out.remove(EXPIRES);
		}
	}
}

fn insert_date(out: &mut HeaderMap, name: http::header::HeaderName, value: DateTime<Utc>) {
	if let Ok(value) = HeaderValue::from_str(&fmt_http_date(value)) {
		out.insert(name, value);
	}
}
