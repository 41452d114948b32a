//! Conditional request evaluation
//!
//! Decides whether a client's cached copy is still good, from
//! `If-Modified-Since` and `If-None-Match` against the artifact's
//! validators. Pure: no I/O, no side effects beyond debug logging.

use chrono::{DateTime, Utc};
use http::HeaderMap;
use http::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};

use crate::http_date::{parse_http_date, truncate_to_seconds};
use crate::key::CacheKey;
use crate::params::CacheParams;

/// Outcome of a conditional check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
	/// The client's copy is current: answer 304 without a body.
	Match,
	/// The client needs the full body.
	Mismatch,
}

impl Verdict {
	pub fn is_match(self) -> bool {
		self == Self::Match
	}
}

/// Conditional headers of the incoming request.
///
/// Values that fail to parse are stored as absent. A malformed conditional
/// header is never an error, it simply does not participate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionalRequest {
	pub if_modified_since: Option<DateTime<Utc>>,
	pub if_none_match: Option<CacheKey>,
}

impl ConditionalRequest {
	/// Extracts conditional headers
	///
	/// # Examples
	///
	/// ```
	/// use kinema_cache::{CacheKey, ConditionalRequest};
	/// use http::HeaderMap;
	/// use http::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
	///
	/// let key = CacheKey::from_seed("cover.jpg").unwrap();
	/// let mut headers = HeaderMap::new();
	/// headers.insert(IF_NONE_MATCH, key.to_hex().parse().unwrap());
	/// headers.insert(IF_MODIFIED_SINCE, "not a date".parse().unwrap());
	///
	/// let conditional = ConditionalRequest::from_headers(&headers);
	/// assert_eq!(conditional.if_none_match, Some(key));
	/// assert_eq!(conditional.if_modified_since, None);
	/// ```
	pub fn from_headers(headers: &HeaderMap) -> Self {
		let if_modified_since = headers.get(IF_MODIFIED_SINCE).and_then(|value| {
			let parsed = value.to_str().ok().and_then(parse_http_date);
			if parsed.is_none() {
				tracing::debug!(value = ?value, "ignoring malformed If-Modified-Since");
			}
			parsed
		});

		let if_none_match = headers.get(IF_NONE_MATCH).and_then(|value| {
			let parsed = value.to_str().ok().and_then(CacheKey::parse);
			if parsed.is_none() {
				tracing::debug!(value = ?value, "ignoring malformed If-None-Match");
			}
			parsed
		});

		Self {
			if_modified_since,
			if_none_match,
		}
	}

	/// Whether any usable conditional header was sent.
	pub fn is_conditional(&self) -> bool {
		self.if_modified_since.is_some() || self.if_none_match.is_some()
	}
}

/// Evaluates the request against `params` at the current time.
pub fn evaluate(request: &ConditionalRequest, params: &CacheParams) -> Verdict {
	evaluate_at(request, params, Utc::now())
}

/// Evaluates the request against `params` as of `now`.
///
/// 1. `If-Modified-Since` against the modification time (second precision),
///    or, with no modification time, against `If-Modified-Since + freshness`.
/// 2. `If-None-Match` equal to the key matches regardless of step 1.
/// 3. Anything else is a mismatch.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use kinema_cache::{CacheParams, ConditionalRequest, Verdict, evaluate_at};
///
/// let now = Utc::now();
/// let modified = now - Duration::days(2);
/// let params = CacheParams::new().with_last_modified(modified);
///
/// let request = ConditionalRequest {
///     if_modified_since: Some(now - Duration::days(1)),
///     if_none_match: None,
/// };
/// assert_eq!(evaluate_at(&request, &params, now), Verdict::Match);
/// assert_eq!(
///     evaluate_at(&ConditionalRequest::default(), &params, now),
///     Verdict::Mismatch
/// );
/// ```
pub fn evaluate_at(
	request: &ConditionalRequest,
	params: &CacheParams,
	now: DateTime<Utc>,
) -> Verdict {
	if let Some(if_modified_since) = request.if_modified_since
		&& not_modified_since(if_modified_since, params, now)
	{
		tracing::debug!(%if_modified_since, "conditional match on modification time");
		return Verdict::Match;
	}

	if let (Some(key), Some(if_none_match)) = (params.key, request.if_none_match)
		&& key == if_none_match
	{
		tracing::debug!(etag = %key, "conditional match on validator token");
		return Verdict::Match;
	}

	Verdict::Mismatch
}

fn not_modified_since(
	if_modified_since: DateTime<Utc>,
	params: &CacheParams,
	now: DateTime<Utc>,
) -> bool {
	if let Some(last_modified) = params.last_modified {
		return truncate_to_seconds(last_modified) <= truncate_to_seconds(if_modified_since);
	}

	if let Some(freshness) = params.freshness {
		return match chrono::Duration::from_std(freshness)
			.ok()
			.and_then(|lifetime| if_modified_since.checked_add_signed(lifetime))
		{
			Some(expires) => now < expires,
			// A lifetime too large to represent never runs out.
			None => true,
		};
	}

	false
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone};
	use rstest::rstest;

	fn key() -> CacheKey {
		CacheKey::from_seed("/media/album/cover.jpg").unwrap()
	}

	fn at(secs: i64, millis: i64) -> DateTime<Utc> {
		Utc.timestamp_opt(secs, 0).unwrap() + Duration::milliseconds(millis)
	}

	#[rstest]
	fn test_subsecond_modification_time_still_matches() {
		let now = at(1_700_000_100, 0);
		let params = CacheParams::new().with_last_modified(at(1_700_000_000, 900));
		let request = ConditionalRequest {
			if_modified_since: Some(at(1_700_000_000, 0)),
			if_none_match: None,
		};

		assert_eq!(evaluate_at(&request, &params, now), Verdict::Match);
	}

	#[rstest]
	fn test_modified_after_client_copy_is_mismatch() {
		let now = at(1_700_000_100, 0);
		let params = CacheParams::new().with_last_modified(at(1_700_000_050, 0));
		let request = ConditionalRequest {
			if_modified_since: Some(at(1_700_000_000, 0)),
			if_none_match: None,
		};

		assert_eq!(evaluate_at(&request, &params, now), Verdict::Mismatch);
	}

	#[rstest]
	#[case(59, Verdict::Match)]
	#[case(60, Verdict::Mismatch)]
	#[case(3_600, Verdict::Mismatch)]
	fn test_freshness_window_without_modification_time(
		#[case] elapsed: i64,
		#[case] expected: Verdict,
	) {
		let since = at(1_700_000_000, 0);
		let params = CacheParams::new().with_freshness(std::time::Duration::from_secs(60));
		let request = ConditionalRequest {
			if_modified_since: Some(since),
			if_none_match: None,
		};

		assert_eq!(
			evaluate_at(&request, &params, since + Duration::seconds(elapsed)),
			expected
		);
	}

	#[rstest]
	fn test_modification_time_takes_precedence_over_freshness() {
		let now = at(1_700_000_010, 0);
		let params = CacheParams::new()
			.with_last_modified(at(1_700_000_005, 0))
			.with_freshness(std::time::Duration::from_secs(3_600));
		let request = ConditionalRequest {
			if_modified_since: Some(at(1_700_000_000, 0)),
			if_none_match: None,
		};

		assert_eq!(evaluate_at(&request, &params, now), Verdict::Mismatch);
	}

	#[rstest]
	fn test_token_overrides_time_mismatch() {
		let now = at(1_700_000_100, 0);
		let params = CacheParams::new()
			.with_key(key())
			.with_last_modified(at(1_700_000_050, 0));
		let request = ConditionalRequest {
			if_modified_since: Some(at(1_700_000_000, 0)),
			if_none_match: Some(key()),
		};

		assert_eq!(evaluate_at(&request, &params, now), Verdict::Match);
	}

	#[rstest]
	fn test_different_token_is_mismatch() {
		let params = CacheParams::new().with_key(key());
		let request = ConditionalRequest {
			if_modified_since: None,
			if_none_match: Some(CacheKey::from_seed("other").unwrap()),
		};

		assert_eq!(evaluate(&request, &params), Verdict::Mismatch);
	}

	#[rstest]
	fn test_token_without_server_key_is_mismatch() {
		let params = CacheParams::new();
		let request = ConditionalRequest {
			if_modified_since: None,
			if_none_match: Some(key()),
		};

		assert_eq!(evaluate(&request, &params), Verdict::Mismatch);
	}

	#[rstest]
	fn test_since_without_validators_is_mismatch() {
		let request = ConditionalRequest {
			if_modified_since: Some(Utc::now()),
			if_none_match: None,
		};

		assert_eq!(evaluate(&request, &CacheParams::new()), Verdict::Mismatch);
	}

	#[rstest]
	fn test_malformed_headers_are_absent() {
		let mut headers = HeaderMap::new();
		headers.insert(IF_NONE_MATCH, "\"some-weak-tag\"".parse().unwrap());
		headers.insert(IF_MODIFIED_SINCE, "tomorrow".parse().unwrap());

		let request = ConditionalRequest::from_headers(&headers);
		assert!(!request.is_conditional());

		let params = CacheParams::new()
			.with_key(key())
			.with_last_modified(Utc::now());
		assert_eq!(evaluate(&request, &params), Verdict::Mismatch);
	}

	#[rstest]
	fn test_from_headers_parses_both() {
		let mut headers = HeaderMap::new();
		headers.insert(IF_NONE_MATCH, key().to_hex().parse().unwrap());
		headers.insert(
			IF_MODIFIED_SINCE,
			"Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap(),
		);

		let request = ConditionalRequest::from_headers(&headers);
		assert_eq!(request.if_none_match, Some(key()));
		assert_eq!(request.if_modified_since, Some(at(1_445_412_480, 0)));
	}
}
