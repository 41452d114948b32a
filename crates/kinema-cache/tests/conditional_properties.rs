//! Property tests for conditional evaluation and header synthesis.

use chrono::{DateTime, TimeZone, Utc};
use http::HeaderMap;
use kinema_cache::{
	CacheKey, CacheParams, ConditionalRequest, Verdict, evaluate_at, write_cache_headers_at,
};
use proptest::prelude::*;
use std::time::Duration;

// 2001-09-09 .. 2033-05-18, comfortably inside the HTTP-date range.
fn instant() -> impl Strategy<Value = DateTime<Utc>> {
	(1_000_000_000i64..2_000_000_000i64, 0u32..1_000_000_000u32)
		.prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

fn key() -> impl Strategy<Value = CacheKey> {
	any::<[u8; 16]>()
		.prop_filter("nil key", |bytes| bytes.iter().any(|b| *b != 0))
		.prop_map(CacheKey::from_bytes)
}

proptest! {
	#[test]
	fn since_at_or_after_modification_matches(
		modified in instant(),
		offset in 0i64..10_000_000,
		now in instant(),
	) {
		let since = modified + chrono::Duration::seconds(offset);
		let params = CacheParams::new().with_last_modified(modified);
		let request = ConditionalRequest { if_modified_since: Some(since), if_none_match: None };

		prop_assert_eq!(evaluate_at(&request, &params, now), Verdict::Match);
	}

	#[test]
	fn since_a_second_before_modification_mismatches(
		modified in instant(),
		offset in 1i64..10_000_000,
		now in instant(),
	) {
		let since = modified - chrono::Duration::seconds(offset);
		let params = CacheParams::new().with_last_modified(modified);
		let request = ConditionalRequest { if_modified_since: Some(since), if_none_match: None };

		prop_assert_eq!(evaluate_at(&request, &params, now), Verdict::Mismatch);
	}

	#[test]
	fn matching_token_always_matches(
		key in key(),
		modified in proptest::option::of(instant()),
		since in proptest::option::of(instant()),
		freshness in proptest::option::of(0u64..1_000_000),
		now in instant(),
	) {
		let params = CacheParams {
			key: Some(key),
			last_modified: modified,
			freshness: freshness.map(Duration::from_secs),
		};
		let request = ConditionalRequest { if_modified_since: since, if_none_match: Some(key) };

		prop_assert_eq!(evaluate_at(&request, &params, now), Verdict::Match);
	}

	#[test]
	fn etag_round_trips_through_if_none_match(key in key()) {
		let mut headers = HeaderMap::new();
		write_cache_headers_at(&mut headers, &CacheParams::new().with_key(key), Utc::now());

		let mut request_headers = HeaderMap::new();
		request_headers.insert(http::header::IF_NONE_MATCH, headers["etag"].clone());
		let request = ConditionalRequest::from_headers(&request_headers);

		prop_assert_eq!(request.if_none_match, Some(key));
	}

	#[test]
	fn age_is_never_negative(modified in instant(), now in instant()) {
		let mut headers = HeaderMap::new();
		write_cache_headers_at(&mut headers, &CacheParams::new().with_last_modified(modified), now);

		let age: i64 = headers["age"].to_str().unwrap().parse().unwrap();
		prop_assert!(age >= 0);
	}
}
