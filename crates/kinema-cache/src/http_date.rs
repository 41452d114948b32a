//! HTTP-date helpers.
//!
//! HTTP dates carry whole seconds only, so every comparison against a
//! client-supplied date goes through [`truncate_to_seconds`] first.

use chrono::{DateTime, Timelike, Utc};
use std::time::SystemTime;

/// Latest instant an HTTP-date can represent (9999-12-31T23:59:59Z).
const MAX_HTTP_DATE_SECS: i64 = 253_402_300_799;

/// Parses an HTTP-date, returning `None` for anything unparsable.
///
/// IMF-fixdate, RFC 850 and asctime forms are accepted, plus RFC 3339 as a
/// lenient fallback for clients that send ISO timestamps.
///
/// # Examples
///
/// ```
/// use kinema_cache::http_date::parse_http_date;
///
/// let parsed = parse_http_date("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
/// assert_eq!(parsed.timestamp(), 1_445_412_480);
/// assert!(parse_http_date("yesterday").is_none());
/// ```
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
	let value = value.trim();
	if let Ok(time) = httpdate::parse_http_date(value) {
		return Some(DateTime::from(time));
	}
	DateTime::parse_from_rfc3339(value)
		.ok()
		.map(|dt| dt.with_timezone(&Utc))
}

/// Formats a timestamp as an RFC 1123 HTTP-date.
///
/// Instants outside the representable range are clamped to the Unix epoch
/// or to the end of year 9999.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use kinema_cache::http_date::fmt_http_date;
///
/// let dt = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
/// assert_eq!(fmt_http_date(dt), "Wed, 21 Oct 2015 07:28:00 GMT");
/// ```
pub fn fmt_http_date(dt: DateTime<Utc>) -> String {
	let secs = dt.timestamp().clamp(0, MAX_HTTP_DATE_SECS);
	let clamped = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();
	httpdate::fmt_http_date(SystemTime::from(clamped))
}

/// Drops sub-second precision.
pub fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
	dt.with_nanosecond(0).unwrap_or(dt)
}

/// Converts a filesystem timestamp.
pub fn from_system_time(time: SystemTime) -> DateTime<Utc> {
	DateTime::from(time)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use rstest::rstest;

	#[rstest]
	#[case("Sun, 06 Nov 1994 08:49:37 GMT")]
	#[case("Sunday, 06-Nov-94 08:49:37 GMT")]
	#[case("Sun Nov  6 08:49:37 1994")]
	#[case("1994-11-06T08:49:37Z")]
	#[case("  Sun, 06 Nov 1994 08:49:37 GMT  ")]
	fn test_parse_accepted_forms(#[case] input: &str) {
		let expected = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
		assert_eq!(parse_http_date(input), Some(expected));
	}

	#[rstest]
	#[case("")]
	#[case("-1")]
	#[case("Sun, 32 Nov 1994 08:49:37 GMT")]
	fn test_parse_rejects_garbage(#[case] input: &str) {
		assert_eq!(parse_http_date(input), None);
	}

	#[rstest]
	fn test_truncate_to_seconds() {
		let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap()
			+ chrono::Duration::milliseconds(987);
		assert_eq!(
			truncate_to_seconds(dt),
			Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap()
		);
	}

	#[rstest]
	fn test_format_clamps_out_of_range() {
		let before_epoch = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
		assert_eq!(fmt_http_date(before_epoch), "Thu, 01 Jan 1970 00:00:00 GMT");

		let far_future = DateTime::<Utc>::MAX_UTC;
		assert_eq!(fmt_http_date(far_future), "Fri, 31 Dec 9999 23:59:59 GMT");
	}

	#[rstest]
	fn test_format_drops_subseconds() {
		let dt = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap()
			+ chrono::Duration::milliseconds(750);
		assert_eq!(fmt_http_date(dt), "Wed, 21 Oct 2015 07:28:00 GMT");
	}
}
