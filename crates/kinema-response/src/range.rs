//! Single byte-range requests.
//!
//! Only one range per request is honored. Multi-range and malformed values
//! are treated as if no `Range` header had been sent.

/// A parsed `Range: bytes=...` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
	/// `bytes=a-b`, both inclusive.
	Bounded { start: u64, end: u64 },
	/// `bytes=a-`
	From { start: u64 },
	/// `bytes=-n`, the last `n` bytes.
	Suffix { length: u64 },
}

impl ByteRange {
	/// Parses a `Range` header value.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_response::range::ByteRange;
	///
	/// assert_eq!(ByteRange::parse("bytes=0-99"), Some(ByteRange::Bounded { start: 0, end: 99 }));
	/// assert_eq!(ByteRange::parse("bytes=500-"), Some(ByteRange::From { start: 500 }));
	/// assert_eq!(ByteRange::parse("bytes=-200"), Some(ByteRange::Suffix { length: 200 }));
	/// assert_eq!(ByteRange::parse("bytes=0-1,5-9"), None);
	/// assert_eq!(ByteRange::parse("items=0-1"), None);
	/// ```
	pub fn parse(value: &str) -> Option<Self> {
		let value = value.trim();
		let (unit, ranges) = value.split_once('=')?;
		if !unit.trim().eq_ignore_ascii_case("bytes") || ranges.contains(',') {
			return None;
		}

		let (start, end) = ranges.trim().split_once('-')?;
		let (start, end) = (start.trim(), end.trim());

		match (start.is_empty(), end.is_empty()) {
			(true, true) => None,
			(true, false) => end.parse().ok().map(|length| Self::Suffix { length }),
			(false, true) => start.parse().ok().map(|start| Self::From { start }),
			(false, false) => {
				let start: u64 = start.parse().ok()?;
				let end: u64 = end.parse().ok()?;
				(start <= end).then_some(Self::Bounded { start, end })
			}
		}
	}

	/// Inclusive `(first, last)` byte offsets within a body of `len` bytes,
	/// or `None` when the range cannot be satisfied.
	pub fn resolve(self, len: u64) -> Option<(u64, u64)> {
		if len == 0 {
			return None;
		}
		let last = len - 1;

		match self {
			Self::Bounded { start, end } if start <= last => Some((start, end.min(last))),
			Self::From { start } if start <= last => Some((start, last)),
			Self::Suffix { length } if length > 0 => Some((len.saturating_sub(length), last)),
			_ => None,
		}
	}
}

/// `Content-Range` value for a satisfied range.
pub fn content_range(first: u64, last: u64, len: u64) -> String {
	format!("bytes {first}-{last}/{len}")
}

/// `Content-Range` value for a 416 response.
pub fn unsatisfied_range(len: u64) -> String {
	format!("bytes */{len}")
}
