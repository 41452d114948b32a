//! Compression eligibility and Accept-Encoding negotiation.

use crate::encoding::Encoding;

/// Media type families that are already compressed on the wire.
const PRECOMPRESSED_PREFIXES: [&str; 4] = ["audio/", "video/", "image/", "font/"];

/// Whether a body of `content_type` may be compressed.
///
/// Byte-range requests are never compressed: the range applies to the
/// identity encoding. Audio, video, image and font payloads are skipped.
///
/// # Examples
///
/// ```
/// use kinema_compression::should_compress;
///
/// assert!(should_compress("text/html; charset=utf-8", false));
/// assert!(!should_compress("text/html", true));
/// assert!(!should_compress("Image/PNG", false));
/// ```
pub fn should_compress(content_type: &str, is_range_request: bool) -> bool {
	if is_range_request {
		return false;
	}

	let content_type = content_type.trim_start();
	!PRECOMPRESSED_PREFIXES.iter().any(|prefix| {
		content_type
			.get(..prefix.len())
			.is_some_and(|head| head.eq_ignore_ascii_case(prefix))
	})
}

/// Parsed Accept-Encoding entry with quality value
#[derive(Debug, Clone, Copy, PartialEq)]
struct AcceptEntry<'a> {
	coding: &'a str,
	quality: f32,
}

impl<'a> AcceptEntry<'a> {
	/// Parses an entry such as `gzip;q=0.8` or `br`.
	fn parse(s: &'a str) -> Option<Self> {
		let mut parts = s.split(';');
		let coding = parts.next()?.trim();
		if coding.is_empty() {
			return None;
		}

		let mut quality = 1.0;
		for param in parts {
			let param = param.trim();
			if let Some(value) = param
				.strip_prefix("q=")
				.or_else(|| param.strip_prefix("Q="))
			{
				quality = value.trim().parse::<f32>().ok().filter(|q| q.is_finite())?;
			}
		}

		Some(Self {
			coding,
			quality: quality.clamp(0.0, 1.0),
		})
	}
}

/// Picks the encoding to apply for an `Accept-Encoding` header value.
///
/// `offered` lists the server's enabled encodings in preference order. The
/// highest client q-value wins and ties go to the earlier offered encoding.
/// `q=0` rules an encoding out, and `*` stands for every encoding the
/// client did not name. Returns `None` when nothing acceptable is offered.
///
/// # Examples
///
/// ```
/// use kinema_compression::{Encoding, select_encoding};
///
/// let offered = [Encoding::Brotli, Encoding::Gzip, Encoding::Deflate];
///
/// assert_eq!(select_encoding("gzip, deflate, br", &offered), Some(Encoding::Brotli));
/// assert_eq!(select_encoding("br;q=0.4, gzip;q=0.8", &offered), Some(Encoding::Gzip));
/// assert_eq!(select_encoding("*, br;q=0", &offered), Some(Encoding::Gzip));
/// assert_eq!(select_encoding("identity", &offered), None);
/// ```
pub fn select_encoding(accept_encoding: &str, offered: &[Encoding]) -> Option<Encoding> {
	let entries: Vec<AcceptEntry<'_>> = accept_encoding
		.split(',')
		.filter_map(AcceptEntry::parse)
		.collect();

	let wildcard = entries
		.iter()
		.find(|entry| entry.coding == "*")
		.map(|entry| entry.quality);

	let mut best: Option<(Encoding, f32)> = None;
	for encoding in offered {
		let named = entries
			.iter()
			.find(|entry| Encoding::from_token(entry.coding) == Some(*encoding))
			.map(|entry| entry.quality);

		let Some(quality) = named.or(wildcard) else {
			continue;
		};
		if quality <= 0.0 {
			continue;
		}

		match best {
			Some((_, best_quality)) if best_quality >= quality => {}
			_ => best = Some((*encoding, quality)),
		}
	}

	best.map(|(encoding, _)| encoding)
}
