//! Body compression and decompression.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::{DeflateDecoder, GzDecoder};
use flate2::write::{DeflateEncoder, GzEncoder};
use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;

/// Compression error
#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
	#[error("{encoding} compression failed: {message}")]
	CompressionFailed {
		encoding: Encoding,
		message: String,
	},
	#[error("{encoding} decompression failed: {message}")]
	DecompressionFailed {
		encoding: Encoding,
		message: String,
	},
	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

impl From<CompressionError> for kinema_http::Error {
	fn from(err: CompressionError) -> Self {
		kinema_http::Error::Compression(err.to_string())
	}
}

/// Encoder tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
	/// Gzip and deflate level, 0-9.
	pub gzip_level: u32,
	/// Brotli quality, 0-11.
	pub brotli_quality: u32,
}

impl Default for CompressionConfig {
	fn default() -> Self {
		Self {
			gzip_level: 6,
			brotli_quality: 4,
		}
	}
}

impl CompressionConfig {
	/// Sets the gzip/deflate level, capped at 9.
	pub fn with_gzip_level(mut self, level: u32) -> Self {
		self.gzip_level = level.min(9);
		self
	}

	/// Sets the brotli quality, capped at 11.
	pub fn with_brotli_quality(mut self, quality: u32) -> Self {
		self.brotli_quality = quality.min(11);
		self
	}

	/// Compresses a fully buffered body.
	///
	/// # Examples
	///
	/// ```
	/// use kinema_compression::{CompressionConfig, Encoding, decompress};
	///
	/// let body = "track ".repeat(200);
	/// let config = CompressionConfig::default();
	///
	/// let compressed = config.compress(body.as_bytes(), Encoding::Brotli).unwrap();
	/// assert!(compressed.len() < body.len());
	/// assert_eq!(decompress(&compressed, Encoding::Brotli).unwrap(), body.as_bytes());
	/// ```
	pub fn compress(&self, data: &[u8], encoding: Encoding) -> Result<Vec<u8>, CompressionError> {
		let failed = |e: std::io::Error| CompressionError::CompressionFailed {
			encoding,
			message: e.to_string(),
		};

		let output = match encoding {
			Encoding::Gzip => {
				let mut encoder =
					GzEncoder::new(Vec::new(), Compression::new(self.gzip_level.min(9)));
				encoder.write_all(data)?;
				encoder.finish().map_err(failed)?
			}
			Encoding::Deflate => {
				let mut encoder =
					DeflateEncoder::new(Vec::new(), Compression::new(self.gzip_level.min(9)));
				encoder.write_all(data)?;
				encoder.finish().map_err(failed)?
			}
			Encoding::Brotli => {
				let mut output = Vec::new();
				let mut reader = std::io::Cursor::new(data);
				brotli::BrotliCompress(
					&mut reader,
					&mut output,
					&brotli::enc::BrotliEncoderParams {
						quality: self.brotli_quality.min(11) as i32,
						..Default::default()
					},
				)
				.map_err(failed)?;
				output
			}
		};

		tracing::debug!(
			%encoding,
			original = data.len(),
			compressed = output.len(),
			"compressed response body"
		);
		Ok(output)
	}
}

/// Reverses [`CompressionConfig::compress`].
pub fn decompress(data: &[u8], encoding: Encoding) -> Result<Vec<u8>, CompressionError> {
	let failed = |e: std::io::Error| CompressionError::DecompressionFailed {
		encoding,
		message: e.to_string(),
	};

	let mut output = Vec::new();
	match encoding {
		Encoding::Gzip => {
			GzDecoder::new(data).read_to_end(&mut output).map_err(failed)?;
		}
		Encoding::Deflate => {
			DeflateDecoder::new(data)
				.read_to_end(&mut output)
				.map_err(failed)?;
		}
		Encoding::Brotli => {
			let mut reader = std::io::Cursor::new(data);
			brotli::BrotliDecompress(&mut reader, &mut output).map_err(failed)?;
		}
	}
	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn playlist() -> Vec<u8> {
		(0..200)
			.map(|i| format!("#EXTINF:6.0,\nsegment_{i:04}.ts\n"))
			.collect::<String>()
			.into_bytes()
	}

	#[rstest]
	#[case(Encoding::Brotli)]
	#[case(Encoding::Gzip)]
	#[case(Encoding::Deflate)]
	fn test_compress_shrinks_and_restores(#[case] encoding: Encoding) {
		let body = playlist();
		let compressed = CompressionConfig::default().compress(&body, encoding).unwrap();

		assert!(compressed.len() < body.len());
		assert_eq!(decompress(&compressed, encoding).unwrap(), body);
	}

	#[rstest]
	fn test_gzip_magic_bytes() {
		let compressed = CompressionConfig::default()
			.compress(b"hello", Encoding::Gzip)
			.unwrap();
		assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
	}

	#[rstest]
	fn test_empty_body() {
		for encoding in Encoding::ALL {
			let compressed = CompressionConfig::default().compress(b"", encoding).unwrap();
			assert!(decompress(&compressed, encoding).unwrap().is_empty());
		}
	}

	#[rstest]
	fn test_levels_are_capped() {
		let config = CompressionConfig::default()
			.with_gzip_level(42)
			.with_brotli_quality(99);
		assert_eq!(config.gzip_level, 9);
		assert_eq!(config.brotli_quality, 11);
	}

	#[rstest]
	fn test_corrupt_input_fails_decompression() {
		let err = decompress(b"definitely not gzip", Encoding::Gzip).unwrap_err();
		assert!(matches!(err, CompressionError::DecompressionFailed { .. }));
	}

	#[rstest]
	fn test_converts_into_http_error() {
		let err: kinema_http::Error = CompressionError::CompressionFailed {
			encoding: Encoding::Brotli,
			message: "boom".into(),
		}
		.into();
		assert!(matches!(err, kinema_http::Error::Compression(_)));
	}
}
