//! Static file metadata and chunked reading.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};
use futures::stream;
use kinema_cache::CacheKey;
use kinema_cache::http_date::from_system_time;
use kinema_http::{BoxError, Error, Result, StreamBody};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};

/// What the response layer needs to know about a file before opening it.
#[derive(Debug, Clone)]
pub struct FileMetadata {
	pub path: PathBuf,
	/// File size in bytes
	pub size: u64,
	/// Modification time, when the platform reports one
	pub modified: Option<DateTime<Utc>>,
	/// Guessed from the extension
	pub mime_type: String,
}

impl FileMetadata {
	/// Reads metadata for `path`.
	///
	/// # Errors
	///
	/// [`Error::ResourceUnavailable`] when the path does not exist, cannot be
	/// inspected, or is a directory.
	pub async fn from_path(path: &Path) -> Result<Self> {
		let metadata = tokio::fs::metadata(path)
			.await
			.map_err(|e| Error::resource_unavailable(path, e))?;

		if metadata.is_dir() {
			return Err(Error::resource_unavailable(
				path,
				io::Error::new(io::ErrorKind::NotFound, "path is a directory"),
			));
		}

		let mime_type = mime_guess::from_path(path)
			.first_or_octet_stream()
			.to_string();

		Ok(Self {
			path: path.to_path_buf(),
			size: metadata.len(),
			modified: metadata.modified().ok().map(from_system_time),
			mime_type,
		})
	}

	/// Key naming this version of the file: path plus modification ticks.
	///
	/// Falls back to the size when no modification time is available.
	pub fn derive_key(&self) -> Result<CacheKey> {
		let version = match self.modified {
			Some(modified) => modified
				.timestamp_nanos_opt()
				.unwrap_or_else(|| modified.timestamp()),
			None => self.size as i64,
		};
		CacheKey::from_seed(&format!("{}{}", self.path.display(), version))
	}
}

/// Opens `path` and seeks to `offset`.
pub async fn open_at(path: &Path, offset: u64) -> Result<File> {
	let mut file = File::open(path)
		.await
		.map_err(|e| Error::resource_unavailable(path, e))?;
	if offset > 0 {
		file.seek(SeekFrom::Start(offset))
			.await
			.map_err(|e| Error::resource_unavailable(path, e))?;
	}
	Ok(file)
}

/// Streams at most `len` bytes from `reader` in `chunk_size` pieces.
///
/// The stream owns the reader, so dropping the body (for example when the
/// client disconnects) closes the file.
pub fn chunked<R>(reader: R, len: u64, chunk_size: usize) -> StreamBody
where
	R: AsyncRead + Unpin + Send + 'static,
{
	let chunk_size = chunk_size.max(1);
	let state = Some((reader.take(len), BytesMut::with_capacity(chunk_size)));

	Box::pin(stream::unfold(state, move |state| async move {
		let Some((mut reader, mut buffer)) = state else {
			return None;
		};
		buffer.reserve(chunk_size);
		match reader.read_buf(&mut buffer).await {
			Ok(0) => None,
			Ok(_) => {
				let chunk: Bytes = buffer.split().freeze();
				Some((Ok(chunk), Some((reader, buffer))))
			}
			Err(e) => {
				tracing::warn!(error = %e, "static file read failed mid-stream");
				Some((Err(Box::new(e) as BoxError), None))
			}
		}
	}))
}

/// Reads at most `len` bytes of `file` into memory.
pub async fn read_all(file: File, len: u64) -> Result<Bytes> {
	let mut buffer = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
	file.take(len).read_to_end(&mut buffer).await?;
	Ok(Bytes::from(buffer))
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::StreamExt;
	use rstest::rstest;
	use std::io::Cursor;
	use std::pin::Pin;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicBool, Ordering};
	use std::task::{Context, Poll};
	use tempfile::TempDir;
	use tokio::io::ReadBuf;

	/// Serves `data`, then fails once `fail_after` reads have succeeded, and
	/// records when it is dropped.
	struct TrackedReader {
		data: Cursor<Vec<u8>>,
		reads: usize,
		fail_after: Option<usize>,
		dropped: Arc<AtomicBool>,
	}

	impl TrackedReader {
		fn new(data: Vec<u8>, fail_after: Option<usize>) -> (Self, Arc<AtomicBool>) {
			let dropped = Arc::new(AtomicBool::new(false));
			let reader = Self {
				data: Cursor::new(data),
				reads: 0,
				fail_after,
				dropped: dropped.clone(),
			};
			(reader, dropped)
		}
	}

	impl AsyncRead for TrackedReader {
		fn poll_read(
			mut self: Pin<&mut Self>,
			cx: &mut Context<'_>,
			buf: &mut ReadBuf<'_>,
		) -> Poll<io::Result<()>> {
			if self.fail_after == Some(self.reads) {
				return Poll::Ready(Err(io::Error::other("disk gone")));
			}
			self.reads += 1;
			Pin::new(&mut self.data).poll_read(cx, buf)
		}
	}

	impl Drop for TrackedReader {
		fn drop(&mut self) {
			self.dropped.store(true, Ordering::SeqCst);
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_chunked_respects_chunk_size_and_limit() {
		let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
		let mut stream = chunked(Cursor::new(data.clone()), 9_000, 4_096);

		let mut sizes = Vec::new();
		let mut collected = Vec::new();
		while let Some(chunk) = stream.next().await {
			let chunk = chunk.unwrap();
			assert!(chunk.len() <= 4_096);
			sizes.push(chunk.len());
			collected.extend_from_slice(&chunk);
		}

		assert_eq!(collected, &data[..9_000]);
		assert!(sizes.len() >= 3);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dropping_stream_drops_reader() {
		let (reader, dropped) = TrackedReader::new(vec![7u8; 1_000], None);
		let mut stream = chunked(reader, 1_000, 100);

		let first = stream.next().await.unwrap().unwrap();
		assert!(!first.is_empty() && first.len() <= 100);
		assert!(!dropped.load(Ordering::SeqCst));

		drop(stream);
		assert!(dropped.load(Ordering::SeqCst));
	}

	#[rstest]
	#[tokio::test]
	async fn test_reader_dropped_at_end_of_stream() {
		let (reader, dropped) = TrackedReader::new(vec![1u8; 10], None);
		let mut stream = chunked(reader, 10, 100);

		assert_eq!(stream.next().await.unwrap().unwrap().len(), 10);
		assert!(stream.next().await.is_none());
		assert!(dropped.load(Ordering::SeqCst));
	}

	#[rstest]
	#[tokio::test]
	async fn test_read_error_mid_stream_ends_stream() {
		let (reader, dropped) = TrackedReader::new(vec![3u8; 1_000], Some(2));
		let mut stream = chunked(reader, 1_000, 100);

		assert!(!stream.next().await.unwrap().unwrap().is_empty());
		assert!(!stream.next().await.unwrap().unwrap().is_empty());
		let err = stream.next().await.unwrap().unwrap_err();
		assert_eq!(err.to_string(), "disk gone");
		assert!(dropped.load(Ordering::SeqCst));
		assert!(stream.next().await.is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_read_error_surfaces_when_buffering() {
		let (reader, _dropped) = TrackedReader::new(vec![3u8; 1_000], Some(1));
		let body = kinema_http::Body::Stream(chunked(reader, 1_000, 100));

		let err = body.into_bytes().await.unwrap_err();
		assert!(matches!(err, Error::Payload(_)));
	}

	#[rstest]
	#[tokio::test]
	async fn test_metadata_for_file() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("cover.jpg");
		tokio::fs::write(&path, b"jpeg bytes").await.unwrap();

		let metadata = FileMetadata::from_path(&path).await.unwrap();
		assert_eq!(metadata.size, 10);
		assert_eq!(metadata.mime_type, "image/jpeg");
		assert!(metadata.modified.is_some());
		assert_eq!(metadata.derive_key().unwrap(), metadata.derive_key().unwrap());
	}

	#[rstest]
	#[tokio::test]
	async fn test_directory_is_unavailable() {
		let dir = TempDir::new().unwrap();
		let err = FileMetadata::from_path(dir.path()).await.unwrap_err();
		assert!(matches!(err, Error::ResourceUnavailable { .. }));
		assert_eq!(err.status_code(), http::StatusCode::NOT_FOUND);
	}

	#[rstest]
	#[tokio::test]
	async fn test_open_at_seeks() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("track.flac");
		tokio::fs::write(&path, b"0123456789").await.unwrap();

		let file = open_at(&path, 4).await.unwrap();
		assert_eq!(read_all(file, 3).await.unwrap(), Bytes::from("456"));
	}
}
