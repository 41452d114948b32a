//! The facade exposes a working end-to-end surface.

use std::time::Duration;

use http::header::{CONTENT_ENCODING, ETAG, VARY};
use kinema::compression::decompress;
use kinema::prelude::*;

#[tokio::test]
async fn test_prelude_round_trip() {
	let factory = ResponseFactory::new(ResponseSettings::default());
	let key = CacheKey::from_seed("/Shows/12/Seasons").unwrap();
	let body = r#"{"Items":[{"IndexNumber":1},{"IndexNumber":2},{"IndexNumber":3}]}"#.repeat(10);
	let expected = body.clone();

	let first = factory
		.serve(
			&RequestHead::get().with_header("Accept-Encoding", "gzip"),
			ResultOptions::new("application/json")
				.with_key(key)
				.with_freshness(Duration::from_secs(30))
				.with_producer(move || async move { Ok::<_, Error>(body) }),
		)
		.await
		.unwrap();

	assert_eq!(first.status, StatusCode::OK);
	assert_eq!(first.headers[CONTENT_ENCODING], "gzip");
	assert_eq!(first.headers[VARY], "Accept-Encoding");
	let etag = first.headers[ETAG].to_str().unwrap().to_string();
	let compressed = first.body.into_bytes().await.unwrap();
	assert_eq!(
		decompress(&compressed, Encoding::Gzip).unwrap(),
		expected.as_bytes()
	);

	let second = factory
		.serve(
			&RequestHead::get().with_header("If-None-Match", &etag),
			ResultOptions::new("application/json")
				.with_key(key)
				.with_producer(|| async { Ok::<_, Error>("unused") }),
		)
		.await
		.unwrap();

	assert_eq!(second.status, StatusCode::NOT_MODIFIED);
}

#[test]
fn test_error_renders_as_json_response() {
	let response = Response::from(Error::invalid_argument("cache key must not be nil"));
	assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(response.headers["content-type"], "application/json");
}
