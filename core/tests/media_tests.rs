//! Media delivery tests over the in-memory blob store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use audio_guide_core::providers::BlobStream;
use audio_guide_core::{ByteRange, Delivery, GuideError, MediaDelivery};
use audio_guide_testing::mocks::BlobRead;
use audio_guide_testing::InMemoryBlobStore;
use futures::TryStreamExt;
use std::sync::Arc;

const TRACK: &str = "tracks/intro.mp3";

fn fixture() -> (MediaDelivery, InMemoryBlobStore) {
    let blobs = InMemoryBlobStore::with_chunk_size(64);
    let bytes: Vec<u8> = (0..1000_u32).map(|i| (i % 251) as u8).collect();
    blobs.put(TRACK, bytes);
    (MediaDelivery::new(Arc::new(blobs.clone())), blobs)
}

async fn body(stream: BlobStream) -> Vec<u8> {
    stream.try_concat().await.unwrap()
}

#[tokio::test]
async fn test_no_range_serves_full_object_without_stat() {
    let (media, blobs) = fixture();

    let response = media.serve(TRACK, None).await.unwrap();
    assert_eq!(response.delivery, Delivery::Full);
    assert_eq!(response.content_type, "audio/mpeg");
    assert_eq!(body(response.body).await.len(), 1000);
    assert_eq!(blobs.stat_count(), 0);
}

#[tokio::test]
async fn test_blank_range_is_treated_as_absent() {
    let (media, blobs) = fixture();

    let response = media.serve(TRACK, Some("  ")).await.unwrap();
    assert_eq!(response.delivery, Delivery::Full);
    assert_eq!(blobs.stat_count(), 0);
}

#[tokio::test]
async fn test_range_reads_only_requested_span() {
    let (media, blobs) = fixture();

    let response = media.serve(TRACK, Some("bytes=0-99")).await.unwrap();
    let range = ByteRange { start: 0, end: 99 };
    assert_eq!(response.delivery, Delivery::Partial { range, size: 1000 });
    assert_eq!(range.content_range(1000), "bytes 0-99/1000");

    let bytes = body(response.body).await;
    assert_eq!(bytes.len(), 100);
    assert_eq!(
        blobs.reads(),
        vec![BlobRead {
            name: TRACK.to_string(),
            range: Some(range),
        }]
    );
}

#[tokio::test]
async fn test_suffix_range_serves_tail() {
    let (media, _) = fixture();

    let response = media.serve(TRACK, Some("bytes=-100")).await.unwrap();
    let Delivery::Partial { range, size } = response.delivery else {
        panic!("expected partial delivery");
    };
    assert_eq!((range.start, range.end, size), (900, 999, 1000));
}

#[tokio::test]
async fn test_open_range_is_clamped() {
    let (media, _) = fixture();

    let response = media.serve(TRACK, Some("bytes=500-")).await.unwrap();
    let Delivery::Partial { range, .. } = response.delivery else {
        panic!("expected partial delivery");
    };
    assert_eq!((range.start, range.end), (500, 999));
    assert_eq!(body(response.body).await.len(), 500);
}

#[tokio::test]
async fn test_multi_range_serves_first_span_only() {
    let (media, blobs) = fixture();

    let response = media.serve(TRACK, Some("bytes=10-19, 50-59")).await.unwrap();
    let Delivery::Partial { range, .. } = response.delivery else {
        panic!("expected partial delivery");
    };
    assert_eq!((range.start, range.end), (10, 19));
    assert_eq!(blobs.reads().len(), 1);
}

#[tokio::test]
async fn test_malformed_header_is_validation_error() {
    let (media, blobs) = fixture();

    let err = media.serve(TRACK, Some("bytes=abc")).await.unwrap_err();
    assert!(matches!(err, GuideError::Validation(_)));
    assert!(blobs.reads().is_empty());
}

#[tokio::test]
async fn test_missing_unit_separator_is_validation_error() {
    let (media, _) = fixture();

    let err = media.serve(TRACK, Some("0-99")).await.unwrap_err();
    assert!(matches!(err, GuideError::Validation(_)));
}

#[tokio::test]
async fn test_unknown_unit_is_not_satisfiable() {
    let (media, blobs) = fixture();

    let err = media.serve(TRACK, Some("items=0-10")).await.unwrap_err();
    assert!(matches!(err, GuideError::RangeNotSatisfiable(_)));
    assert!(blobs.reads().is_empty());
}

#[tokio::test]
async fn test_range_past_end_is_not_satisfiable() {
    let (media, _) = fixture();

    let err = media.serve(TRACK, Some("bytes=2000-3000")).await.unwrap_err();
    assert!(matches!(err, GuideError::RangeNotSatisfiable(_)));
}

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let (media, _) = fixture();

    let err = media.serve("tracks/missing.mp3", Some("bytes=0-1")).await.unwrap_err();
    assert!(matches!(err, GuideError::NotFound { .. }));
}

#[tokio::test]
async fn test_blob_failure_is_transient() {
    let (media, blobs) = fixture();
    blobs.set_unavailable(true);

    let err = media.serve(TRACK, None).await.unwrap_err();
    assert!(matches!(err, GuideError::Blob(_)));
    assert!(err.is_transient());
}
