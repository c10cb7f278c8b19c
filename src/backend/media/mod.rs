//! Media Store Collaborator
//!
//! The blob store is external; this module holds the `uploadImage(bytes) ->
//! URL` boundary: a trait, an HTTP client implementation for a remote blob
//! service, a filesystem implementation for development and tests, and the
//! bounded retry the callers use.
//!
//! An upload that fails after retries aborts the whole originating
//! operation (message send or profile update); nothing partial is
//! persisted.

use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;
use thiserror::Error;

/// HTTP-backed implementation
pub mod http;

/// Filesystem-backed implementation
pub mod local;

pub use http::HttpMediaStore;
pub use local::LocalMediaStore;

/// How many times an upload is attempted before the operation fails
pub const UPLOAD_ATTEMPTS: u32 = 3;

/// Fixed delay between attempts
pub const UPLOAD_RETRY_BACKOFF: Duration = Duration::from_millis(400);

/// Media collaborator errors
#[derive(Debug, Error, Clone)]
pub enum MediaError {
    /// The inline payload was not decodable image data
    #[error("invalid image payload: {0}")]
    Decode(String),

    /// The blob store rejected or failed the upload
    #[error("upload failed: {0}")]
    Upload(String),
}

/// External blob storage boundary
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store the image bytes and return a public URL for them
    async fn upload_image(&self, bytes: &[u8]) -> Result<String, MediaError>;
}

/// Decode an inline image payload: raw base64, or a `data:*;base64,` URI
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, MediaError> {
    let encoded = match payload.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => payload,
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| MediaError::Decode(e.to_string()))
}

/// Upload with bounded retry and fixed backoff
///
/// Decode failures are not retried; they cannot succeed on a second try.
pub async fn upload_with_retry(
    store: &dyn MediaStore,
    bytes: &[u8],
) -> Result<String, MediaError> {
    let mut last_error = None;
    for attempt in 1..=UPLOAD_ATTEMPTS {
        match store.upload_image(bytes).await {
            Ok(url) => return Ok(url),
            Err(e) => {
                tracing::warn!(attempt, "image upload attempt failed: {}", e);
                last_error = Some(e);
                if attempt < UPLOAD_ATTEMPTS {
                    tokio::time::sleep(UPLOAD_RETRY_BACKOFF).await;
                }
            }
        }
    }
    Err(last_error.unwrap_or_else(|| MediaError::Upload("no attempts made".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyStore {
        calls: AtomicU32,
        succeed_on: u32,
    }

    #[async_trait]
    impl MediaStore for FlakyStore {
        async fn upload_image(&self, _bytes: &[u8]) -> Result<String, MediaError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.succeed_on {
                Ok("https://media.example/img".to_string())
            } else {
                Err(MediaError::Upload("transient".into()))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_from_transient_failures() {
        let store = FlakyStore {
            calls: AtomicU32::new(0),
            succeed_on: 3,
        };
        let url = upload_with_retry(&store, b"png").await.unwrap();
        assert_eq!(url, "https://media.example/img");
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_bounded_attempts() {
        let store = FlakyStore {
            calls: AtomicU32::new(0),
            succeed_on: u32::MAX,
        };
        let err = upload_with_retry(&store, b"png").await.unwrap_err();
        assert!(matches!(err, MediaError::Upload(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), UPLOAD_ATTEMPTS);
    }

    #[test]
    fn test_decode_data_uri_and_raw_base64() {
        let bytes = b"hello";
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

        assert_eq!(decode_image_payload(&encoded).unwrap(), bytes);
        let uri = format!("data:image/png;base64,{}", encoded);
        assert_eq!(decode_image_payload(&uri).unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_image_payload("!!not-base64!!"),
            Err(MediaError::Decode(_))
        ));
    }
}
