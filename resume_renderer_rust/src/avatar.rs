//! Avatar loading
//!
//! The avatar reference on a profile can be a `data:` URI, an http(s) URL or
//! a local path. Loading is the only await point of a render and is always
//! time-boxed; any failure just means the resume is drawn without a picture.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use reqwest::Client;

use crate::error::{RendererError, RendererResult};
use crate::image_utils::{prepare_avatar, AvatarImage};

/// Source of raw avatar image bytes
#[async_trait]
pub trait AvatarLoader: Send + Sync {
    async fn load(&self, reference: &str) -> RendererResult<Vec<u8>>;
}

/// Resolves `data:` URIs, http(s) URLs and filesystem paths
#[derive(Debug, Clone, Default)]
pub struct DefaultAvatarLoader {
    client: Client,
}

impl DefaultAvatarLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_http(&self, url: &str) -> RendererResult<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl AvatarLoader for DefaultAvatarLoader {
    async fn load(&self, reference: &str) -> RendererResult<Vec<u8>> {
        if reference.starts_with("data:") {
            return decode_data_uri(reference);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return self.fetch_http(reference).await;
        }
        let path = reference.strip_prefix("file://").unwrap_or(reference);
        Ok(tokio::fs::read(path).await?)
    }
}

/// Decode a base64 `data:<mime>;base64,<payload>` URI
pub fn decode_data_uri(uri: &str) -> RendererResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RendererError::AvatarFetch("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| RendererError::AvatarFetch("data URI has no payload".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(RendererError::AvatarFetch(
            "only base64 data URIs are supported".to_string(),
        ));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| RendererError::AvatarFetch(format!("invalid base64 payload: {}", e)))
}

/// Load, decode and crop an avatar within `timeout`
///
/// Returns `None` when the reference is empty or anything goes wrong.
pub async fn load_avatar(
    loader: &dyn AvatarLoader,
    reference: &str,
    timeout: Duration,
    pixels: u32,
) -> Option<AvatarImage> {
    let reference = reference.trim();
    if reference.is_empty() {
        debug!("No avatar reference, skipping avatar");
        return None;
    }

    let fetch_and_crop = async {
        let bytes = loader.load(reference).await?;
        let len = bytes.len();
        // decode and resize are CPU-bound; keep them off the executor
        let avatar = tokio::task::spawn_blocking(move || prepare_avatar(&bytes, pixels))
            .await
            .map_err(|e| {
                RendererError::ImageError(format!("avatar decode task failed: {}", e))
            })??;
        Ok::<_, RendererError>((len, avatar))
    };

    match tokio::time::timeout(timeout, fetch_and_crop).await {
        Ok(Ok((len, avatar))) => {
            debug!("Avatar loaded: {} bytes, cropped to {}px", len, avatar.size);
            Some(avatar)
        }
        Ok(Err(e)) => {
            warn!("Avatar skipped, rendering without it: {}", e);
            None
        }
        Err(_) => {
            warn!("Avatar load timed out after {:?}, rendering without it", timeout);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    struct PendingLoader;

    #[async_trait]
    impl AvatarLoader for PendingLoader {
        async fn load(&self, _reference: &str) -> RendererResult<Vec<u8>> {
            std::future::pending().await
        }
    }

    /// Returns the same bytes immediately
    struct BytesLoader(Vec<u8>);

    #[async_trait]
    impl AvatarLoader for BytesLoader {
        async fn load(&self, _reference: &str) -> RendererResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    fn png_bytes(side: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(side, side, Rgba([10, 120, 200, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn png_data_uri() -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(12)))
    }

    #[test]
    fn test_decode_data_uri() {
        assert_eq!(decode_data_uri("data:text/plain;base64,aGk=").unwrap(), b"hi".to_vec());
        assert!(decode_data_uri("data:text/plain,hi").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[tokio::test]
    async fn test_load_avatar_from_data_uri() {
        let loader = DefaultAvatarLoader::new();
        let avatar = load_avatar(&loader, &png_data_uri(), Duration::from_secs(1), 16).await;
        let avatar = avatar.unwrap();
        assert_eq!(avatar.size, 16);
    }

    #[tokio::test]
    async fn test_load_avatar_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.bin");
        std::fs::write(&path, b"not an image").unwrap();

        let loader = DefaultAvatarLoader::new();
        let bytes = loader.load(&format!("file://{}", path.display())).await.unwrap();
        assert_eq!(bytes, b"not an image".to_vec());

        // readable but undecodable
        let reference = path.to_str().unwrap();
        let avatar = load_avatar(&loader, reference, Duration::from_secs(1), 16).await;
        assert!(avatar.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_skipped() {
        let loader = DefaultAvatarLoader::new();
        let reference = "/no/such/avatar.png";
        let avatar = load_avatar(&loader, reference, Duration::from_secs(1), 16).await;
        assert!(avatar.is_none());
    }

    #[tokio::test]
    async fn test_empty_reference_is_skipped() {
        let avatar = load_avatar(&PendingLoader, "   ", Duration::from_secs(1), 16).await;
        assert!(avatar.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_load_times_out() {
        let started = tokio::time::Instant::now();
        let reference = "https://example.invalid/a.png";
        let avatar = load_avatar(&PendingLoader, reference, Duration::from_secs(3), 16).await;
        assert!(avatar.is_none());
        assert!(started.elapsed() <= Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_slow_decode_counts_against_timeout() {
        let loader = BytesLoader(png_bytes(3000));
        let started = std::time::Instant::now();
        let avatar = load_avatar(&loader, "big.png", Duration::from_millis(20), 200).await;
        assert!(avatar.is_none());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_small_avatar_decodes_within_timeout() {
        let loader = BytesLoader(png_bytes(40));
        let avatar = load_avatar(&loader, "small.png", Duration::from_secs(5), 16).await;
        assert_eq!(avatar.map(|a| a.size), Some(16));
    }

    #[tokio::test]
    async fn test_custom_client_loader() {
        let client = Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        let loader = DefaultAvatarLoader::with_client(client);
        let avatar = load_avatar(&loader, &png_data_uri(), Duration::from_secs(1), 8).await;
        assert!(avatar.is_some());
    }
}
