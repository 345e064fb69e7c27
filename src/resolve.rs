//! Asset resolution: fetches background and profile images before a render.
//!
//! `AssetResolver` keeps all fetching concerns out of the renderer, which
//! only ever sees decoded images (or `None`). Supports `http(s)://` URLs via
//! a shared HTTP client, inline `data:…;base64,` payloads, and bare
//! filesystem paths. Downloads are cached per URI so repeated snapshots of
//! the same spec do not re-fetch.
//!
//! An unresolvable or undecodable URI is non-fatal: the renderer receives
//! `None` and draws its placeholder, the broken-image analog.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::DynamicImage;

use crate::card::CardSpec;
use crate::color::is_hex_color;

/// Decoded images for one render cycle.
#[derive(Debug, Default)]
pub struct ResolvedAssets {
    /// Background image, when the background field is a URI.
    pub background: Option<DynamicImage>,
    /// Profile photo, when the spec shows an image box.
    pub profile: Option<DynamicImage>,
}

/// Fetches and caches the images a card spec references.
pub struct AssetResolver {
    client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, DynamicImage>>>,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("credencial/0.1")
                .build()
                .expect("failed to build HTTP client"),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolve every image the spec references.
    pub async fn resolve(&self, spec: &CardSpec) -> ResolvedAssets {
        let background = if is_hex_color(&spec.background) {
            None
        } else {
            self.fetch(&spec.background).await
        };
        let profile = if spec.image.is_some() {
            self.fetch(&spec.data.image).await
        } else {
            None
        };
        ResolvedAssets {
            background,
            profile,
        }
    }

    /// Fetch and decode one URI, consulting the cache first.
    async fn fetch(&self, uri: &str) -> Option<DynamicImage> {
        if uri.is_empty() {
            return None;
        }

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(uri) {
                return Some(cached.clone());
            }
        }

        let bytes = self.fetch_bytes(uri).await?;
        let decoded = match image::load_from_memory(&bytes) {
            Ok(img) => img,
            Err(e) => {
                println!("[resolve] failed to decode {uri}: {e}");
                return None;
            }
        };

        let mut cache = self.cache.write().await;
        cache.insert(uri.to_string(), decoded.clone());
        Some(decoded)
    }

    async fn fetch_bytes(&self, uri: &str) -> Option<Vec<u8>> {
        if let Some(payload) = uri.strip_prefix("data:") {
            let encoded = match payload.split_once(";base64,") {
                Some((_, encoded)) => encoded,
                None => {
                    println!("[resolve] unsupported data URI encoding");
                    return None;
                }
            };
            return match BASE64.decode(encoded) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    println!("[resolve] bad base64 payload: {e}");
                    None
                }
            };
        }

        if uri.starts_with("http://") || uri.starts_with("https://") {
            let response = match self.client.get(uri).send().await {
                Ok(r) => r,
                Err(e) => {
                    println!("[resolve] download failed for {uri}: {e}");
                    return None;
                }
            };
            if !response.status().is_success() {
                println!("[resolve] {} returned {}", uri, response.status());
                return None;
            }
            return match response.bytes().await {
                Ok(bytes) => Some(bytes.to_vec()),
                Err(e) => {
                    println!("[resolve] read failed for {uri}: {e}");
                    None
                }
            };
        }

        // Bare path: local file
        match tokio::fs::read(uri).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                println!("[resolve] cannot read {uri}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::to_png;
    use image::{Rgba, RgbaImage};

    fn sample_data_uri() -> String {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let png = to_png(&img).unwrap();
        format!("data:image/png;base64,{}", BASE64.encode(&png))
    }

    fn spec_with(background: &str, profile: &str) -> CardSpec {
        serde_json::from_str(&format!(
            r##"{{
                "data": {{ "image": "{profile}", "barcode": "1", "name": "A" }},
                "background": "{background}",
                "barcode": {{ "x": 0, "y": 0, "width": 10, "height": 5 }},
                "image": {{ "x": 0, "y": 0, "width": 4, "height": 4 }},
                "name": {{ "x": 0, "y": 0, "width": 10, "color": "#000", "fontSize": 5 }}
            }}"##
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_hex_background_skips_fetch() {
        let resolver = AssetResolver::new();
        let assets = resolver.resolve(&spec_with("#112233", "")).await;
        assert!(assets.background.is_none());
    }

    #[tokio::test]
    async fn test_data_uri_profile_decodes() {
        let resolver = AssetResolver::new();
        let uri = sample_data_uri();
        let assets = resolver.resolve(&spec_with("#fff", &uri)).await;
        let profile = assets.profile.expect("data URI should decode");
        assert_eq!(profile.width(), 4);
    }

    #[tokio::test]
    async fn test_cache_serves_repeat_fetch() {
        let resolver = AssetResolver::new();
        let uri = sample_data_uri();
        resolver.fetch(&uri).await.unwrap();
        assert!(resolver.cache.read().await.contains_key(&uri));
        // Second fetch hits the cache path
        assert!(resolver.fetch(&uri).await.is_some());
    }

    #[tokio::test]
    async fn test_unresolvable_is_none() {
        let resolver = AssetResolver::new();
        assert!(resolver.fetch("/no/such/file.png").await.is_none());
        assert!(resolver.fetch("data:image/png;base64,!!!").await.is_none());
    }
}
