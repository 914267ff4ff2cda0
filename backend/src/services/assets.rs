//! Static report assets
//!
//! The logo is optional. Any failure to read or decode it omits the logo from
//! the report instead of failing the request.

use std::path::Path;

use shared::AssetRef;

/// Name draw instructions use to refer to the logo
pub const LOGO_ASSET: &str = "logo";

/// A decoded image ready for embedding
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// 8-bit RGB samples, row major
    pub rgb: Vec<u8>,
}

impl ImageAsset {
    /// Decode PNG or JPEG bytes
    pub fn decode(name: &str, bytes: &[u8]) -> Option<Self> {
        match image::load_from_memory(bytes) {
            Ok(decoded) => {
                let rgb = decoded.to_rgb8();
                let (width, height) = rgb.dimensions();
                if width == 0 || height == 0 {
                    return None;
                }
                Some(Self {
                    name: name.to_string(),
                    width,
                    height,
                    rgb: rgb.into_raw(),
                })
            }
            Err(e) => {
                tracing::warn!(asset = name, "Could not decode image asset: {}", e);
                None
            }
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn asset_ref(&self) -> AssetRef {
        AssetRef {
            name: self.name.clone(),
            aspect_ratio: self.aspect_ratio(),
        }
    }
}

/// Load the configured logo, if any
pub async fn load_logo(path: Option<&Path>) -> Option<ImageAsset> {
    let path = path?;
    match tokio::fs::read(path).await {
        Ok(bytes) => ImageAsset::decode(LOGO_ASSET, &bytes),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Logo unavailable, rendering without it: {}", e);
            None
        }
    }
}
