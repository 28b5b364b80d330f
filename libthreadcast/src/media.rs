//! Media attachments
//!
//! Image compression and AI video generation are done by external libraries
//! and services. This module defines their contracts, checks their output
//! against platform limits, and folds provider-specific failures into a
//! single `generation failed: {reason}` error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MediaError, Result};

/// Output image formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Parse from a MIME string (e.g., "image/jpeg")
    pub fn from_mime_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detect from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Encoded image bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub dimensions: Dimensions,
}

/// Image resizing and compression
pub trait ImageResizer: Send + Sync {
    /// Resize `image` to `target`, re-encode as `format` and compress until
    /// it fits in `max_bytes`
    ///
    /// # Errors
    ///
    /// `MediaError::SizeLimitExceeded` if maximum compression still does not
    /// meet the byte budget.
    fn resize(
        &self,
        image: &ImageData,
        target: Dimensions,
        format: ImageFormat,
        max_bytes: usize,
    ) -> Result<ImageData>;
}

/// Check a processed image against a byte budget
pub fn ensure_within_limit(image: &ImageData, max_bytes: usize) -> Result<()> {
    if image.bytes.len() > max_bytes {
        return Err(MediaError::SizeLimitExceeded {
            actual: image.bytes.len(),
            max: max_bytes,
        }
        .into());
    }
    Ok(())
}

/// Resize through `resizer` and verify the result honors `max_bytes`
pub fn resize_for_upload(
    resizer: &dyn ImageResizer,
    image: &ImageData,
    target: Dimensions,
    format: ImageFormat,
    max_bytes: usize,
) -> Result<ImageData> {
    let processed = resizer.resize(image, target, format, max_bytes)?;
    ensure_within_limit(&processed, max_bytes)?;
    Ok(processed)
}

/// Parameters for a generated video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoParams {
    pub prompt: String,
    pub duration_seconds: u32,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedVideo {
    pub provider: String,
    pub url: String,
}

/// A video generation provider
///
/// Implementations may fail with any error; [`VideoProviders::generate`]
/// normalizes it.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Lowercase provider identifier
    fn name(&self) -> &str;

    /// Whether credentials for this provider are present
    fn is_configured(&self) -> bool;

    async fn generate(
        &self,
        params: &VideoParams,
    ) -> std::result::Result<GeneratedVideo, Box<dyn std::error::Error + Send + Sync>>;
}

/// Registered video providers, in preference order
#[derive(Default)]
pub struct VideoProviders {
    providers: Vec<Box<dyn VideoGenerator>>,
}

impl VideoProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, provider: Box<dyn VideoGenerator>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Pick a provider by name, or the first configured one
    ///
    /// # Errors
    ///
    /// `MediaError::UnknownProvider` if the named provider is not registered
    /// or not configured, or if none is configured.
    pub fn select(&self, name: Option<&str>) -> Result<&dyn VideoGenerator> {
        let selected = match name {
            Some(name) => self
                .providers
                .iter()
                .find(|p| p.name() == name && p.is_configured()),
            None => self.providers.iter().find(|p| p.is_configured()),
        };

        selected
            .map(|p| &**p)
            .ok_or_else(|| MediaError::UnknownProvider(name.unwrap_or("any").to_string()).into())
    }

    /// Generate a video with the selected provider
    ///
    /// # Errors
    ///
    /// `MediaError::GenerationFailed` carrying the provider's reason, or
    /// `MediaError::UnknownProvider` from selection. Never retried.
    pub async fn generate(&self, name: Option<&str>, params: &VideoParams) -> Result<GeneratedVideo> {
        let provider = self.select(name)?;
        info!(provider = provider.name(), "Generating video");

        provider.generate(params).await.map_err(|e| {
            warn!(provider = provider.name(), error = %e, "Video generation failed");
            MediaError::GenerationFailed(e.to_string()).into()
        })
    }
}
