//! Image ingestion
//!
//! Raw image bytes become data URLs here: format sniffing, proportional
//! downscaling and re-encoding. Decoding and encoding run on the blocking
//! pool.

use base64::{engine::general_purpose::STANDARD, Engine};
use doc_model::ImageData;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Error types for image store operations
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),

    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ImageStoreError>;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }
        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }
        if data.starts_with(b"BM") {
            return Self::Bmp;
        }
        Self::Unknown
    }

    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/gif" => Self::Gif,
            "image/webp" => Self::WebP,
            "image/bmp" => Self::Bmp,
            _ => Self::Unknown,
        }
    }

    /// Get the MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
            Self::Unknown => "bin",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Wrap raw image bytes as a data URL
pub fn encode(bytes: &[u8]) -> Result<ImageData> {
    let format = ImageFormat::from_bytes(bytes);
    if !format.is_supported() {
        return Err(ImageStoreError::InvalidFormat(
            "Unknown or unsupported image format".into(),
        ));
    }
    Ok(ImageData::from_base64(format.mime_type(), &STANDARD.encode(bytes)))
}

/// Raw bytes behind a data URL
pub fn decode(image: &ImageData) -> Result<Vec<u8>> {
    let payload = image
        .payload()
        .ok_or_else(|| ImageStoreError::InvalidFormat("not a base64 data URL".into()))?;
    Ok(STANDARD.decode(payload)?)
}

/// Format of a data URL, by its declared MIME type and then by its bytes
pub fn format_of(image: &ImageData, bytes: &[u8]) -> ImageFormat {
    match image.mime_type().map(ImageFormat::from_mime) {
        Some(format) if format.is_supported() => format,
        _ => ImageFormat::from_bytes(bytes),
    }
}

/// Maximum width and encoder quality applied when an image is ingested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionPreset {
    Cover,
    Logo,
    Content,
}

impl CompressionPreset {
    pub fn max_width(&self) -> u32 {
        match self {
            Self::Cover => 1920,
            Self::Logo => 400,
            Self::Content => 1200,
        }
    }

    /// Quality in `0.0..=1.0`
    pub fn quality(&self) -> f32 {
        match self {
            Self::Cover => 0.8,
            Self::Logo => 0.9,
            Self::Content => 0.8,
        }
    }
}

/// Downscale an image wider than `max_width`, keeping its aspect ratio
///
/// PNG input stays PNG; anything else is re-encoded as JPEG at `quality`.
/// Images that already fit are returned unchanged.
pub async fn compress(image: &ImageData, max_width: u32, quality: f32) -> Result<ImageData> {
    let bytes = decode(image)?;
    let format = format_of(image, &bytes);
    let original = image.clone();

    tokio::task::spawn_blocking(move || -> Result<ImageData> {
        let decoded = image::load_from_memory(&bytes)?;
        if decoded.width() <= max_width {
            return Ok(original);
        }

        let height = scaled_height(decoded.width(), decoded.height(), max_width);
        let resized = decoded.resize_exact(max_width, height, image::imageops::FilterType::Triangle);

        let mut out = Vec::new();
        let target = if format == ImageFormat::Png {
            resized.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)?;
            ImageFormat::Png
        } else {
            let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            DynamicImage::ImageRgb8(resized.to_rgb8())
                .write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))?;
            ImageFormat::Jpeg
        };
        tracing::debug!(
            from = bytes.len(),
            to = out.len(),
            width = max_width,
            "compressed image"
        );
        Ok(ImageData::from_base64(target.mime_type(), &STANDARD.encode(&out)))
    })
    .await?
}

/// Compress with a preset
pub async fn compress_with(image: &ImageData, preset: CompressionPreset) -> Result<ImageData> {
    compress(image, preset.max_width(), preset.quality()).await
}

/// Read an image file and ingest it with a preset
pub async fn ingest_file(path: impl AsRef<Path>, preset: CompressionPreset) -> Result<ImageData> {
    let bytes = tokio::fs::read(path).await?;
    let image = encode(&bytes)?;
    compress_with(&image, preset).await
}

fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = (height as f64 * target_width as f64 / width as f64).round() as u32;
    scaled.max(1)
}

/// Pixel dimensions of an image, read from its header
pub async fn probe_dimensions(image: &ImageData) -> Result<(u32, u32)> {
    let bytes = decode(image)?;
    tokio::task::spawn_blocking(move || -> Result<(u32, u32)> {
        Ok(ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?)
    })
    .await?
}

// =============================================================================
// Built-in images
// =============================================================================

/// Artwork shipped with the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInImage {
    /// Placeholder cover illustration
    Cover,
    /// Default footer logo banner
    Footer,
}

const BRAND_YELLOW: [u8; 3] = [0xfc, 0xc6, 0x03];
const BRAND_DARK: [u8; 3] = [0x1f, 0x29, 0x37];

impl BuiltInImage {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Cover => (1200, 800),
            Self::Footer => (900, 220),
        }
    }
}

/// Render a built-in image as a PNG data URL
pub fn load_built_in(kind: BuiltInImage) -> Result<ImageData> {
    let (width, height) = kind.dimensions();
    let image = match kind {
        BuiltInImage::Cover => DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            // Diagonal stripe over a vertical fade
            let band = (x + y) / 80 % 6 == 0;
            if band {
                Rgb(BRAND_YELLOW)
            } else {
                let shade = 235 - (y * 40 / height) as u8;
                Rgb([shade, shade, shade.saturating_add(8)])
            }
        })),
        BuiltInImage::Footer => {
            let stripe = height - height / 6;
            DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
                if y >= stripe {
                    Rgba([BRAND_YELLOW[0], BRAND_YELLOW[1], BRAND_YELLOW[2], 255])
                } else if x < height {
                    Rgba([BRAND_DARK[0], BRAND_DARK[1], BRAND_DARK[2], 255])
                } else {
                    Rgba([0, 0, 0, 0])
                }
            }))
        }
    };

    let mut out = Vec::new();
    image.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)?;
    encode(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 128]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    fn jpeg_of(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 100, 50]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
            .unwrap();
        out
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_bytes(&png_of(1, 1)), ImageFormat::Png);
        assert_eq!(ImageFormat::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_bytes(b"GIF89a"), ImageFormat::Gif);
        assert_eq!(ImageFormat::from_bytes(b"RIFF\0\0\0\0WEBPVP8 "), ImageFormat::WebP);
        assert_eq!(ImageFormat::from_bytes(b"BM\0\0"), ImageFormat::Bmp);
        assert_eq!(ImageFormat::from_bytes(b"hello"), ImageFormat::Unknown);
    }

    #[test]
    fn test_encode_decode() {
        let bytes = png_of(2, 2);
        let image = encode(&bytes).unwrap();
        assert!(image.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(decode(&image).unwrap(), bytes);
        assert!(matches!(encode(b"text"), Err(ImageStoreError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_compress_keeps_small_images() {
        let image = encode(&png_of(100, 50)).unwrap();
        let out = compress(&image, 400, 0.9).await.unwrap();
        assert_eq!(out, image);
    }

    #[tokio::test]
    async fn test_compress_png_stays_png() {
        let image = encode(&png_of(800, 400)).unwrap();
        let out = compress_with(&image, CompressionPreset::Logo).await.unwrap();
        assert_eq!(out.mime_type(), Some("image/png"));
        assert_eq!(probe_dimensions(&out).await.unwrap(), (400, 200));
    }

    #[tokio::test]
    async fn test_compress_jpeg() {
        let image = encode(&jpeg_of(1500, 1000)).unwrap();
        let out = compress_with(&image, CompressionPreset::Content).await.unwrap();
        assert_eq!(out.mime_type(), Some("image/jpeg"));
        assert_eq!(probe_dimensions(&out).await.unwrap(), (1200, 800));
    }

    #[test]
    fn test_presets() {
        assert_eq!(CompressionPreset::Cover.max_width(), 1920);
        assert_eq!(CompressionPreset::Logo.quality(), 0.9);
        assert_eq!(CompressionPreset::Content.max_width(), 1200);
    }

    #[tokio::test]
    async fn test_built_in_images() {
        let footer = load_built_in(BuiltInImage::Footer).unwrap();
        assert_eq!(footer.mime_type(), Some("image/png"));
        assert_eq!(probe_dimensions(&footer).await.unwrap(), (900, 220));

        let cover = load_built_in(BuiltInImage::Cover).unwrap();
        assert_eq!(probe_dimensions(&cover).await.unwrap(), (1200, 800));
    }

    #[tokio::test]
    async fn test_ingest_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("photo.jpg");
        std::fs::write(&path, jpeg_of(2400, 1200)).unwrap();

        let image = ingest_file(&path, CompressionPreset::Cover).await.unwrap();
        assert_eq!(probe_dimensions(&image).await.unwrap(), (1920, 960));
    }
}
