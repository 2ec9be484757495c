//! PDF Image Handling
//!
//! JPEG payloads are embedded as-is with DCTDecode. Everything else is
//! decoded to raw RGB and flate-compressed, with the alpha channel split off
//! into a soft mask.

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use super::writer::{PdfError, Result};
use crate::image_store::{self, ImageFormat, ImageStoreError};
use doc_model::ImageData;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder};
use std::collections::HashMap;
use std::io::{Cursor, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    DCTDecode,
    FlateDecode,
}

impl ImageFilter {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageFilter::DCTDecode => "DCTDecode",
            ImageFilter::FlateDecode => "FlateDecode",
        }
    }
}

/// An image ready to be written as an XObject
#[derive(Debug, Clone)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub filter: ImageFilter,
    pub data: Vec<u8>,
    /// Flate-compressed 8-bit alpha channel
    pub soft_mask: Option<Vec<u8>>,
}

impl PdfImage {
    /// Prepare an embedded data-URL image
    pub fn from_image_data(image: &ImageData) -> Result<Self> {
        let bytes = image_store::decode(image)?;
        if image_store::format_of(image, &bytes) == ImageFormat::Jpeg {
            if let Some(jpeg) = Self::passthrough_jpeg(&bytes)? {
                return Ok(jpeg);
            }
        }
        Self::decode_raster(&bytes)
    }

    /// JPEGs in gray or RGB are embedded without re-encoding
    fn passthrough_jpeg(bytes: &[u8]) -> Result<Option<Self>> {
        let decoder = JpegDecoder::new(Cursor::new(bytes)).map_err(ImageStoreError::from)?;
        let (width, height) = decoder.dimensions();
        let color_space = match decoder.color_type() {
            ColorType::L8 => ColorSpace::DeviceGray,
            ColorType::Rgb8 => ColorSpace::DeviceRGB,
            _ => return Ok(None),
        };
        Ok(Some(Self {
            width,
            height,
            color_space,
            filter: ImageFilter::DCTDecode,
            data: bytes.to_vec(),
            soft_mask: None,
        }))
    }

    fn decode_raster(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(ImageStoreError::from)?;
        let (width, height) = (decoded.width(), decoded.height());

        let (rgb, alpha) = if decoded.color().has_alpha() {
            let rgba = decoded.to_rgba8();
            let mut rgb = Vec::with_capacity((width * height * 3) as usize);
            let mut alpha = Vec::with_capacity((width * height) as usize);
            for pixel in rgba.pixels() {
                rgb.extend_from_slice(&pixel.0[..3]);
                alpha.push(pixel.0[3]);
            }
            let opaque = alpha.iter().all(|&a| a == u8::MAX);
            (rgb, if opaque { None } else { Some(alpha) })
        } else {
            (decoded.to_rgb8().into_raw(), None)
        };

        Ok(Self {
            width,
            height,
            color_space: ColorSpace::DeviceRGB,
            filter: ImageFilter::FlateDecode,
            data: deflate(&rgb)?,
            soft_mask: alpha.as_deref().map(deflate).transpose()?,
        })
    }

    /// Image XObject stream; `soft_mask_ref` points at the written mask
    pub fn to_xobject(&self, soft_mask_ref: Option<u32>) -> PdfStream {
        let mut dict = image_dict(self.width, self.height, self.color_space);
        if let Some(mask_ref) = soft_mask_ref {
            dict.insert("SMask", PdfObject::reference(mask_ref));
        }
        PdfStream::new(self.data.clone())
            .with_dict(dict)
            .encoded_with(self.filter.pdf_name())
    }

    /// Soft mask XObject stream, if the image has transparency
    pub fn soft_mask_xobject(&self) -> Option<PdfStream> {
        self.soft_mask.as_ref().map(|mask| {
            PdfStream::new(mask.clone())
                .with_dict(image_dict(self.width, self.height, ColorSpace::DeviceGray))
                .encoded_with(ImageFilter::FlateDecode.pdf_name())
        })
    }
}

fn image_dict(width: u32, height: u32, color_space: ColorSpace) -> PdfDictionary {
    let mut dict = PdfDictionary::new().with_type("XObject");
    dict.insert("Subtype", PdfObject::name("Image"));
    dict.insert("Width", PdfObject::Integer(width as i64));
    dict.insert("Height", PdfObject::Integer(height as i64));
    dict.insert("BitsPerComponent", PdfObject::Integer(8));
    dict.insert("ColorSpace", PdfObject::name(color_space.pdf_name()));
    dict
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PdfError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PdfError::Compression(e.to_string()))
}

/// Pixel size and resource name of a registered image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    pub fn resource_name(&self) -> String {
        resource_name(self.index)
    }
}

pub fn resource_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

/// Images used by a document, each prepared once however often it appears
#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: Vec<PdfImage>,
    by_source: HashMap<ImageData, usize>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, image: &ImageData) -> Result<ImageHandle> {
        let index = match self.by_source.get(image) {
            Some(&index) => index,
            None => {
                let prepared = PdfImage::from_image_data(image)?;
                self.images.push(prepared);
                let index = self.images.len() - 1;
                self.by_source.insert(image.clone(), index);
                index
            }
        };
        let prepared = &self.images[index];
        Ok(ImageHandle {
            index,
            width: prepared.width,
            height: prepared.height,
        })
    }

    pub fn images(&self) -> &[PdfImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    fn encoded(image: DynamicImage, format: image::ImageFormat) -> ImageData {
        let mut out = Vec::new();
        image.write_to(&mut Cursor::new(&mut out), format).unwrap();
        image_store::encode(&out).unwrap()
    }

    #[test]
    fn test_jpeg_passthrough() {
        let jpeg = encoded(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([1, 2, 3]))),
            image::ImageFormat::Jpeg,
        );
        let prepared = PdfImage::from_image_data(&jpeg).unwrap();
        assert_eq!(prepared.filter, ImageFilter::DCTDecode);
        assert_eq!((prepared.width, prepared.height), (8, 4));
        assert_eq!(prepared.data, image_store::decode(&jpeg).unwrap());
        assert!(prepared.soft_mask.is_none());
    }

    #[test]
    fn test_png_with_alpha_gets_soft_mask() {
        let png = encoded(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 100]))),
            image::ImageFormat::Png,
        );
        let prepared = PdfImage::from_image_data(&png).unwrap();
        assert_eq!(prepared.filter, ImageFilter::FlateDecode);
        assert!(prepared.soft_mask_xobject().is_some());

        let xobject = prepared.to_xobject(Some(7));
        assert_eq!(xobject.dict.get("SMask"), Some(&PdfObject::reference(7)));
        assert_eq!(xobject.dict.get("Filter"), Some(&PdfObject::name("FlateDecode")));
    }

    #[test]
    fn test_opaque_png_has_no_mask() {
        let png = encoded(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]))),
            image::ImageFormat::Png,
        );
        assert!(PdfImage::from_image_data(&png).unwrap().soft_mask.is_none());
    }

    #[test]
    fn test_registry_deduplicates() {
        let png = encoded(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 2, Rgb([0, 0, 0]))),
            image::ImageFormat::Png,
        );
        let mut registry = ImageRegistry::new();
        let first = registry.register(&png).unwrap();
        let second = registry.register(&png).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.resource_name(), "Im1");
        assert_eq!((first.width, first.height), (5, 2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_payload() {
        let bogus = ImageData::from_base64("image/png", "bm90IGFuIGltYWdl");
        assert!(PdfImage::from_image_data(&bogus).is_err());
    }
}
