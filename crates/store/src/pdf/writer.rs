//! PDF file writer
//!
//! Object numbering, stream compression, the cross-reference table and
//! the trailer. [`PdfDocumentWriter`] lays out a whole document from
//! paginated pages and the images they reference.

use super::document::{create_catalog, create_pages, DocumentInfo, PdfPage};
use super::fonts::{create_font_dict, PdfFont};
use super::images::{resource_name, ImageRegistry};
use super::objects::{PdfDictionary, PdfObject, PdfSerializer, PdfStream};
use super::options::PdfExportOptions;
use super::renderer::{render_page, PageRenderInfo};
use crate::image_store::ImageStoreError;
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;

pub const PDF_VERSION: &str = "1.4";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    #[error("Compression error: {0}")]
    Compression(String),
    #[error("Image error: {0}")]
    Image(#[from] ImageStoreError),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Low-level writer tracking object offsets
pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// (object number, byte offset)
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            compress: true,
        }
    }

    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_str(&format!("%PDF-{}\n", PDF_VERSION))?;
        // Binary marker
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    fn write_body(&mut self, obj_num: u32, body: Vec<u8>) -> Result<()> {
        self.offsets.push((obj_num, self.position));
        self.write_str(&format!("{} 0 obj\n", obj_num))?;
        self.write_bytes(&body)?;
        self.write_str("\nendobj\n")
    }

    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(object)?;
        self.write_body(obj_num, serializer.into_inner())
    }

    /// Write a stream, deflating it unless it already carries a filter
    pub fn write_stream_object(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.compressed {
            stream = compress_stream(stream)?;
        }
        stream
            .dict
            .insert("Length", PdfObject::Integer(stream.data.len() as i64));

        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_stream(&stream)?;
        self.write_body(obj_num, serializer.into_inner())
    }

    pub fn write_xref_and_trailer(&mut self, catalog_ref: u32, info_ref: u32) -> Result<()> {
        let xref_offset = self.position;
        let mut offsets = std::mem::take(&mut self.offsets);
        offsets.sort_by_key(|(num, _)| *num);

        self.write_str(&format!("xref\n0 {}\n", self.next_obj_num))?;
        self.write_str("0000000000 65535 f \n")?;
        let mut expected = 1u32;
        for (num, offset) in &offsets {
            while expected < *num {
                self.write_str("0000000000 65535 f \n")?;
                expected += 1;
            }
            self.write_str(&format!("{:010} 00000 n \n", offset))?;
            expected = num + 1;
        }

        let mut trailer = PdfDictionary::new();
        trailer.insert("Size", PdfObject::Integer(self.next_obj_num as i64));
        trailer.insert("Root", PdfObject::reference(catalog_ref));
        trailer.insert("Info", PdfObject::reference(info_ref));
        self.write_str("trailer\n")?;
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(&PdfObject::Dictionary(trailer))?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_str(&format!("\nstartxref\n{}\n%%EOF\n", xref_offset))
    }

    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn compress_stream(mut stream: PdfStream) -> Result<PdfStream> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&stream.data)
        .map_err(|e| PdfError::Compression(e.to_string()))?;
    stream.data = encoder
        .finish()
        .map_err(|e| PdfError::Compression(e.to_string()))?;
    Ok(stream.encoded_with("FlateDecode"))
}

/// Writes a complete document from paginated pages
pub struct PdfDocumentWriter {
    options: PdfExportOptions,
}

impl PdfDocumentWriter {
    pub fn new(options: PdfExportOptions) -> Self {
        Self { options }
    }

    pub fn write<W: Write>(
        &self,
        pages: &[PageRenderInfo],
        images: &ImageRegistry,
        writer: W,
    ) -> Result<()> {
        if pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }

        let mut pdf = PdfWriter::new(writer);
        pdf.set_compression(self.options.compress);
        pdf.write_header()?;

        let catalog_ref = pdf.allocate_object();
        let pages_ref = pdf.allocate_object();
        let info_ref = pdf.allocate_object();

        let used_fonts = pages
            .iter()
            .flat_map(PageRenderInfo::fonts)
            .collect::<std::collections::BTreeSet<PdfFont>>();
        let font_refs: BTreeMap<PdfFont, u32> = used_fonts
            .into_iter()
            .map(|font| (font, pdf.allocate_object()))
            .collect();

        // (image object, soft mask object) per registered image
        let image_refs: Vec<(u32, Option<u32>)> = images
            .images()
            .iter()
            .map(|image| {
                let obj = pdf.allocate_object();
                let mask = image.soft_mask.as_ref().map(|_| pdf.allocate_object());
                (obj, mask)
            })
            .collect();

        let page_refs: Vec<(u32, u32)> = pages
            .iter()
            .map(|_| (pdf.allocate_object(), pdf.allocate_object()))
            .collect();

        pdf.write_object(catalog_ref, &PdfObject::Dictionary(create_catalog(pages_ref)))?;
        let kids: Vec<u32> = page_refs.iter().map(|(page, _)| *page).collect();
        pdf.write_object(pages_ref, &PdfObject::Dictionary(create_pages(&kids)))?;

        let mut info = DocumentInfo::new();
        info.title = self.options.title.clone();
        info.author = self.options.author.clone();
        info.creation_date = self.options.creation_date;
        pdf.write_object(info_ref, &PdfObject::Dictionary(info.to_dictionary()))?;

        for (font, obj) in &font_refs {
            pdf.write_object(*obj, &PdfObject::Dictionary(create_font_dict(*font)))?;
        }

        for (image, (obj, mask)) in images.images().iter().zip(&image_refs) {
            if let (Some(mask_obj), Some(mask_stream)) = (mask, image.soft_mask_xobject()) {
                pdf.write_stream_object(*mask_obj, mask_stream)?;
            }
            pdf.write_stream_object(*obj, image.to_xobject(*mask))?;
        }

        for (page, (page_ref, content_ref)) in pages.iter().zip(&page_refs) {
            let content = render_page(page);
            pdf.write_stream_object(*content_ref, PdfStream::new(content.into_bytes()))?;

            let fonts = page
                .fonts()
                .into_iter()
                .filter_map(|font| {
                    font_refs
                        .get(&font)
                        .map(|obj| (font.resource_name().to_string(), *obj))
                })
                .collect();
            let xobjects = page
                .images()
                .into_iter()
                .map(|index| {
                    image_refs
                        .get(index)
                        .map(|(obj, _)| (resource_name(index), *obj))
                        .ok_or_else(|| {
                            PdfError::InvalidDocument(format!("Unregistered image {}", index))
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            let page_obj = PdfPage {
                width: page.width,
                height: page.height,
                content_ref: *content_ref,
                fonts,
                xobjects,
            };
            pdf.write_object(*page_ref, &PdfObject::Dictionary(page_obj.to_dictionary(pages_ref)))?;
        }

        pdf.write_xref_and_trailer(catalog_ref, info_ref)?;
        pdf.finish()?;
        Ok(())
    }

    pub fn write_to_bytes(&self, pages: &[PageRenderInfo], images: &ImageRegistry) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(pages, images, &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::renderer::{PdfRenderItem, TextRenderInfo};

    fn page_with_text(text: &str) -> PageRenderInfo {
        let mut page = PageRenderInfo::new(595.28, 841.89);
        page.add_item(PdfRenderItem::Text(TextRenderInfo {
            text: text.to_string(),
            x: 40.0,
            baseline: 60.0,
            font: PdfFont::Helvetica,
            size: 11.0,
        }));
        page
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle.as_bytes())
            .count()
    }

    #[test]
    fn test_header_and_trailer() {
        let writer = PdfDocumentWriter::new(PdfExportOptions::default());
        let bytes = writer
            .write_to_bytes(&[page_with_text("Olá")], &ImageRegistry::new())
            .unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert_eq!(count(&bytes, "/Type /Page "), 1);
        assert_eq!(count(&bytes, "/BaseFont /Helvetica"), 1);
    }

    #[test]
    fn test_uncompressed_content_is_readable() {
        let options = PdfExportOptions::new().with_compression(false);
        let bytes = PdfDocumentWriter::new(options)
            .write_to_bytes(&[page_with_text("abc")], &ImageRegistry::new())
            .unwrap();
        assert_eq!(count(&bytes, "(abc) Tj"), 1);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let bytes = PdfDocumentWriter::new(PdfExportOptions::default())
            .write_to_bytes(&[page_with_text("a"), page_with_text("b")], &ImageRegistry::new())
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        let xref = text.rfind("xref\n").unwrap();
        let entries: Vec<&str> = text[xref..].lines().skip(3).take_while(|l| l.ends_with(" n ")).collect();
        assert!(!entries.is_empty());
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(expected.as_bytes()), "entry {}", i + 1);
        }
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let result = PdfDocumentWriter::new(PdfExportOptions::default()).write_to_bytes(&[], &ImageRegistry::new());
        assert!(matches!(result, Err(PdfError::InvalidDocument(_))));
    }
}
