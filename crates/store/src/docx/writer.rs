//! DOCX package writer
//!
//! Assembles the ZIP archive from a [`DocxLayout`].

use super::content_types::{create_default_content_types, ContentTypes};
use super::document_writer::DocumentWriter;
use super::error::DocxResult;
use super::layout::{DocxLayout, RunContent};
use super::media_writer::media_part_name;
use super::numbering_writer::NumberingWriter;
use super::relationships::{create_document_rels, create_root_rels, Relationships};
use super::styles_writer::StylesWriter;
use std::collections::BTreeSet;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Main DOCX writer
pub struct DocxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    content_types: ContentTypes,
    root_rels: Relationships,
    doc_rels: Relationships,
}

impl<W: Write + Seek> DocxWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            content_types: create_default_content_types(),
            root_rels: create_root_rels(),
            doc_rels: create_document_rels(),
        }
    }

    /// Write the complete package and return the underlying writer
    pub fn write(mut self, layout: &DocxLayout) -> DocxResult<W> {
        let mut documents = DocumentWriter::new();

        let doc_xml = documents.write(layout);
        self.write_file("word/document.xml", &doc_xml)?;

        self.write_file("word/styles.xml", &StylesWriter::new().write())?;
        self.write_file(
            "word/numbering.xml",
            &NumberingWriter::new().write(&layout.numbering),
        )?;

        let footer_xml = documents.write_footer(&layout.footer);
        self.write_file("word/footer1.xml", &footer_xml)?;
        // First-page footer of documents opening with a cover
        let first_footer_xml = documents.write_footer(&[]);
        self.write_file("word/footer2.xml", &first_footer_xml)?;

        let footer_media = footer_media(layout);
        if !footer_media.is_empty() {
            let mut footer_rels = Relationships::new();
            footer_rels.add_media(
                footer_media
                    .iter()
                    .filter_map(|&i| layout.media.get(i).map(|item| (i, item))),
            );
            self.write_file("word/_rels/footer1.xml.rels", &footer_rels.to_xml())?;
        }

        for (index, item) in layout.media.iter().enumerate() {
            self.write_binary(&media_part_name(item, index), &item.data)?;
        }
        self.doc_rels.add_media(layout.media.iter().enumerate());
        self.content_types.add_media(&layout.media);

        let root_rels_xml = self.root_rels.to_xml();
        self.write_file("_rels/.rels", &root_rels_xml)?;

        let doc_rels_xml = self.doc_rels.to_xml();
        self.write_file("word/_rels/document.xml.rels", &doc_rels_xml)?;

        // [Content_Types].xml last, once every extension is known
        let content_types_xml = self.content_types.to_xml();
        self.write_file("[Content_Types].xml", &content_types_xml)?;

        Ok(self.zip.finish()?)
    }

    fn write_file(&mut self, path: &str, content: &str) -> DocxResult<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_binary(&mut self, path: &str, data: &[u8]) -> DocxResult<()> {
        // Pictures are already compressed
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;
        Ok(())
    }
}

/// Media indices referenced from the footer
fn footer_media(layout: &DocxLayout) -> BTreeSet<usize> {
    layout
        .footer
        .iter()
        .flat_map(|p| p.runs.iter())
        .filter_map(|run| match run.content {
            RunContent::Image { media, .. } => Some(media),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::layout::{MediaItem, Paragraph, Run, SectionProperties, NumberingPlan};
    use crate::image_store::ImageFormat;
    use std::io::{Cursor, Read};

    fn layout() -> DocxLayout {
        DocxLayout {
            title: "T".into(),
            body: Vec::new(),
            footer: vec![Paragraph::new(vec![Run::new(RunContent::Image {
                media: 1,
                width_emu: 100,
                height_emu: 50,
            })])],
            numbering: NumberingPlan::default(),
            section: SectionProperties::default(),
            media: vec![
                MediaItem {
                    data: vec![1, 2, 3],
                    format: ImageFormat::Jpeg,
                },
                MediaItem {
                    data: vec![4, 5],
                    format: ImageFormat::Png,
                },
            ],
        }
    }

    #[test]
    fn test_package_parts() {
        let cursor = DocxWriter::new(Cursor::new(Vec::new()))
            .write(&layout())
            .unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/numbering.xml",
            "word/footer1.xml",
            "word/footer2.xml",
            "word/_rels/document.xml.rels",
            "word/_rels/footer1.xml.rels",
            "word/media/image1.jpeg",
            "word/media/image2.png",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }

        let mut footer_rels = String::new();
        archive
            .by_name("word/_rels/footer1.xml.rels")
            .unwrap()
            .read_to_string(&mut footer_rels)
            .unwrap();
        assert!(footer_rels.contains("media/image2.png"));
        assert!(!footer_rels.contains("media/image1.jpeg"));
    }

    #[test]
    fn test_no_footer_rels_without_pictures() {
        let mut layout = layout();
        layout.footer.clear();
        let cursor = DocxWriter::new(Cursor::new(Vec::new()))
            .write(&layout)
            .unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert!(archive.by_name("word/_rels/footer1.xml.rels").is_err());
    }
}
