//! document.xml and footer writer

use super::escape_xml;
use super::layout::{BodyElement, DocxLayout, Paragraph, Run, RunContent, SectionProperties};
use super::media_writer::{inline_drawing, media_rel_id};
use super::namespaces;
use super::tables_writer::TableWriter;

/// Relationship ids of the footer parts in document.xml.rels
pub const DEFAULT_FOOTER_REL_ID: &str = "rId3";
pub const FIRST_FOOTER_REL_ID: &str = "rId4";

/// Writer for document.xml and the footer parts
///
/// Drawing ids must be unique across the document, so one writer is used
/// for every part.
pub struct DocumentWriter {
    next_drawing_id: u32,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self { next_drawing_id: 1 }
    }

    pub fn write(&mut self, layout: &DocxLayout) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}">"#,
            namespaces::W,
            namespaces::R,
            namespaces::WP,
            namespaces::A,
            namespaces::PIC,
        ));
        xml.push_str("<w:body>");

        let mut elements = layout.body.iter().peekable();
        while let Some(element) = elements.next() {
            match element {
                BodyElement::Paragraph(paragraph) => self.write_paragraph(&mut xml, paragraph),
                BodyElement::Table(table) => {
                    TableWriter::new().write_table(&mut xml, table);
                    // Adjacent tables merge into one without a paragraph between them
                    if matches!(elements.peek(), Some(BodyElement::Table(_))) {
                        xml.push_str("<w:p/>");
                    }
                }
            }
        }

        write_section_properties(&mut xml, &layout.section);
        xml.push_str("</w:body>");
        xml.push_str("</w:document>");
        xml
    }

    /// A footer part holding `paragraphs`; an empty slice yields an empty footer
    pub fn write_footer(&mut self, paragraphs: &[Paragraph]) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:ftr xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}">"#,
            namespaces::W,
            namespaces::R,
            namespaces::WP,
            namespaces::A,
            namespaces::PIC,
        ));
        if paragraphs.is_empty() {
            // A footer needs at least one block-level element
            xml.push_str("<w:p/>");
        }
        for paragraph in paragraphs {
            self.write_paragraph(&mut xml, paragraph);
        }
        xml.push_str("</w:ftr>");
        xml
    }

    pub fn write_paragraph(&mut self, xml: &mut String, paragraph: &Paragraph) {
        xml.push_str("<w:p>");
        write_paragraph_properties(xml, paragraph);
        for run in &paragraph.runs {
            self.write_run(xml, run);
        }
        xml.push_str("</w:p>");
    }

    fn write_run(&mut self, xml: &mut String, run: &Run) {
        if run.content == RunContent::PageNumber {
            // Complex field: begin, instruction, separator, placeholder, end
            let props = run_properties(run);
            xml.push_str(&format!(r#"<w:r>{}<w:fldChar w:fldCharType="begin"/></w:r>"#, props));
            xml.push_str(&format!(
                r#"<w:r>{}<w:instrText xml:space="preserve"> PAGE </w:instrText></w:r>"#,
                props
            ));
            xml.push_str(&format!(r#"<w:r>{}<w:fldChar w:fldCharType="separate"/></w:r>"#, props));
            xml.push_str(&format!(r#"<w:r>{}<w:t>1</w:t></w:r>"#, props));
            xml.push_str(&format!(r#"<w:r>{}<w:fldChar w:fldCharType="end"/></w:r>"#, props));
            return;
        }

        xml.push_str("<w:r>");
        xml.push_str(&run_properties(run));
        match &run.content {
            RunContent::Text(text) => {
                xml.push_str(&format!(
                    r#"<w:t xml:space="preserve">{}</w:t>"#,
                    escape_xml(text)
                ));
            }
            RunContent::Break => xml.push_str("<w:br/>"),
            RunContent::Image {
                media,
                width_emu,
                height_emu,
            } => {
                let id = self.next_drawing_id;
                self.next_drawing_id += 1;
                xml.push_str(&inline_drawing(
                    &media_rel_id(*media),
                    id,
                    *width_emu,
                    *height_emu,
                ));
            }
            RunContent::PageNumber => {}
        }
        xml.push_str("</w:r>");
    }
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_paragraph_properties(xml: &mut String, paragraph: &Paragraph) {
    let mut props = String::new();
    if let Some(style) = &paragraph.style {
        props.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape_xml(style)));
    }
    if paragraph.page_break_before {
        props.push_str("<w:pageBreakBefore/>");
    }
    if let Some(numbering) = paragraph.numbering {
        props.push_str(&format!(
            r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
            numbering.level, numbering.num_id
        ));
    }
    if !paragraph.spacing.is_empty() {
        props.push_str("<w:spacing");
        if let Some(before) = paragraph.spacing.before {
            props.push_str(&format!(r#" w:before="{}""#, before));
        }
        if let Some(after) = paragraph.spacing.after {
            props.push_str(&format!(r#" w:after="{}""#, after));
        }
        if let Some(line) = paragraph.spacing.line {
            props.push_str(&format!(r#" w:line="{}" w:lineRule="auto""#, line));
        }
        props.push_str("/>");
    }
    if let Some(alignment) = paragraph.alignment {
        props.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment.as_str()));
    }

    if !props.is_empty() {
        xml.push_str("<w:pPr>");
        xml.push_str(&props);
        xml.push_str("</w:pPr>");
    }
}

pub(super) fn run_properties(run: &Run) -> String {
    let mut props = String::new();
    if run.bold {
        props.push_str("<w:b/><w:bCs/>");
    }
    if run.italic {
        props.push_str("<w:i/><w:iCs/>");
    }
    if let Some(size) = run.size {
        props.push_str(&format!(r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size));
    }
    if props.is_empty() {
        props
    } else {
        format!("<w:rPr>{}</w:rPr>", props)
    }
}

fn write_section_properties(xml: &mut String, section: &SectionProperties) {
    let (width, height) = section.page_twips();
    let m = &section.margins;
    xml.push_str("<w:sectPr>");
    xml.push_str(&format!(
        r#"<w:footerReference w:type="default" r:id="{}"/>"#,
        DEFAULT_FOOTER_REL_ID
    ));
    if section.title_page {
        xml.push_str(&format!(
            r#"<w:footerReference w:type="first" r:id="{}"/>"#,
            FIRST_FOOTER_REL_ID
        ));
    }
    xml.push_str(&format!(r#"<w:pgSz w:w="{}" w:h="{}"/>"#, width, height));
    xml.push_str(&format!(
        r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="0"/>"#,
        m.top, m.right, m.bottom, m.left, m.header, m.footer
    ));
    if section.title_page {
        xml.push_str("<w:titlePg/>");
    }
    xml.push_str("</w:sectPr>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::layout::{Alignment, NumberingRef, Spacing};

    fn paragraph_xml(paragraph: &Paragraph) -> String {
        let mut xml = String::new();
        DocumentWriter::new().write_paragraph(&mut xml, paragraph);
        xml
    }

    #[test]
    fn test_paragraph_properties_order() {
        let paragraph = Paragraph::new(vec![Run::text("x")])
            .style("ListParagraph")
            .numbering(NumberingRef { num_id: 2, level: 0 })
            .spacing(Spacing::new(Some(300), Some(200)))
            .align(Alignment::Center);
        let xml = paragraph_xml(&paragraph);

        let style = xml.find("w:pStyle").unwrap();
        let num = xml.find("w:numPr").unwrap();
        let spacing = xml.find("w:spacing").unwrap();
        let jc = xml.find("w:jc").unwrap();
        assert!(style < num && num < spacing && spacing < jc);
        assert!(xml.contains(r#"w:before="300" w:after="200""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = paragraph_xml(&Paragraph::new(vec![Run::text("a < b & c")]));
        assert!(xml.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_run_properties() {
        let run = Run::text("x").bold().italic().size(22);
        assert_eq!(
            run_properties(&run),
            r#"<w:rPr><w:b/><w:bCs/><w:i/><w:iCs/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr>"#
        );
        assert_eq!(run_properties(&Run::text("x")), "");
    }

    #[test]
    fn test_page_field() {
        let xml = paragraph_xml(&Paragraph::new(vec![Run::new(RunContent::PageNumber).size(20)]));
        assert!(xml.contains(r#"<w:instrText xml:space="preserve"> PAGE </w:instrText>"#));
        assert_eq!(xml.matches("w:fldChar ").count(), 3);
    }

    #[test]
    fn test_drawing_ids_are_unique() {
        let picture = || {
            Run::new(RunContent::Image {
                media: 0,
                width_emu: 10,
                height_emu: 10,
            })
        };
        let mut writer = DocumentWriter::new();
        let mut xml = String::new();
        writer.write_paragraph(&mut xml, &Paragraph::new(vec![picture()]));
        let footer = writer.write_footer(&[Paragraph::new(vec![picture()])]);
        assert!(xml.contains(r#"<wp:docPr id="1""#));
        assert!(footer.contains(r#"<wp:docPr id="2""#));
    }

    #[test]
    fn test_empty_footer_has_a_paragraph() {
        let xml = DocumentWriter::new().write_footer(&[]);
        assert!(xml.contains("<w:ftr"));
        assert!(xml.contains("<w:p/>"));
    }
}
