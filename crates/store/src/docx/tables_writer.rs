//! Table writer
//!
//! Generates w:tbl elements: full-width, single borders on every edge and
//! gridline, shaded bold header row.

use super::document_writer::run_properties;
use super::escape_xml;
use super::layout::{Run, Table};

/// Full width, in fiftieths of a percent
const FULL_WIDTH_PCT: u32 = 5000;
const BORDER_SIZE: u32 = 1;

pub struct TableWriter;

impl TableWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_table(&self, xml: &mut String, table: &Table) {
        xml.push_str("<w:tbl>");
        self.write_table_properties(xml);

        xml.push_str("<w:tblGrid>");
        for _ in &table.headers {
            xml.push_str("<w:gridCol/>");
        }
        xml.push_str("</w:tblGrid>");

        let header = Run::text(String::new()).bold().size(table.size);
        xml.push_str("<w:tr><w:trPr><w:tblHeader/></w:trPr>");
        for text in &table.headers {
            self.write_cell(xml, text, &header, Some(&table.header_fill));
        }
        xml.push_str("</w:tr>");

        let body = Run::text(String::new()).size(table.size);
        for row in &table.rows {
            xml.push_str("<w:tr>");
            for text in row {
                self.write_cell(xml, text, &body, None);
            }
            xml.push_str("</w:tr>");
        }

        xml.push_str("</w:tbl>");
    }

    fn write_table_properties(&self, xml: &mut String) {
        xml.push_str("<w:tblPr>");
        xml.push_str(&format!(r#"<w:tblW w:w="{}" w:type="pct"/>"#, FULL_WIDTH_PCT));
        xml.push_str("<w:tblBorders>");
        for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
            xml.push_str(&format!(
                r#"<w:{} w:val="single" w:sz="{}" w:space="0" w:color="auto"/>"#,
                edge, BORDER_SIZE
            ));
        }
        xml.push_str("</w:tblBorders>");
        xml.push_str(r#"<w:tblLayout w:type="autofit"/>"#);
        xml.push_str("</w:tblPr>");
    }

    /// A cell with one centred paragraph; `style` supplies the run formatting
    fn write_cell(&self, xml: &mut String, text: &str, style: &Run, fill: Option<&str>) {
        xml.push_str("<w:tc>");
        if let Some(fill) = fill {
            xml.push_str(&format!(
                r#"<w:tcPr><w:shd w:val="clear" w:color="auto" w:fill="{}"/></w:tcPr>"#,
                escape_xml(fill)
            ));
        }
        xml.push_str(r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr>"#);
        xml.push_str("<w:r>");
        xml.push_str(&run_properties(style));
        xml.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape_xml(text)
        ));
        xml.push_str("</w:r></w:p>");
        xml.push_str("</w:tc>");
    }
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}
