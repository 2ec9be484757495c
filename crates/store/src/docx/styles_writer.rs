//! styles.xml writer

use super::namespaces;

/// (style id, display name, outline level) of the heading styles
const HEADINGS: [(&str, &str, u8); 3] = [
    ("Heading1", "heading 1", 0),
    ("Heading2", "heading 2", 1),
    ("Heading3", "heading 3", 2),
];

pub struct StylesWriter;

impl StylesWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, namespaces::W));

        self.write_doc_defaults(&mut xml);

        xml.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal">"#);
        xml.push_str(r#"<w:name w:val="Normal"/><w:qFormat/>"#);
        xml.push_str("</w:style>");

        for (id, name, outline) in HEADINGS {
            xml.push_str(&format!(r#"<w:style w:type="paragraph" w:styleId="{}">"#, id));
            xml.push_str(&format!(r#"<w:name w:val="{}"/>"#, name));
            xml.push_str(r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#);
            xml.push_str(&format!(
                r#"<w:pPr><w:keepNext/><w:outlineLvl w:val="{}"/></w:pPr>"#,
                outline
            ));
            xml.push_str("<w:rPr><w:b/><w:bCs/></w:rPr>");
            xml.push_str("</w:style>");
        }

        xml.push_str(r#"<w:style w:type="paragraph" w:styleId="ListParagraph">"#);
        xml.push_str(r#"<w:name w:val="List Paragraph"/><w:basedOn w:val="Normal"/><w:qFormat/>"#);
        xml.push_str(r#"<w:pPr><w:ind w:left="720"/><w:contextualSpacing/></w:pPr>"#);
        xml.push_str("</w:style>");

        xml.push_str("</w:styles>");
        xml
    }

    fn write_doc_defaults(&self, xml: &mut String) {
        xml.push_str("<w:docDefaults>");
        xml.push_str("<w:rPrDefault><w:rPr>");
        xml.push_str(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>"#);
        xml.push_str(r#"<w:sz w:val="22"/><w:szCs w:val="22"/>"#);
        xml.push_str(r#"<w:lang w:val="pt-BR"/>"#);
        xml.push_str("</w:rPr></w:rPrDefault>");
        xml.push_str("<w:pPrDefault><w:pPr>");
        xml.push_str(r#"<w:spacing w:after="160" w:line="259" w:lineRule="auto"/>"#);
        xml.push_str("</w:pPr></w:pPrDefault>");
        xml.push_str("</w:docDefaults>");
    }
}

impl Default for StylesWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_present() {
        let xml = StylesWriter::new().write();
        for id in ["Normal", "Heading1", "Heading2", "Heading3", "ListParagraph"] {
            assert!(xml.contains(&format!(r#"w:styleId="{}""#, id)), "{id}");
        }
        assert!(xml.contains(r#"<w:outlineLvl w:val="2"/>"#));
    }
}
