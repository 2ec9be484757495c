//! numbering.xml writer
//!
//! Two abstract definitions: a bullet list and a decimal "%1." list. The
//! bullet instance is shared; each numbered list has its own instance that
//! restarts at 1.

use super::layout::NumberingPlan;
use super::namespaces;

pub struct NumberingWriter;

impl NumberingWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, plan: &NumberingPlan) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<w:numbering xmlns:w="{}">"#, namespaces::W));

        self.write_abstract_num(
            &mut xml,
            NumberingPlan::BULLET_ABSTRACT_ID,
            "bullet",
            "\u{2022}",
        );
        self.write_abstract_num(&mut xml, NumberingPlan::DECIMAL_ABSTRACT_ID, "decimal", "%1.");

        xml.push_str(&format!(
            r#"<w:num w:numId="{}"><w:abstractNumId w:val="{}"/></w:num>"#,
            NumberingPlan::BULLET_NUM_ID,
            NumberingPlan::BULLET_ABSTRACT_ID
        ));
        for num_id in plan.numbered_ids() {
            xml.push_str(&format!(
                r#"<w:num w:numId="{}"><w:abstractNumId w:val="{}"/><w:lvlOverride w:ilvl="0"><w:startOverride w:val="1"/></w:lvlOverride></w:num>"#,
                num_id,
                NumberingPlan::DECIMAL_ABSTRACT_ID
            ));
        }

        xml.push_str("</w:numbering>");
        xml
    }

    fn write_abstract_num(&self, xml: &mut String, id: u32, format: &str, text: &str) {
        xml.push_str(&format!(r#"<w:abstractNum w:abstractNumId="{}">"#, id));
        xml.push_str(r#"<w:multiLevelType w:val="singleLevel"/>"#);
        xml.push_str(r#"<w:lvl w:ilvl="0">"#);
        xml.push_str(r#"<w:start w:val="1"/>"#);
        xml.push_str(&format!(r#"<w:numFmt w:val="{}"/>"#, format));
        xml.push_str(&format!(r#"<w:lvlText w:val="{}"/>"#, text));
        xml.push_str(r#"<w:lvlJc w:val="left"/>"#);
        xml.push_str(r#"<w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>"#);
        xml.push_str("</w:lvl>");
        xml.push_str("</w:abstractNum>");
    }
}

impl Default for NumberingWriter {
    fn default() -> Self {
        Self::new()
    }
}
