//! PDF document structure: catalog, page tree, pages and the info dictionary

use super::objects::{PdfDictionary, PdfObject};
use chrono::{DateTime, Utc};

/// Values for the document information dictionary
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self {
            creator: Some("DocMaker".to_string()),
            producer: Some("DocMaker PDF Export".to_string()),
            ..Default::default()
        }
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let entries = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                dict.insert(key, PdfObject::text(value));
            }
        }
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::text(&pdf_date(date)));
        }
        dict
    }
}

/// `D:YYYYMMDDHHmmSS+00'00'`
pub fn pdf_date(date: DateTime<Utc>) -> String {
    format!("D:{}+00'00'", date.format("%Y%m%d%H%M%S"))
}

/// Page object
#[derive(Debug, Clone)]
pub struct PdfPage {
    pub width: f64,
    pub height: f64,
    pub content_ref: u32,
    /// Resource name to object number
    pub fonts: Vec<(String, u32)>,
    pub xobjects: Vec<(String, u32)>,
}

impl PdfPage {
    pub fn to_dictionary(&self, parent_ref: u32) -> PdfDictionary {
        let mut dict = PdfDictionary::new().with_type("Page");
        dict.insert("Parent", PdfObject::reference(parent_ref));
        dict.insert("MediaBox", PdfObject::rect(0.0, 0.0, self.width, self.height));
        dict.insert("Contents", PdfObject::reference(self.content_ref));

        let mut resources = PdfDictionary::new();
        resources.insert(
            "ProcSet",
            PdfObject::Array(vec![
                PdfObject::name("PDF"),
                PdfObject::name("Text"),
                PdfObject::name("ImageC"),
            ]),
        );
        if !self.fonts.is_empty() {
            resources.insert("Font", PdfObject::Dictionary(reference_dict(&self.fonts)));
        }
        if !self.xobjects.is_empty() {
            resources.insert("XObject", PdfObject::Dictionary(reference_dict(&self.xobjects)));
        }
        dict.insert("Resources", PdfObject::Dictionary(resources));
        dict
    }
}

fn reference_dict(entries: &[(String, u32)]) -> PdfDictionary {
    let mut dict = PdfDictionary::new();
    for (name, obj_num) in entries {
        dict.insert(name.clone(), PdfObject::reference(*obj_num));
    }
    dict
}

/// Document catalog pointing at the page tree
pub fn create_catalog(pages_ref: u32) -> PdfDictionary {
    let mut catalog = PdfDictionary::new().with_type("Catalog");
    catalog.insert("Pages", PdfObject::reference(pages_ref));
    catalog
}

/// Flat page tree
pub fn create_pages(page_refs: &[u32]) -> PdfDictionary {
    let mut pages = PdfDictionary::new().with_type("Pages");
    pages.insert(
        "Kids",
        PdfObject::Array(page_refs.iter().map(|r| PdfObject::reference(*r)).collect()),
    );
    pages.insert("Count", PdfObject::Integer(page_refs.len() as i64));
    pages
}
