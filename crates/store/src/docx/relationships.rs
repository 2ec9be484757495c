//! Relationships (.rels) generation
//!
//! Connects the package parts: root to document, document to styles,
//! numbering, footers and pictures, footer to its pictures.

use super::layout::MediaItem;
use super::media_writer::{media_rel_id, media_target};
use super::relationship_types;

/// A single relationship in a .rels file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Unique ID within the rels file (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative to the source part)
    pub target: String,
}

/// Relationships of one part, in insertion order
#[derive(Debug, Clone)]
pub struct Relationships {
    relationships: Vec<Relationship>,
    next_id: u32,
}

impl Relationships {
    pub fn new() -> Self {
        Self {
            relationships: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a relationship and return its generated ID
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.next_id);
        self.add_with_id(&id, rel_type, target);
        id
    }

    /// Add a relationship under a fixed ID
    pub fn add_with_id(&mut self, id: &str, rel_type: &str, target: &str) {
        if let Some(num) = id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()) {
            self.next_id = self.next_id.max(num + 1);
        }
        self.relationships.push(Relationship {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    pub fn get_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.rel_type == rel_type)
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Register the given media entries under their fixed IDs
    pub fn add_media<'a>(&mut self, media: impl IntoIterator<Item = (usize, &'a MediaItem)>) {
        for (index, item) in media {
            self.add_with_id(
                &media_rel_id(index),
                relationship_types::IMAGE,
                &media_target(item, index),
            );
        }
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<Relationships xmlns="{}">"#,
            super::namespaces::PKG_REL
        ));

        for rel in &self.relationships {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                rel.id,
                rel.rel_type,
                super::escape_xml(&rel.target)
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new()
    }
}

/// Root .rels pointing at the main document
pub fn create_root_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(relationship_types::DOCUMENT, "word/document.xml");
    rels
}

/// document.xml.rels without pictures: styles, numbering and both footers
pub fn create_document_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(relationship_types::STYLES, "styles.xml");
    rels.add(relationship_types::NUMBERING, "numbering.xml");
    rels.add(relationship_types::FOOTER, "footer1.xml");
    rels.add(relationship_types::FOOTER, "footer2.xml");
    rels
}
