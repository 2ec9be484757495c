//! End-to-end tests for DOCX export

use super::*;
use crate::image_store::{load_built_in, BuiltInImage};
use crate::ProjectionContext;
use doc_model::{
    Block, BlockContent, CoverData, Document, HeadingLevel, ListData, ListStyle, SectionData,
    TableData, TextData,
};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

fn doc(contents: Vec<BlockContent>) -> Document {
    contents.into_iter().fold(Document::new(), |doc, content| {
        doc.insert_block(Block::new(content), None)
    })
}

fn scenario_document() -> Document {
    doc(vec![
        BlockContent::Cover(CoverData {
            title: "T".to_string(),
            image: None,
        }),
        BlockContent::Section(SectionData {
            title: "S".to_string(),
            level: HeadingLevel::H1,
        }),
        BlockContent::Text(TextData {
            content: "hello".to_string(),
        }),
        BlockContent::Table(TableData {
            headers: vec!["A".to_string(), "B".to_string()],
            rows: vec![vec!["1".to_string(), "2".to_string()]],
        }),
    ])
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

/// Local names of every element, in document order
fn element_names(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut names = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => {
                names.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::Eof => break,
            _ => {}
        }
    }
    names
}

/// Concatenated text of every w:t element
fn body_text(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) if e.local_name().as_ref() == b"t" => in_text = false,
            Event::Text(t) if in_text => text.push_str(&t.unescape().unwrap()),
            Event::Eof => break,
            _ => {}
        }
    }
    text
}

#[tokio::test]
async fn test_cover_scenario_package() {
    let bytes = export_docx_bytes(&scenario_document(), &ProjectionContext::new())
        .await
        .unwrap();
    let document = read_part(&bytes, "word/document.xml");
    let names = element_names(&document);

    assert_eq!(names.iter().filter(|n| *n == "pageBreakBefore").count(), 1);
    assert!(names.iter().any(|n| n == "titlePg"));
    assert_eq!(names.iter().filter(|n| *n == "tbl").count(), 1);
    assert_eq!(names.iter().filter(|n| *n == "footerReference").count(), 2);

    let text = body_text(&document);
    let positions: Vec<usize> = ["T", "S", "hello", "A", "B", "1", "2"]
        .iter()
        .map(|needle| text.find(needle).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] <= w[1]), "{text}");

    // First-page footer stays empty
    let first_footer = read_part(&bytes, "word/footer2.xml");
    assert!(body_text(&first_footer).is_empty());
    let footer = read_part(&bytes, "word/footer1.xml");
    assert!(footer.contains("PAGE"));
}

#[tokio::test]
async fn test_no_cover_no_title_page() {
    let document = doc(vec![BlockContent::Text(TextData {
        content: "only".to_string(),
    })]);
    let bytes = export_docx_bytes(&document, &ProjectionContext::new())
        .await
        .unwrap();
    let names = element_names(&read_part(&bytes, "word/document.xml"));

    assert!(!names.iter().any(|n| n == "titlePg"));
    assert!(!names.iter().any(|n| n == "pageBreakBefore"));
    assert_eq!(names.iter().filter(|n| *n == "footerReference").count(), 1);
}

#[tokio::test]
async fn test_empty_document_is_valid_package() {
    let bytes = export_docx_bytes(&Document::new(), &ProjectionContext::new())
        .await
        .unwrap();
    let document = read_part(&bytes, "word/document.xml");
    let names = element_names(&document);
    assert!(names.iter().any(|n| n == "sectPr"));
    assert!(read_part(&bytes, "[Content_Types].xml").contains("/word/document.xml"));
}

#[tokio::test]
async fn test_numbered_lists_restart() {
    let list = |items: &[&str]| {
        BlockContent::List(ListData {
            style: ListStyle::Numbered,
            items: items.iter().map(|s| s.to_string()).collect(),
        })
    };
    let bullets = BlockContent::List(ListData {
        style: ListStyle::Bullet,
        items: vec!["x".to_string()],
    });
    let document = doc(vec![list(&["a", "b"]), bullets, list(&["c"])]);
    let bytes = export_docx_bytes(&document, &ProjectionContext::new())
        .await
        .unwrap();

    let numbering = read_part(&bytes, "word/numbering.xml");
    assert_eq!(numbering.matches("<w:startOverride").count(), 2);

    let body = read_part(&bytes, "word/document.xml");
    assert_eq!(body.matches(r#"<w:numId w:val="2"/>"#).count(), 2);
    assert_eq!(body.matches(r#"<w:numId w:val="1"/>"#).count(), 1);
    assert_eq!(body.matches(r#"<w:numId w:val="3"/>"#).count(), 1);
}

#[tokio::test]
async fn test_logo_embedded_once_for_footer() {
    let logo = load_built_in(BuiltInImage::Footer).unwrap();
    let ctx = ProjectionContext::new().with_default_logo(Some(logo));
    let bytes = export_docx_bytes(&scenario_document(), &ctx).await.unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let media: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("word/media/"))
        .map(str::to_string)
        .collect();
    assert_eq!(media, vec!["word/media/image1.png".to_string()]);
    drop(archive);

    let footer_rels = read_part(&bytes, "word/_rels/footer1.xml.rels");
    assert!(footer_rels.contains("media/image1.png"));
    assert!(read_part(&bytes, "word/footer1.xml").contains(r#"r:embed="rId10""#));
}

#[tokio::test]
async fn test_export_docx_writes_titled_file() {
    let dir = tempfile::tempdir().unwrap();
    let document = scenario_document().update_title("Relatório: final");
    let path = export_docx(&document, &ProjectionContext::new(), dir.path())
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "Relatório_ final.docx");
    let bytes = tokio::fs::read(&path).await.unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_escape_xml() {
    assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    assert_eq!(escape_xml("a\u{0}b\u{1B}c\td\u{FFFF}"), "abc\td");
}

#[tokio::test]
async fn test_control_characters_keep_package_readable() {
    let document = doc(vec![BlockContent::Text(TextData {
        content: "colado\u{0B}do\u{0C}terminal\u{7}".to_string(),
    })]);
    let bytes = export_docx_bytes(&document, &ProjectionContext::new())
        .await
        .unwrap();
    let xml = read_part(&bytes, "word/document.xml");

    assert!(body_text(&xml).contains("coladodoterminal"));
    assert!(!xml.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
}
