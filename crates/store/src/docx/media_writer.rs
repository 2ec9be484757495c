//! Embedded pictures: part names, relationship ids and inline drawings

use super::layout::MediaItem;

/// Relationship ids below this are taken by the fixed document parts
const FIRST_MEDIA_REL: usize = 10;

/// Relationship id of a media item; the same in every part that uses it
pub fn media_rel_id(index: usize) -> String {
    format!("rId{}", FIRST_MEDIA_REL + index)
}

/// `word/media/...` part name
pub fn media_part_name(item: &MediaItem, index: usize) -> String {
    format!("word/media/{}", item.file_name(index))
}

/// Target of a media relationship, relative to `word/`
pub fn media_target(item: &MediaItem, index: usize) -> String {
    format!("media/{}", item.file_name(index))
}

/// A w:drawing element holding an inline picture
pub fn inline_drawing(rel_id: &str, drawing_id: u32, width_emu: i64, height_emu: i64) -> String {
    let name = format!("Picture {}", drawing_id);
    format!(
        concat!(
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:docPr id="{id}" name="{name}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
        ),
        cx = width_emu,
        cy = height_emu,
        id = drawing_id,
        name = name,
        rel = rel_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_store::ImageFormat;

    #[test]
    fn test_media_names() {
        let item = MediaItem {
            data: vec![1, 2, 3],
            format: ImageFormat::Jpeg,
        };
        assert_eq!(media_part_name(&item, 0), "word/media/image1.jpeg");
        assert_eq!(media_target(&item, 2), "media/image3.jpeg");
        assert_eq!(media_rel_id(0), "rId10");
    }

    #[test]
    fn test_inline_drawing() {
        let xml = inline_drawing("rId10", 3, 914400, 457200);
        assert!(xml.contains(r#"<wp:extent cx="914400" cy="457200"/>"#));
        assert!(xml.contains(r#"r:embed="rId10""#));
        assert!(xml.contains(r#"<wp:docPr id="3" name="Picture 3"/>"#));
    }
}
