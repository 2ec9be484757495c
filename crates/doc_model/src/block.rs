//! Block kinds and their data records
//!
//! A block is one typed content unit of a document. The set of kinds is
//! closed; stored content carrying any other tag is kept as
//! [`BlockContent::Unknown`] so it is never lost on a load/save cycle.
//!
//! On the wire a block is `{"id": "...", "type": "<kind>", "data": {...}}`.

use crate::image::{image_or_empty, optional_image};
use crate::{BlockId, DocModelError, ImageData, ListData, Result, TableData};
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

// =============================================================================
// Kinds
// =============================================================================

/// The closed set of block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Cover,
    CoverDetailed,
    Section,
    Image,
    Table,
    List,
    Text,
    SectionTable,
    SectionList,
    SectionText,
    SectionImage,
}

impl BlockKind {
    /// All kinds, in palette order
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Cover,
        BlockKind::CoverDetailed,
        BlockKind::Section,
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Table,
        BlockKind::List,
        BlockKind::SectionText,
        BlockKind::SectionImage,
        BlockKind::SectionTable,
        BlockKind::SectionList,
    ];

    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Cover => "cover",
            BlockKind::CoverDetailed => "cover-detailed",
            BlockKind::Section => "section",
            BlockKind::Image => "image",
            BlockKind::Table => "table",
            BlockKind::List => "list",
            BlockKind::Text => "text",
            BlockKind::SectionTable => "section-table",
            BlockKind::SectionList => "section-list",
            BlockKind::SectionText => "section-text",
            BlockKind::SectionImage => "section-image",
        }
    }

    /// Display label used by the palette and the outline
    pub fn label(&self) -> &'static str {
        match self {
            BlockKind::Cover => "Capa",
            BlockKind::CoverDetailed => "Capa Detalhada",
            BlockKind::Section => "Seção",
            BlockKind::Image => "Imagem",
            BlockKind::Table => "Tabela",
            BlockKind::List => "Lista",
            BlockKind::Text => "Texto",
            BlockKind::SectionTable => "Seção + Tabela",
            BlockKind::SectionList => "Seção + Lista",
            BlockKind::SectionText => "Seção + Texto",
            BlockKind::SectionImage => "Seção + Imagem",
        }
    }

    /// One-line palette description
    pub fn description(&self) -> &'static str {
        match self {
            BlockKind::Cover => "Página de capa com imagem e título",
            BlockKind::CoverDetailed => "Capa com máquina, responsável e data",
            BlockKind::Section => "Título de seção",
            BlockKind::Image => "Imagem com descrição numerada",
            BlockKind::Table => "Tabela editável",
            BlockKind::List => "Lista com marcadores ou numerada",
            BlockKind::Text => "Bloco de texto simples",
            BlockKind::SectionTable => "Título de seção com tabela abaixo",
            BlockKind::SectionList => "Título de seção com lista abaixo",
            BlockKind::SectionText => "Título de seção com texto abaixo",
            BlockKind::SectionImage => "Título de seção com imagem abaixo",
        }
    }

    /// Cover kinds occupy a page of their own
    pub fn is_cover(&self) -> bool {
        matches!(self, BlockKind::Cover | BlockKind::CoverDetailed)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = DocModelError;

    fn from_str(s: &str) -> Result<Self> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DocModelError::UnknownBlockKind(s.to_string()))
    }
}

// =============================================================================
// Shared field types
// =============================================================================

/// Heading level of a section title; 1 is the largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    #[default]
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn number(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = DocModelError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            other => Err(DocModelError::InvalidHeadingLevel(other)),
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.number()
    }
}

// =============================================================================
// Data records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverData {
    pub title: String,
    #[serde(with = "optional_image", default)]
    pub image: Option<ImageData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverDetailedData {
    pub title: String,
    #[serde(with = "optional_image", default)]
    pub image: Option<ImageData>,
    #[serde(default)]
    pub machine_name: String,
    #[serde(default)]
    pub responsible_name: String,
    #[serde(default)]
    pub date: String,
}

/// Title and level of a section heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionData {
    pub title: String,
    pub level: HeadingLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlockData {
    #[serde(with = "image_or_empty", default)]
    pub image: Option<ImageData>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextData {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTableData {
    #[serde(flatten)]
    pub heading: SectionData,
    #[serde(flatten)]
    pub table: TableData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionListData {
    #[serde(flatten)]
    pub heading: SectionData,
    #[serde(flatten)]
    pub list: ListData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTextData {
    #[serde(flatten)]
    pub heading: SectionData,
    #[serde(flatten)]
    pub text: TextData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionImageData {
    #[serde(flatten)]
    pub heading: SectionData,
    #[serde(with = "optional_image", default)]
    pub image: Option<ImageData>,
    pub description: String,
}

// =============================================================================
// Block content
// =============================================================================

/// Kind-tagged block data
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Cover(CoverData),
    CoverDetailed(CoverDetailedData),
    Section(SectionData),
    Image(ImageBlockData),
    Table(TableData),
    List(ListData),
    Text(TextData),
    SectionTable(SectionTableData),
    SectionList(SectionListData),
    SectionText(SectionTextData),
    SectionImage(SectionImageData),
    /// Content with a tag this build does not know; kept verbatim
    Unknown { kind: String, data: Value },
}

fn typed<T: DeserializeOwned>(kind: BlockKind, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| DocModelError::invalid_data(kind.as_str(), e))
}

impl BlockContent {
    /// Rebuild typed content from a wire tag and a raw data object
    pub fn from_parts(tag: &str, data: Value) -> Result<Self> {
        let Ok(kind) = tag.parse::<BlockKind>() else {
            return Ok(BlockContent::Unknown {
                kind: tag.to_string(),
                data,
            });
        };

        Ok(match kind {
            BlockKind::Cover => BlockContent::Cover(typed(kind, data)?),
            BlockKind::CoverDetailed => BlockContent::CoverDetailed(typed(kind, data)?),
            BlockKind::Section => BlockContent::Section(typed(kind, data)?),
            BlockKind::Image => BlockContent::Image(typed(kind, data)?),
            BlockKind::Table => BlockContent::Table(typed(kind, data)?),
            BlockKind::List => BlockContent::List(typed(kind, data)?),
            BlockKind::Text => BlockContent::Text(typed(kind, data)?),
            BlockKind::SectionTable => BlockContent::SectionTable(typed(kind, data)?),
            BlockKind::SectionList => BlockContent::SectionList(typed(kind, data)?),
            BlockKind::SectionText => BlockContent::SectionText(typed(kind, data)?),
            BlockKind::SectionImage => BlockContent::SectionImage(typed(kind, data)?),
        })
    }

    /// The raw data object as it appears on the wire
    pub fn to_data_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| DocModelError::invalid_data(self.type_tag(), e))
    }

    /// The kind, or `None` for unknown content
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            BlockContent::Cover(_) => BlockKind::Cover,
            BlockContent::CoverDetailed(_) => BlockKind::CoverDetailed,
            BlockContent::Section(_) => BlockKind::Section,
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Table(_) => BlockKind::Table,
            BlockContent::List(_) => BlockKind::List,
            BlockContent::Text(_) => BlockKind::Text,
            BlockContent::SectionTable(_) => BlockKind::SectionTable,
            BlockContent::SectionList(_) => BlockKind::SectionList,
            BlockContent::SectionText(_) => BlockKind::SectionText,
            BlockContent::SectionImage(_) => BlockKind::SectionImage,
            BlockContent::Unknown { .. } => return None,
        })
    }

    /// Wire tag, including foreign tags of unknown content
    pub fn type_tag(&self) -> &str {
        match self {
            BlockContent::Unknown { kind, .. } => kind,
            known => known.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }

    pub fn is_cover(&self) -> bool {
        self.kind().is_some_and(|k| k.is_cover())
    }

    /// The section heading of section-prefixed kinds
    pub fn heading(&self) -> Option<&SectionData> {
        match self {
            BlockContent::Section(d) => Some(d),
            BlockContent::SectionTable(d) => Some(&d.heading),
            BlockContent::SectionList(d) => Some(&d.heading),
            BlockContent::SectionText(d) => Some(&d.heading),
            BlockContent::SectionImage(d) => Some(&d.heading),
            _ => None,
        }
    }

    /// The title of covers and section-prefixed kinds
    pub fn title(&self) -> Option<&str> {
        match self {
            BlockContent::Cover(d) => Some(&d.title),
            BlockContent::CoverDetailed(d) => Some(&d.title),
            other => other.heading().map(|h| h.title.as_str()),
        }
    }

    /// The primary image of image-bearing kinds
    pub fn image(&self) -> Option<&ImageData> {
        match self {
            BlockContent::Cover(d) => d.image.as_ref(),
            BlockContent::CoverDetailed(d) => d.image.as_ref(),
            BlockContent::Image(d) => d.image.as_ref(),
            BlockContent::SectionImage(d) => d.image.as_ref(),
            _ => None,
        }
    }

    /// Mutable image slot of image-bearing kinds
    pub fn image_slot_mut(&mut self) -> Option<&mut Option<ImageData>> {
        match self {
            BlockContent::Cover(d) => Some(&mut d.image),
            BlockContent::CoverDetailed(d) => Some(&mut d.image),
            BlockContent::Image(d) => Some(&mut d.image),
            BlockContent::SectionImage(d) => Some(&mut d.image),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&TableData> {
        match self {
            BlockContent::Table(d) => Some(d),
            BlockContent::SectionTable(d) => Some(&d.table),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut TableData> {
        match self {
            BlockContent::Table(d) => Some(d),
            BlockContent::SectionTable(d) => Some(&mut d.table),
            _ => None,
        }
    }

    pub fn list(&self) -> Option<&ListData> {
        match self {
            BlockContent::List(d) => Some(d),
            BlockContent::SectionList(d) => Some(&d.list),
            _ => None,
        }
    }

    /// Repair or reject table and list data that breaks their shape rules
    pub fn normalize(&mut self) -> Result<()> {
        let tag = self.type_tag().to_string();
        if let Some(table) = self.table_mut() {
            table
                .normalize()
                .map_err(|e| DocModelError::invalid_data(&tag, e))?;
        }
        if let Some(list) = self.list() {
            list.check().map_err(|e| DocModelError::invalid_data(&tag, e))?;
        }
        Ok(())
    }

    pub fn list_mut(&mut self) -> Option<&mut ListData> {
        match self {
            BlockContent::List(d) => Some(d),
            BlockContent::SectionList(d) => Some(&mut d.list),
            _ => None,
        }
    }
}

/// Serializes only the data record; the tag is written by [`Block`]
impl Serialize for BlockContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            BlockContent::Cover(d) => d.serialize(serializer),
            BlockContent::CoverDetailed(d) => d.serialize(serializer),
            BlockContent::Section(d) => d.serialize(serializer),
            BlockContent::Image(d) => d.serialize(serializer),
            BlockContent::Table(d) => d.serialize(serializer),
            BlockContent::List(d) => d.serialize(serializer),
            BlockContent::Text(d) => d.serialize(serializer),
            BlockContent::SectionTable(d) => d.serialize(serializer),
            BlockContent::SectionList(d) => d.serialize(serializer),
            BlockContent::SectionText(d) => d.serialize(serializer),
            BlockContent::SectionImage(d) => d.serialize(serializer),
            BlockContent::Unknown { data, .. } => data.serialize(serializer),
        }
    }
}

// =============================================================================
// Block
// =============================================================================

/// One content unit of a document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    id: BlockId,
    content: BlockContent,
}

#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawBlock> for Block {
    type Error = DocModelError;

    fn try_from(raw: RawBlock) -> Result<Self> {
        Ok(Block {
            id: raw.id,
            content: BlockContent::from_parts(&raw.kind, raw.data)?,
        })
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.content.type_tag())?;
        state.serialize_field("data", &self.content)?;
        state.end()
    }
}

impl Block {
    /// Create a block with a freshly generated id
    pub fn new(content: BlockContent) -> Self {
        Self::with_id(BlockId::new(), content)
    }

    pub fn with_id(id: BlockId, content: BlockContent) -> Self {
        Self { id, content }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    /// Mutable access to the data; the kind is checked by the caller
    pub(crate) fn content_mut(&mut self) -> &mut BlockContent {
        &mut self.content
    }

    /// The kind, or `None` for unknown content
    pub fn kind(&self) -> Option<BlockKind> {
        self.content.kind()
    }

    /// Deep copy with a newly generated id
    pub fn with_fresh_id(&self) -> Self {
        Self::new(self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.as_str().parse::<BlockKind>().unwrap(), kind);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                Value::String(kind.as_str().to_string())
            );
        }
        assert!(matches!(
            "chart".parse::<BlockKind>(),
            Err(DocModelError::UnknownBlockKind(k)) if k == "chart"
        ));
    }

    #[test]
    fn test_heading_level_rejects_out_of_range() {
        assert!(serde_json::from_value::<HeadingLevel>(json!(4)).is_err());
        assert_eq!(serde_json::from_value::<HeadingLevel>(json!(2)).unwrap(), HeadingLevel::H2);
        assert_eq!(serde_json::to_value(HeadingLevel::H3).unwrap(), json!(3));
    }

    #[test]
    fn test_block_wire_shape() {
        let block = Block::with_id(
            BlockId::from("b1"),
            BlockContent::Cover(CoverData {
                title: "T".into(),
                image: None,
            }),
        );
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"id": "b1", "type": "cover", "data": {"title": "T", "image": null}})
        );
    }

    #[test]
    fn test_section_variants_are_flat() {
        let value = json!({
            "id": "b2",
            "type": "section-table",
            "data": {"title": "Dados", "level": 2, "headers": ["A"], "rows": [["1"]]}
        });
        let block: Block = serde_json::from_value(value.clone()).unwrap();
        let BlockContent::SectionTable(data) = block.content() else {
            panic!("expected section-table");
        };
        assert_eq!(data.heading.level, HeadingLevel::H2);
        assert_eq!(data.table.headers, vec!["A"]);
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_image_block_writes_empty_string() {
        let block = Block::new(BlockContent::Image(ImageBlockData {
            image: None,
            description: "d".into(),
        }));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["data"]["image"], json!(""));
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let value = json!({"id": "x", "type": "chart", "data": {"series": [1, 2, 3]}});
        let block: Block = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(block.kind(), None);
        assert_eq!(block.content().type_tag(), "chart");
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_known_kind_with_bad_data_fails() {
        let value = json!({"id": "x", "type": "section", "data": {"title": "S", "level": 7}});
        assert!(serde_json::from_value::<Block>(value).is_err());
    }

    #[test]
    fn test_accessors() {
        let content = BlockContent::SectionImage(SectionImageData {
            heading: SectionData {
                title: "Fotos".into(),
                level: HeadingLevel::H1,
            },
            image: Some(ImageData::from_base64("image/png", "AAAA")),
            description: "d".into(),
        });
        assert_eq!(content.title(), Some("Fotos"));
        assert!(content.image().is_some());
        assert!(content.table().is_none());
        assert!(!content.is_cover());
    }
}
