//! Subcommand handlers

use anyhow::{Context, Result};
use doc_model::{BlockKind, Document, DocumentId, TemplateId};
use edit_engine::outline;
use std::path::{Path, PathBuf};
use store::{
    image_store, load_document, save_document, CompressionPreset, DocumentLibrary, ExportFormat,
    FileStore, Theme,
};

/// Store directory used when neither `--data-dir` nor `DOCMAKER_DATA_DIR` is set
const DEFAULT_DATA_DIR: &str = ".docmaker";

pub fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn library(data_dir: &Path) -> Result<DocumentLibrary<FileStore>> {
    let store = FileStore::open(data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    Ok(DocumentLibrary::open(store)?)
}

async fn read(file: &Path) -> Result<Document> {
    load_document(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))
}

async fn write(document: &Document, file: &Path) -> Result<()> {
    save_document(document, file)
        .await
        .with_context(|| format!("failed to write {}", file.display()))
}

fn parse_kind(kind: &str) -> Result<BlockKind> {
    kind.trim()
        .parse()
        .with_context(|| format!("unknown block kind '{}'", kind))
}

pub async fn new_document(title: &str, blocks: &[String], output: &Path) -> Result<()> {
    let mut document = Document::new().update_title(title);
    for kind in blocks.iter().filter(|k| !k.trim().is_empty()) {
        document = document.add_block(parse_kind(kind)?, None);
    }
    write(&document, output).await?;
    println!("{}", document.id);
    Ok(())
}

pub async fn add_block(file: &Path, kind: &str, position: Option<usize>) -> Result<()> {
    let document = read(file).await?;
    let document = document.add_block(parse_kind(kind)?, position);
    write(&document, file).await
}

pub async fn print_outline(file: &Path) -> Result<()> {
    let document = read(file).await?;
    for entry in outline(&document) {
        println!("{:>3}  {:<20}  {}", entry.index + 1, entry.kind_label, entry.title);
    }
    Ok(())
}

pub async fn export(data_dir: &Path, file: &Path, format: ExportFormat, out_dir: &Path) -> Result<()> {
    let document = read(file).await?;
    let library = library(data_dir)?;
    let path = store::export(&document, library.settings().get(), format, out_dir).await?;
    println!("{}", path.display());
    Ok(())
}

pub async fn save(data_dir: &Path, file: &Path) -> Result<()> {
    let document = read(file).await?;
    let meta = library(data_dir)?.save_local(&document)?;
    println!("{}", meta.id);
    Ok(())
}

pub fn recent(data_dir: &Path) -> Result<()> {
    for meta in library(data_dir)?.recent_documents() {
        println!(
            "{}  {}  {}",
            meta.id,
            meta.updated_at.format("%d/%m/%Y %H:%M"),
            meta.title
        );
    }
    Ok(())
}

pub async fn open(data_dir: &Path, id: &str, output: &Path) -> Result<()> {
    let document = library(data_dir)?.open_recent(&DocumentId::from(id))?;
    write(&document, output).await
}

pub async fn template_save(data_dir: &Path, file: &Path, name: &str) -> Result<()> {
    let document = read(file).await?;
    let template = library(data_dir)?.save_as_template(&document, name)?;
    println!("{}", template.id);
    Ok(())
}

pub fn template_list(data_dir: &Path) -> Result<()> {
    for template in library(data_dir)?.templates() {
        println!(
            "{}  {}  ({} blocos)",
            template.id,
            template.name,
            template.blocks.len()
        );
    }
    Ok(())
}

pub async fn template_use(data_dir: &Path, id: &str, output: &Path) -> Result<()> {
    let document = library(data_dir)?.instantiate_template(&TemplateId::from(id))?;
    write(&document, output).await?;
    println!("{}", document.id);
    Ok(())
}

pub async fn set_logo(data_dir: &Path, image: Option<&Path>) -> Result<()> {
    let logo = match image {
        Some(path) => Some(
            image_store::ingest_file(path, CompressionPreset::Logo)
                .await
                .with_context(|| format!("failed to load image {}", path.display()))?,
        ),
        None => None,
    };
    library(data_dir)?.settings_mut().set_default_logo(logo)?;
    Ok(())
}

pub fn set_theme(data_dir: &Path, theme: &str) -> Result<()> {
    let theme: Theme = theme.parse()?;
    library(data_dir)?.settings_mut().set_theme(theme)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_add_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.json");
        let data = dir.path().join("data");

        new_document("Relatório", &["cover".to_string(), "text".to_string()], &file)
            .await
            .unwrap();
        add_block(&file, "table", Some(1)).await.unwrap();

        let document = read(&file).await.unwrap();
        assert_eq!(document.title, "Relatório");
        let kinds: Vec<_> = document.blocks.iter().filter_map(|b| b.kind()).collect();
        assert_eq!(kinds, vec![BlockKind::Cover, BlockKind::Table, BlockKind::Text]);

        save(&data, &file).await.unwrap();
        let library = library(&data).unwrap();
        assert_eq!(library.recent_documents()[0].id, document.id);
    }

    #[tokio::test]
    async fn test_unknown_kind_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.json");
        let err = new_document("T", &["banner".to_string()], &file)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("banner"));
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_template_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.json");
        let data = dir.path().join("data");
        new_document("Base", &["section".to_string()], &file).await.unwrap();

        template_save(&data, &file, "Modelo").await.unwrap();
        let id = library(&data).unwrap().templates()[0].id.clone();

        let output = dir.path().join("novo.json");
        template_use(&data, id.as_str(), &output).await.unwrap();
        let document = read(&output).await.unwrap();
        assert_eq!(document.title, "Novo - Modelo");
        assert_eq!(document.blocks.len(), 1);
    }

    #[test]
    fn test_theme_setting() {
        let dir = tempfile::tempdir().unwrap();
        set_theme(dir.path(), "dark").unwrap();
        assert_eq!(library(dir.path()).unwrap().settings().get().theme, Theme::Dark);
        assert!(set_theme(dir.path(), "blue").is_err());
    }
}
