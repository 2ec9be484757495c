//! Export boundary
//!
//! One entry point for every output format. Backend errors are logged here
//! and reduced to a user-facing message.

use crate::{AppSettings, ProjectionContext};
use doc_model::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("formato desconhecido: {}", other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Erro ao exportar {format}")]
    Failed {
        format: ExportFormat,
        #[source]
        source: anyhow::Error,
    },
}

impl ExportError {
    pub fn format(&self) -> ExportFormat {
        match self {
            ExportError::Failed { format, .. } => *format,
        }
    }
}

/// Export `document` into `dir` as `{title}.{ext}`
pub async fn export(
    document: &Document,
    settings: &AppSettings,
    format: ExportFormat,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    let ctx = ProjectionContext::from_settings(settings);
    let result: anyhow::Result<PathBuf> = match format {
        ExportFormat::Pdf => crate::pdf::export_pdf(document, &ctx, dir)
            .await
            .map_err(anyhow::Error::from),
        ExportFormat::Docx => crate::docx::export_docx(document, &ctx, dir)
            .await
            .map_err(anyhow::Error::from),
        ExportFormat::Json => crate::export_json(document, dir)
            .await
            .map_err(anyhow::Error::from),
    };

    result.map_err(|source| {
        tracing::error!(%format, error = %source, document = %document.id, "export failed");
        ExportError::Failed { format, source }
    })
}
