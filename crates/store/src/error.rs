//! Error types for storage operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Arquivo inválido. Por favor, selecione um arquivo JSON válido. ({0})")]
    MalformedDocument(String),

    #[error("Documento não encontrado no armazenamento local: {0}")]
    MissingContent(String),

    #[error(
        "O documento é muito grande para salvar localmente (limite de armazenamento excedido: \
         {needed} bytes necessários, {available} disponíveis). \
         Use \"Exportar JSON\" para baixar o arquivo e salvar no seu computador."
    )]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Template não encontrado: {0}")]
    TemplateNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
