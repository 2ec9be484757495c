//! Asynchronous image ingestion
//!
//! Reading, decoding and recompressing an image can take a while. The result
//! is applied by id once it is ready; if the target block was deleted in the
//! meantime the update is dropped.

use crate::{EditCommand, EditorSession, ImageTarget, Result};
use doc_model::ImageData;
use std::future::Future;

/// A finished image ingestion, ready to apply
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpdate {
    pub target: ImageTarget,
    pub image: ImageData,
}

/// Await an ingestion future and tag its result with its target
pub async fn ingest_image<F, E>(target: ImageTarget, ingestion: F) -> std::result::Result<ImageUpdate, E>
where
    F: Future<Output = std::result::Result<ImageData, E>>,
{
    let image = ingestion.await?;
    Ok(ImageUpdate { target, image })
}

impl EditorSession {
    /// Apply a finished ingestion; returns whether the document changed
    ///
    /// Updates for blocks that no longer exist are dropped.
    pub fn apply_image_update(&mut self, update: ImageUpdate) -> Result<bool> {
        if let ImageTarget::Block(id) = &update.target {
            if self.document().block(id).is_none() {
                tracing::debug!(block = %id, "dropping image update for deleted block");
                return Ok(false);
            }
        }
        self.execute(EditCommand::SetImage {
            target: update.target,
            image: Some(update.image),
        })
    }

    /// Clear an image slot or the company logo
    pub fn remove_image(&mut self, target: ImageTarget) -> Result<bool> {
        self.execute(EditCommand::SetImage {
            target,
            image: None,
        })
    }
}
