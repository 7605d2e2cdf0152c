//! Writes batches to disk: compact JSON, metadata and one PNG per flower.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    batch::Batch,
    error::FlowerError,
    flower::CompactRecord,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub garden: String,
    pub seed: u64,
    pub serial: u64,
    pub flower_count: usize,
    pub display_scale: u32,
    pub timestamp: String,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("snapshot holds an invalid flower: {0}")]
    Flower(#[from] FlowerError),
}

pub struct SnapshotWriter {
    output_dir: PathBuf,
    display_scale: u32,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl AsRef<Path>, display_scale: u32) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            display_scale,
        }
    }

    pub fn batch_dir(&self, garden: &str, serial: u64) -> PathBuf {
        self.output_dir
            .join(garden)
            .join(format!("batch_{serial:06}"))
    }

    pub fn write(&self, garden: &str, seed: u64, batch: &Batch) -> Result<PathBuf, SnapshotError> {
        let dir = self.batch_dir(garden, batch.serial());
        fs::create_dir_all(&dir)?;

        fs::write(dir.join("batch.json"), batch.to_json()?)?;

        let metadata = SnapshotMetadata {
            garden: garden.to_string(),
            seed,
            serial: batch.serial(),
            flower_count: batch.len(),
            display_scale: self.display_scale,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        fs::write(
            dir.join("metadata.json"),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        for (index, canvas) in batch.render_all().iter().enumerate() {
            canvas
                .upscaled(self.display_scale)
                .save(dir.join(format!("flower_{index:02}.png")))?;
        }

        tracing::info!(
            garden,
            serial = batch.serial(),
            path = %dir.display(),
            "wrote batch snapshot"
        );
        Ok(dir)
    }

    pub fn load_metadata(&self, batch_dir: impl AsRef<Path>) -> Result<SnapshotMetadata, SnapshotError> {
        let contents = fs::read_to_string(batch_dir.as_ref().join("metadata.json"))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Rebuilds the batch stored in `batch_dir`, validating every record.
    pub fn load_batch(&self, batch_dir: impl AsRef<Path>) -> Result<(SnapshotMetadata, Batch), SnapshotError> {
        let batch_dir = batch_dir.as_ref();
        let metadata = self.load_metadata(batch_dir)?;
        let contents = fs::read_to_string(batch_dir.join("batch.json"))?;
        let records: Vec<CompactRecord> = serde_json::from_str(&contents)?;
        let batch = Batch::from_records(metadata.serial, &records)?;
        Ok((metadata, batch))
    }

    /// Batch directories for `garden`, oldest first.
    pub fn list_batches(&self, garden: &str) -> Result<Vec<PathBuf>, SnapshotError> {
        let root = self.output_dir.join(garden);
        let mut batches = Vec::new();
        if !root.exists() {
            return Ok(batches);
        }
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            let is_batch = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("batch_"));
            if path.is_dir() && is_batch {
                batches.push(path);
            }
        }
        batches.sort();
        Ok(batches)
    }
}
