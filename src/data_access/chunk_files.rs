use std::path::PathBuf;

use log::info;

use crate::data_access::text_table::{read_light_curve, write_light_curve, PLAIN_COLUMNS};
use crate::data_access::LightCurve;
use crate::error::{LcError, Result};

/// Numbered chunk files `<stub>0.txt`, `<stub>1.txt`, ...
#[derive(Debug, Clone)]
pub struct ChunkFiles {
    stub: String,
    limit: usize,
}

impl ChunkFiles {
    pub fn new(stub: impl Into<String>, limit: usize) -> ChunkFiles {
        ChunkFiles {
            stub: stub.into(),
            limit,
        }
    }

    pub fn path(&self, index: usize) -> PathBuf {
        PathBuf::from(format!("{}{}.txt", self.stub, index))
    }

    /// Number of consecutive chunk files already on disk, starting at 0.
    pub fn existing(&self) -> usize {
        (0..self.limit)
            .take_while(|&i| self.path(i).exists())
            .count()
    }

    pub fn write_all(&self, chunks: &[LightCurve]) -> Result<()> {
        if chunks.len() > self.limit {
            return Err(LcError::TooManyChunks {
                found: chunks.len(),
                limit: self.limit,
            });
        }
        for (i, chunk) in chunks.iter().enumerate() {
            write_light_curve(&self.path(i), chunk)?;
        }
        info!("Wrote {} chunk files '{}N.txt'", chunks.len(), self.stub);
        Ok(())
    }

    pub fn read_all(&self, count: usize) -> Result<Vec<LightCurve>> {
        (0..count)
            .map(|i| read_light_curve(&self.path(i), PLAIN_COLUMNS))
            .collect()
    }

    /// Chunks from disk when `<stub>0.txt` exists, otherwise built with
    /// `build` and written out first.
    pub fn load_or_create<F>(&self, build: F) -> Result<Vec<LightCurve>>
    where
        F: FnOnce() -> Result<Vec<LightCurve>>,
    {
        let first = self.path(0);
        if first.exists() {
            let count = self.existing();
            info!(
                "'{}' exists! Skipping ahead to plot it and the other {} chunks.",
                first.display(),
                count - 1
            );
            return self.read_all(count);
        }

        info!("'{}' does not exist. Creating files...", first.display());
        let chunks = build()?;
        self.write_all(&chunks)?;
        Ok(chunks)
    }
}
