use crate::domain::merchant::MerchantRecord;
use crate::domain::ports::RenderedImage;
use crate::error::{EmvError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Writes rendered QR images into a directory, one file per merchant.
///
/// File names come from [`MerchantRecord::export_stem`]. Names are tracked
/// case-insensitively for the lifetime of the exporter; a record whose name is
/// already taken gets its row number appended instead of overwriting the
/// earlier file.
pub struct ImageExporter {
    dir: PathBuf,
    extension: &'static str,
    used: HashSet<String>,
}

impl ImageExporter {
    /// Creates `dir` (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>, extension: &'static str) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| EmvError::Export {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            extension,
            used: HashSet::new(),
        })
    }

    /// Writes `image` for the record at 1-based `row` and returns the path used.
    pub fn export(&mut self, row: usize, record: &MerchantRecord, image: &RenderedImage) -> Result<PathBuf> {
        let stem = record.export_stem();
        let mut file_name = format!("{stem}.{}", self.extension);
        let mut attempt = 1;
        while self.used.contains(&file_name.to_lowercase()) {
            file_name = if attempt == 1 {
                format!("{stem}-{row}.{}", self.extension)
            } else {
                format!("{stem}-{row}-{attempt}.{}", self.extension)
            };
            attempt += 1;
        }
        if attempt > 1 {
            warn!(row, %file_name, "export name already used in this run, writing under a suffixed name");
        }

        let path = self.dir.join(&file_name);
        fs::write(&path, &image.data).map_err(|source| EmvError::Export {
            path: path.clone(),
            source,
        })?;
        self.used.insert(file_name.to_lowercase());
        Ok(path)
    }
}
