use super::Document;
use crate::error::{CoreError, Result};
use crate::storage::{parse_grd, parse_json, write_grd, write_json};
use cellcalc_engine::engine::CellStore;
use std::path::{Path, PathBuf};

/// On-disk layout, picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Grd,
    Json,
}

impl Format {
    fn for_path(path: &Path) -> Format {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Grd,
        }
    }
}

impl Document {
    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(CoreError::NoFilePath);
        };
        self.write_to(&path)?;
        Ok(path)
    }

    /// Save to `path` and make it the current file path.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf> {
        self.write_to(path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(path.to_path_buf())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        match Format::for_path(path) {
            Format::Grd => write_grd(path, &self.store)?,
            Format::Json => write_json(path, &self.store)?,
        }
        log::debug!("saved {} cells to {}", self.store.len(), path.display());
        self.modified = false;
        Ok(())
    }

    /// Load from file, replacing the current cells.
    ///
    /// The store is only swapped once the whole file parsed.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let grid = match Format::for_path(path) {
            Format::Grd => parse_grd(path)?,
            Format::Json => parse_json(path)?,
        };

        self.store = CellStore::from_grid(grid);
        log::debug!("loaded {} cells from {}", self.store.len(), path.display());

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}
