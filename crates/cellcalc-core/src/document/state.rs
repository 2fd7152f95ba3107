use crate::error::Result;
use cellcalc_engine::engine::CellStore;
use std::path::PathBuf;

/// UI-agnostic document state for the spreadsheet.
pub struct Document {
    /// The cells and their formulas
    pub store: CellStore,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the store has been modified since the last load/save
    pub modified: bool,
    /// Reject formulas containing fragments the lexer does not recognize
    pub strict: bool,
}

impl Document {
    /// Create a new document state.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Document {
            store: CellStore::new(),
            file_path: None,
            modified: false,
            strict: false,
        }
    }

    /// Create a new document and load a file if provided.
    ///
    /// A path that does not exist yet becomes the save target.
    pub fn with_file(path: Option<PathBuf>) -> Result<Self> {
        let mut doc = Self::new();

        if let Some(ref p) = path {
            if p.exists() {
                doc.load_file(p)?;
            } else {
                doc.file_path = Some(p.clone());
                doc.modified = false;
            }
        }
        Ok(doc)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
