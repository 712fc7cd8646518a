//! [`TariffSource`] over an annex spreadsheet or CSV on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tariffscope_recon::tables::TableSource;
use tariffscope_recon::{SourceError, SourceTier, TariffEntry, TariffSource};

use crate::annex::{parse_annex, DEFAULT_AUTHORITY};
use crate::error::DocumentError;
use crate::reader::read_grid;

/// Structured-document adapter. The file is read on first use and the
/// parsed table kept for the life of the adapter; a failed load is not
/// remembered, so a file that appears later is picked up.
pub struct DocumentSource {
    name: String,
    path: PathBuf,
    sheet: Option<String>,
    table: Mutex<Option<Arc<TableSource>>>,
}

impl DocumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            name: DEFAULT_AUTHORITY.to_string(),
            path: path.into(),
            sheet: None,
            table: Mutex::new(None),
        }
    }

    pub fn with_sheet(mut self, sheet: Option<&str>) -> Self {
        self.sheet = sheet.map(str::to_string);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.table.lock().is_some()
    }

    /// Parsed table, loading it if this is the first successful call.
    pub fn load(&self) -> Result<Arc<TableSource>, DocumentError> {
        let mut slot = self.table.lock();
        if let Some(table) = slot.as_ref() {
            return Ok(table.clone());
        }

        let grid = read_grid(&self.path, self.sheet.as_deref())?;
        let verification = match self.path.file_name() {
            Some(file) => format!("Loaded from {}", file.to_string_lossy()),
            None => "Loaded from document".to_string(),
        };
        let entries = parse_annex(&grid, &verification)?;
        let table = Arc::new(TableSource::from_entries(&self.name, SourceTier::StructuredDocument, entries));
        log::info!(
            "loaded {} entries for {} countries from {}",
            table.entry_count(),
            table.countries().len(),
            self.path.display()
        );

        *slot = Some(table.clone());
        Ok(table)
    }
}

impl TariffSource for DocumentSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> SourceTier {
        SourceTier::StructuredDocument
    }

    fn fetch(&self, country: &str, sector: Option<&str>) -> Result<Vec<TariffEntry>, SourceError> {
        let table = self.load()?;
        table.fetch(country, sector)
    }

    fn countries(&self) -> Vec<String> {
        match self.load() {
            Ok(table) => table.countries(),
            Err(e) => {
                log::warn!("{}: {e}", self.name);
                Vec::new()
            }
        }
    }
}
