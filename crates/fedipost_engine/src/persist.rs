use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fedipost_core::Ledger;
use fedipost_logging::{fedipost_debug, fedipost_info};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Conventional ledger file name, relative to the site build directory.
pub const DEFAULT_LEDGER_FILENAME: &str = "posted_on_Mastodon.txt";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("ledger directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the directory holding the ledger exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // rename(2) replaces the target in one step; the old file stays intact until then.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// The ledger file: one identifier per line, sorted, newline-terminated.
///
/// Not locked. Only one dispatch cycle may use a given file at a time.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the ledger; a missing file is an empty ledger.
    pub fn load(&self) -> Result<Ledger, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let ledger = Ledger::parse(&text);
                fedipost_debug!(
                    "Loaded {} announced identifiers from {:?}",
                    ledger.len(),
                    self.path
                );
                Ok(ledger)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fedipost_info!("No ledger at {:?}; starting empty", self.path);
                Ok(Ledger::new())
            }
            Err(err) => Err(PersistError::Io(err)),
        }
    }

    /// Replaces the ledger file with `ledger` in one atomic rename.
    pub fn save(&self, ledger: &Ledger) -> Result<PathBuf, PersistError> {
        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                PersistError::OutputDir(format!("ledger path {:?} has no file name", self.path))
            })?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let written = AtomicFileWriter::new(dir).write(filename, &ledger.render())?;
        fedipost_info!(
            "Saved {} announced identifiers to {:?}",
            ledger.len(),
            written
        );
        Ok(written)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_FILENAME)
    }
}
