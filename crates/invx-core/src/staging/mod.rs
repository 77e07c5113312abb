//! Staging of input files for a batch run.
//!
//! A [`StagingSession`] owns a private temporary directory. Documents are
//! copied into it and archives are expanded into it, so the batch only ever
//! reads from (and cleans up) its own copies. The directory lives until the
//! session is purged, kept, or dropped.

mod archive;

pub use archive::expand_zip;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::{DocumentReadError, InvxError, Result};
use crate::pdf::DocumentKind;

/// A document ready for text extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDocument {
    /// Location inside the staging directory.
    pub path: PathBuf,
    /// Identifier shown to the user: the input name, or `archive/entry`.
    pub label: String,
}

/// Temporary directory holding staged inputs.
pub struct StagingSession {
    dir: TempDir,
    documents: Vec<StagedDocument>,
    seen: HashSet<PathBuf>,
    slots: usize,
}

impl StagingSession {
    /// Create a session with a fresh temporary directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("invx-").tempdir()?;
        debug!("Created staging directory {}", dir.path().display());

        Ok(Self {
            dir,
            documents: Vec::new(),
            seen: HashSet::new(),
            slots: 0,
        })
    }

    /// Root of the staging directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Staged documents, in staging order.
    pub fn documents(&self) -> &[StagedDocument] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Stage a file from disk: documents are copied, archives expanded.
    ///
    /// Returns the number of documents added. A malformed archive yields
    /// [`InvxError::Archive`] and stages nothing.
    pub fn stage(&mut self, input: &Path) -> Result<usize> {
        let name = input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("input")
            .to_string();

        match DocumentKind::from_path(input) {
            Some(DocumentKind::Archive) => {
                let slot = self.next_slot()?;
                let paths = expand_zip(input, &slot)?;
                Ok(self.add_expanded(&name, &slot, paths))
            }
            Some(_) => {
                let data = fs::read(input)?;
                self.stage_bytes(&name, &data)
            }
            None => Err(DocumentReadError::Unsupported(input.display().to_string()).into()),
        }
    }

    /// Stage uploaded bytes under `name`.
    pub fn stage_bytes(&mut self, name: &str, data: &[u8]) -> Result<usize> {
        let file_name = sanitize_name(name);
        let kind = DocumentKind::from_path(Path::new(&file_name))
            .ok_or_else(|| InvxError::from(DocumentReadError::Unsupported(name.to_string())))?;

        let slot = self.next_slot()?;
        let path = slot.join(&file_name);
        fs::write(&path, data)?;

        if kind == DocumentKind::Archive {
            let paths = expand_zip(&path, &slot)?;
            return Ok(self.add_expanded(name, &slot, paths));
        }

        let added = self.add(StagedDocument {
            path,
            label: name.to_string(),
        });
        Ok(usize::from(added))
    }

    /// Remove the staging directory and everything in it.
    pub fn purge(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        info!("Removed staging directory {}", path.display());
        Ok(())
    }

    /// Keep the staging directory on disk and return its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }

    fn next_slot(&mut self) -> Result<PathBuf> {
        self.slots += 1;
        let slot = self.dir.path().join(format!("{:04}", self.slots));
        fs::create_dir_all(&slot)?;
        Ok(slot)
    }

    fn add_expanded(&mut self, archive_name: &str, slot: &Path, paths: Vec<PathBuf>) -> usize {
        let mut added = 0;
        for path in paths {
            let inner = path
                .strip_prefix(slot)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_else(|_| path.display().to_string());
            let label = format!("{}/{}", archive_name, inner);

            if self.add(StagedDocument { path, label }) {
                added += 1;
            }
        }
        added
    }

    fn add(&mut self, doc: StagedDocument) -> bool {
        if !self.seen.insert(doc.path.clone()) {
            return false;
        }
        self.documents.push(doc);
        true
    }
}

/// Reduce an uploaded name to a single safe file name.
fn sanitize_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = base.trim_start_matches('.').replace("..", "_");

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
