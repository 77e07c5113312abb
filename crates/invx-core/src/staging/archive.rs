//! Zip archive expansion.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zip::ZipArchive;

use crate::error::ArchiveError;
use crate::pdf::DocumentKind;

/// Expand every document entry of a zip archive into `dest`.
///
/// Directories, `__MACOSX` metadata, hidden files and non-document entries
/// are skipped. Entry paths that would escape `dest` are skipped too.
/// Returns the extracted document paths sorted by path.
pub fn expand_zip(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::OpenFailed(e.to_string()))?;
    let mut archive = ZipArchive::new(file)?;

    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ArchiveError::ReadEntry(e.to_string()))?;

        if entry.is_dir() || entry.name().starts_with("__MACOSX") {
            continue;
        }

        let Some(relative) = entry.enclosed_name() else {
            debug!("Skipping unsafe archive entry {}", entry.name());
            continue;
        };

        let is_hidden = relative
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        let is_document = DocumentKind::from_path(&relative).is_some_and(|k| k.is_document());
        if is_hidden || !is_document {
            trace!("Skipping archive entry {}", relative.display());
            continue;
        }

        let out_path = dest.join(&relative);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        extracted.push(out_path);
    }

    extracted.sort();
    debug!(
        "Expanded {} documents from {}",
        extracted.len(),
        archive_path.display()
    );
    Ok(extracted)
}
