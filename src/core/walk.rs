//! Batch encryption over a directory tree.
//!
//! Every file whose name contains `.sls` is loaded, has its plaintext
//! values encrypted and, when anything changed, is written next to the
//! original with a `.new` suffix. Originals are never overwritten.
//!
//! Failures are per file: a file that can't be read, encrypted or written
//! is recorded in the [`BatchReport`] and the walk moves on.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::cipher::Cipher;
use crate::core::constants::{NEW_SUFFIX, SLS_MARKER};
use crate::core::pillar::Pillar;
use crate::core::transform::Transformer;
use crate::error::{ConfigError, Result};

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// `.new` files written
    pub written: Vec<PathBuf>,
    /// Inputs with nothing to encrypt
    pub unchanged: Vec<PathBuf>,
    /// Inputs that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of files looked at.
    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len() + self.failed.len()
    }
}

/// Lazily walk `root` for pillar files, in traversal order.
///
/// Entries that can't be read are logged and skipped.
pub fn sls_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir())
        .filter(|entry| entry.file_name().to_string_lossy().contains(SLS_MARKER))
        .map(walkdir::DirEntry::into_path)
}

/// Collect the pillar files under `root`, sorted by path.
///
/// # Errors
///
/// Returns `ConfigError::NotADirectory` if `root` isn't a directory.
pub fn find_sls_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConfigError::NotADirectory(root.to_path_buf()).into());
    }

    let mut files: Vec<PathBuf> = sls_files(root).collect();
    files.sort();
    Ok(files)
}

/// Sibling output path: `<path>.new`.
pub fn new_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(NEW_SUFFIX);
    PathBuf::from(name)
}

/// Encrypt every plaintext value of every pillar file under `root`.
///
/// `recipient` is called for each file that has something to encrypt;
/// an error from it fails that file only.
///
/// # Errors
///
/// Returns `ConfigError::NotADirectory` if `root` isn't a directory. All
/// other failures end up in the report.
pub fn encrypt_tree<C, F>(
    root: &Path,
    transformer: &Transformer<'_, C>,
    recipient: F,
) -> Result<BatchReport>
where
    C: Cipher,
    F: Fn() -> Result<C::Recipient>,
{
    let files = find_sls_files(root)?;
    debug!(root = %root.display(), files = files.len(), "batch encrypt");

    let mut report = BatchReport::default();
    for path in files {
        match encrypt_file(&path, transformer, &recipient) {
            Ok(Some(output)) => report.written.push(output),
            Ok(None) => report.unchanged.push(path),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "encrypt failed");
                report.failed.push((path, e.to_string()));
            }
        }
    }

    debug!(
        written = report.written.len(),
        unchanged = report.unchanged.len(),
        failed = report.failed.len(),
        "batch done"
    );
    Ok(report)
}

fn encrypt_file<C, F>(
    path: &Path,
    transformer: &Transformer<'_, C>,
    recipient: &F,
) -> Result<Option<PathBuf>>
where
    C: Cipher,
    F: Fn() -> Result<C::Recipient>,
{
    let mut pillar = Pillar::load(path)?;
    if pillar.plaintext_names().is_empty() {
        debug!(path = %path.display(), "nothing to encrypt");
        return Ok(None);
    }

    let recipient = recipient()?;
    if !transformer.encrypt_all(&mut pillar, &recipient)? {
        return Ok(None);
    }

    let output = new_path(path);
    pillar.save(&output)?;
    Ok(Some(output))
}
