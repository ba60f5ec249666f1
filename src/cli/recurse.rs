//! Recurse command: batch encrypt a directory tree.

use std::path::Path;

use crate::cli::output;
use crate::core::engine::Engine;
use crate::error::Result;

/// Encrypt every `.sls` file under `dir` into `<file>.new`.
///
/// Failed files are reported as warnings; they don't fail the command.
pub fn execute(engine: &Engine, dir: &Path) -> Result<()> {
    let report = engine.recurse(dir)?;

    for path in &report.written {
        output::success(&format!("wrote {}", output::path(path.display())));
    }
    for (path, reason) in &report.failed {
        output::warn(&format!("skipped {}: {}", path.display(), reason));
    }

    output::kv("written", report.written.len());
    output::kv("unchanged", report.unchanged.len());
    output::kv("failed", report.failed.len());
    Ok(())
}
