//! Encrypt command: encrypt every plaintext value of one pillar file.

use crate::cli::output;
use crate::core::engine::{Destination, Engine, Source};
use crate::error::Result;

/// Encrypt all plaintext values of `file`, writing to `out`.
pub fn execute(engine: &Engine, file: &str, out: &str) -> Result<()> {
    let destination = Destination::from_arg(out);
    let written = engine.encrypt_file(&Source::from_arg(file), &destination)?;

    match (&destination, written) {
        (Destination::File(path), true) => {
            output::success(&format!("wrote {}", output::path(path.display())))
        }
        (_, false) => output::dimmed(&format!("{}: nothing to encrypt", file)),
        _ => {}
    }
    Ok(())
}
