//! Decrypt command: show the encrypted values of a pillar in plaintext.

use std::collections::BTreeMap;

use crate::cli::output;
use crate::core::engine::{Destination, Engine, Source};
use crate::core::transform::Revealed;
use crate::error::Result;

/// Decrypt every encrypted value of `file` and print it, or write the
/// decrypted pillar to `out`.
pub fn execute(engine: &Engine, file: &str, json: bool, out: Option<&str>) -> Result<()> {
    if let Some(out) = out {
        return write_pillar(engine, file, out);
    }

    let revealed = engine.decrypt_file(&Source::from_arg(file))?;

    if json {
        output::raw(&render_json(&revealed)?);
    } else if revealed.is_empty() {
        output::dimmed(&format!("{}: no encrypted values", file));
    } else {
        for secret in &revealed {
            output::raw(&render_line(secret));
        }
    }
    Ok(())
}

fn write_pillar(engine: &Engine, file: &str, out: &str) -> Result<()> {
    let destination = Destination::from_arg(out);
    let count = engine.decrypt_to(&Source::from_arg(file), &destination)?;

    if let Destination::File(path) = &destination {
        output::success(&format!(
            "wrote {} with {} decrypted value(s)",
            output::path(path.display()),
            count
        ));
    }
    Ok(())
}

/// `name: "value"` display line.
fn render_line(secret: &Revealed) -> String {
    format!("{}: \"{}\"", secret.name, secret.value.as_str())
}

fn render_json(revealed: &[Revealed]) -> Result<String> {
    let map: BTreeMap<&str, &str> = revealed
        .iter()
        .map(|secret| (secret.name.as_str(), secret.value.as_str()))
        .collect();
    Ok(serde_json::to_string_pretty(&map)?)
}
