//! Set command: encrypt one named value into a pillar.

use std::io::{IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::engine::{Destination, Engine, Source};
use crate::error::{ConfigError, Result};

/// Encrypt `secret` (or stdin) under `name` and write the pillar.
pub fn execute(
    engine: &Engine,
    name: &str,
    secret: Option<String>,
    file: &str,
    out: &str,
) -> Result<()> {
    let secret = match secret {
        Some(secret) => Zeroizing::new(secret),
        None => read_secret()?,
    };

    let destination = Destination::from_arg(out);
    engine.set_value(&Source::from_arg(file), &destination, name, &secret)?;

    if let Destination::File(path) = &destination {
        output::success(&format!(
            "wrote {} to {}",
            output::key(name),
            output::path(path.display())
        ));
    }
    Ok(())
}

/// Read the secret from piped stdin, dropping one trailing newline.
fn read_secret() -> Result<Zeroizing<String>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(ConfigError::NoSecretValue.into());
    }

    let mut secret = Zeroizing::new(String::new());
    stdin.read_to_string(&mut secret)?;

    let trimmed = secret
        .strip_suffix("\r\n")
        .or_else(|| secret.strip_suffix('\n'))
        .map(str::to_string);
    if let Some(trimmed) = trimmed {
        secret = Zeroizing::new(trimmed);
    }
    Ok(secret)
}
