//! ASCII armor inspection.

use crate::core::constants::PGP_MESSAGE;
use crate::error::{CipherError, Result};

const BEGIN: &str = "-----BEGIN ";
const DASHES: &str = "-----";

/// Block type named by the first armor header line, e.g. `PGP MESSAGE`.
pub fn block_type(text: &str) -> Option<&str> {
    text.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(BEGIN)?.strip_suffix(DASHES))
}

/// Check that `text` is an armored PGP message.
///
/// # Errors
///
/// Returns `CipherError::InvalidArmor` when there is no armor header and
/// `CipherError::BlockType` when the header names another block type.
pub fn expect_message(text: &str) -> Result<()> {
    match block_type(text) {
        None => Err(CipherError::InvalidArmor.into()),
        Some(PGP_MESSAGE) => Ok(()),
        Some(other) => Err(CipherError::BlockType {
            expected: PGP_MESSAGE,
            found: other.to_string(),
        }
        .into()),
    }
}
