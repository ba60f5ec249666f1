//! Constants used throughout secure-pillar.
//!
//! Centralizes magic strings and configuration values.

/// Armor header that marks a value as already encrypted.
pub const PGP_HEADER: &str = "-----BEGIN PGP MESSAGE-----";

/// Armor block type produced and accepted by the cipher.
pub const PGP_MESSAGE: &str = "PGP MESSAGE";

/// Renderer line written at the top of every pillar, followed by a blank line.
pub const PILLAR_HEADER: &str = "#!yaml|gpg\n\n";

/// Substring a file name must contain to be picked up by a recursive walk.
pub const SLS_MARKER: &str = ".sls";

/// Suffix appended to files written by a recursive walk.
pub const NEW_SUFFIX: &str = ".new";

/// Source/destination name meaning stdin or stdout.
pub const STDIO: &str = "-";

/// Configuration file name looked up in the working directory.
pub const CONFIG_FILE: &str = ".secure-pillar.toml";

/// Default public keyring relative to HOME.
pub const DEFAULT_PUBRING: &str = ".gnupg/pubring.gpg";

/// Default secret keyring relative to HOME.
pub const DEFAULT_SECRING: &str = ".gnupg/secring.gpg";
