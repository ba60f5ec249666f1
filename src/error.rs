//! Error types.
//!
//! Every fallible operation returns [`Result`]. Components never terminate
//! the process; the binary decides the exit code from the error it receives.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Keyring(#[from] KeyringError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Pillar(#[from] PillarError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings and request errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unable to determine home directory")]
    NoHomeDir,

    #[error("no pgp key given: pass --pgp-key or set [gpg] key in the config file")]
    MissingKey,

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("{mode} needs a pillar file, not stdin")]
    RequiresFile { mode: &'static str },

    #[error("no secret value given: pass --secret or pipe the value on stdin")]
    NoSecretValue,

    #[error("secret name cannot be empty")]
    EmptyName,
}

/// Keyring loading and identity resolution errors.
#[derive(Error, Debug)]
pub enum KeyringError {
    #[error("cannot read keyring {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse keyring {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{0} is empty")]
    Empty(PathBuf),

    #[error("no key matching '{identifier}' in {path}")]
    IdentityNotFound { identifier: String, path: PathBuf },

    #[error("gpg not found on PATH. Install GnuPG from https://gnupg.org/download/")]
    GpgNotFound,

    #[error("gpg failed: {0}")]
    Gpg(String),
}

/// Encryption and decryption errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("value is not ASCII armored")]
    InvalidArmor,

    #[error("unexpected armor block type: expected '{expected}', found '{found}'")]
    BlockType {
        expected: &'static str,
        found: String,
    },
}

/// Pillar document errors.
#[derive(Error, Debug)]
pub enum PillarError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pillar: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("failed to serialize pillar: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("value of '{0}' is not a scalar")]
    NestedValue(String),
}

impl Error {
    /// Short remediation hint shown under the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Config(ConfigError::MissingKey) => Some("pass --pgp-key <name|email|key id>"),
            Error::Keyring(KeyringError::IdentityNotFound { .. }) => {
                Some("list available keys with: gpg --list-keys")
            }
            Error::Keyring(KeyringError::Read { .. }) => {
                Some("point --pubring/--secring at exported keyring files")
            }
            Error::Keyring(KeyringError::Empty(_)) => {
                Some("export keys with: gpg --export-secret-keys > secring.gpg")
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
