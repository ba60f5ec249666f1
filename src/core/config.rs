//! Settings.
//!
//! Keyring paths and the default encryption key, resolved from built-in
//! defaults, an optional `.secure-pillar.toml` file and command-line
//! overrides, in that order.
//!
//! ```toml
//! [gpg]
//! pubring = "~/.gnupg/pubring.gpg"
//! secring = "~/.gnupg/secring.gpg"
//! key = "Salt Master"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::constants::{CONFIG_FILE, DEFAULT_PUBRING, DEFAULT_SECRING};
use crate::error::{ConfigError, Result};

/// Resolved settings passed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Public keyring used to resolve encryption recipients
    pub pubring: PathBuf,
    /// Secret keyring used for decryption
    pub secring: PathBuf,
    /// Name, email or key id of the encryption key
    pub pgp_key: Option<String>,
}

/// Settings file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub gpg: GpgSection,
}

/// `[gpg]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpgSection {
    pub pubring: Option<String>,
    pub secring: Option<String>,
    pub key: Option<String>,
}

/// Command-line overrides; `None` keeps the lower layer's value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub pubring: Option<PathBuf>,
    pub secring: Option<PathBuf>,
    pub pgp_key: Option<String>,
}

impl ConfigFile {
    /// Parse settings file text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// Read a settings file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }
}

impl Settings {
    /// Built-in defaults: `~/.gnupg/pubring.gpg`, `~/.gnupg/secring.gpg`
    /// and no key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if the home directory is unknown.
    pub fn defaults() -> Result<Self> {
        let home = home_dir()?;
        Ok(Self {
            pubring: home.join(DEFAULT_PUBRING),
            secring: home.join(DEFAULT_SECRING),
            pgp_key: None,
        })
    }

    /// Resolve settings.
    ///
    /// With `config` set, that file must exist. Otherwise
    /// `.secure-pillar.toml` in the working directory is used if present.
    ///
    /// # Errors
    ///
    /// Returns error if the home directory is unknown or the settings file
    /// can't be read or parsed.
    pub fn resolve(config: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match config {
            Some(path) => Some(ConfigFile::load(path)?),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.is_file() {
                    Some(ConfigFile::load(path)?)
                } else {
                    None
                }
            }
        };

        let settings = Self::defaults()?
            .with_file(file.unwrap_or_default())?
            .with_overrides(overrides);

        debug!(
            pubring = %settings.pubring.display(),
            secring = %settings.secring.display(),
            key = settings.pgp_key.as_deref().unwrap_or("-"),
            "settings resolved"
        );
        Ok(settings)
    }

    /// Apply a settings file over these settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if a `~/` path can't be expanded.
    pub fn with_file(mut self, file: ConfigFile) -> Result<Self> {
        if let Some(pubring) = file.gpg.pubring {
            self.pubring = expand_home(&pubring)?;
        }
        if let Some(secring) = file.gpg.secring {
            self.secring = expand_home(&secring)?;
        }
        if file.gpg.key.is_some() {
            self.pgp_key = file.gpg.key;
        }
        Ok(self)
    }

    /// Apply command-line overrides over these settings.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(pubring) = overrides.pubring {
            self.pubring = pubring;
        }
        if let Some(secring) = overrides.secring {
            self.secring = secring;
        }
        if overrides.pgp_key.is_some() {
            self.pgp_key = overrides.pgp_key;
        }
        self
    }

    /// The encryption key identifier.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if none was configured.
    pub fn require_key(&self) -> Result<&str> {
        self.pgp_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingKey.into())
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| ConfigError::NoHomeDir.into())
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None if path == "~" => home_dir(),
        None => Ok(PathBuf::from(path)),
    }
}
