//! Request orchestration.
//!
//! The [`Engine`] ties settings, keyrings, the cipher and the document
//! model together for each kind of request. Keyrings are loaded only when
//! a request actually needs them, and the encryption identity is loaded
//! once and reused for the rest of the run.

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::cipher::Gpg;
use crate::core::config::Settings;
use crate::core::constants::STDIO;
use crate::core::keyring::{Identity, Keyring, KeyringKind};
use crate::core::pillar::{write_atomic, Pillar};
use crate::core::transform::{Request, Revealed, Transformer};
use crate::core::walk::{self, BatchReport};
use crate::error::{ConfigError, Result};

/// Where a pillar is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input; always an empty pillar
    Stdin,
    File(PathBuf),
}

impl Source {
    /// `-` means stdin, anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == STDIO {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Stdin => None,
            Self::File(path) => Some(path),
        }
    }

    /// Load the pillar this source names.
    ///
    /// # Errors
    ///
    /// Returns `PillarError::Read` if the file exists but can't be read.
    pub fn load(&self) -> Result<Pillar> {
        match self {
            Self::Stdin => Ok(Pillar::new()),
            Self::File(path) => Pillar::load(path),
        }
    }

    fn require_file(&self, mode: &'static str) -> Result<&Path> {
        self.path()
            .ok_or_else(|| ConfigError::RequiresFile { mode }.into())
    }
}

/// Where a rendered pillar is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// `-` means stdout, anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == STDIO {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// Write rendered text.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    pub fn write(&self, text: &str) -> Result<()> {
        match self {
            Self::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
                Ok(())
            }
            Self::File(path) => write_atomic(path, text),
        }
    }
}

/// Runs requests against one set of settings.
#[derive(Debug)]
pub struct Engine {
    settings: Settings,
    cipher: Gpg,
    recipient: RefCell<Option<Identity>>,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cipher: Gpg,
            recipient: RefCell::new(None),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The encryption identity, loaded from the public keyring on first use.
    ///
    /// # Errors
    ///
    /// Returns error if no key is configured, the public keyring can't be
    /// loaded, or no entry matches the key.
    pub fn recipient(&self) -> Result<Identity> {
        if let Some(identity) = self.recipient.borrow().as_ref() {
            return Ok(identity.clone());
        }

        let key = self.settings.require_key()?;
        let pubring = Keyring::load(&self.settings.pubring, KeyringKind::Public)?;
        let identity = pubring.require(key)?;
        debug!(%identity, "encryption key");

        *self.recipient.borrow_mut() = Some(identity.clone());
        Ok(identity)
    }

    /// Set `name` to the encryption of `value` and write the pillar.
    ///
    /// # Errors
    ///
    /// Any failure is returned; nothing is written on error.
    pub fn set_value(
        &self,
        source: &Source,
        destination: &Destination,
        name: &str,
        value: &str,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName.into());
        }

        let pillar = source.load()?;
        let recipient = self.recipient()?;
        let transformed = Transformer::new(&self.cipher).transform(
            pillar,
            &Request::EncryptValue { name, value },
            &recipient,
        )?;

        destination.write(&transformed.pillar.to_yaml()?)
    }

    /// Encrypt every plaintext value of a pillar file.
    ///
    /// Returns whether anything was written; a pillar with nothing to
    /// encrypt is left alone and no keyring is loaded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RequiresFile` for stdin, or any load,
    /// keyring, cipher or write failure.
    pub fn encrypt_file(&self, source: &Source, destination: &Destination) -> Result<bool> {
        let path = source.require_file("encrypt")?;
        let pillar = Pillar::load(path)?;

        if pillar.plaintext_names().is_empty() {
            debug!(path = %path.display(), "nothing to encrypt");
            return Ok(false);
        }

        let recipient = self.recipient()?;
        let transformed = Transformer::new(&self.cipher).transform(
            pillar,
            &Request::EncryptAll,
            &recipient,
        )?;

        destination.write(&transformed.pillar.to_yaml()?)?;
        Ok(transformed.changed)
    }

    /// Decrypt every encrypted value of a pillar file for display.
    ///
    /// The secret keyring is only loaded when there is something to
    /// decrypt.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RequiresFile` for stdin, or any load,
    /// keyring or cipher failure.
    pub fn decrypt_file(&self, source: &Source) -> Result<Vec<Revealed>> {
        let path = source.require_file("decrypt")?;
        let pillar = Pillar::load(path)?;

        if pillar.encrypted_count() == 0 {
            debug!(path = %path.display(), "nothing to decrypt");
            return Ok(Vec::new());
        }

        let secring = Keyring::load(&self.settings.secring, KeyringKind::Secret)?;
        Transformer::new(&self.cipher).decrypt_all(&pillar, &secring)
    }

    /// Write a pillar file with every encrypted value decrypted.
    ///
    /// The source file is never modified. A pillar with nothing encrypted
    /// is written as-is and no keyring is loaded. Returns how many values
    /// were decrypted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RequiresFile` for stdin, or any load,
    /// keyring, cipher or write failure.
    pub fn decrypt_to(&self, source: &Source, destination: &Destination) -> Result<usize> {
        let path = source.require_file("decrypt")?;
        let pillar = Pillar::load(path)?;

        let count = pillar.encrypted_count();
        let plain = if count == 0 {
            debug!(path = %path.display(), "nothing to decrypt");
            pillar
        } else {
            let secring = Keyring::load(&self.settings.secring, KeyringKind::Secret)?;
            Transformer::new(&self.cipher).reveal(&pillar, &secring)?
        };

        destination.write(&plain.to_yaml()?)?;
        Ok(count)
    }

    /// Encrypt every pillar file under `root` into `.new` siblings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotADirectory` if `root` isn't a directory.
    /// Per-file failures are reported in the [`BatchReport`].
    pub fn recurse(&self, root: &Path) -> Result<BatchReport> {
        let transformer = Transformer::new(&self.cipher);
        walk::encrypt_tree(root, &transformer, || self.recipient())
    }
}
