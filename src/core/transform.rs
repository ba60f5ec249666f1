//! Document transformations.
//!
//! Applies a [`Cipher`] to the values of a [`Pillar`]:
//!
//! - **encrypt one value**: set a named secret to freshly encrypted text,
//!   replacing whatever was there
//! - **encrypt all**: encrypt every plaintext value, leave encrypted ones
//!   byte-for-byte alone
//! - **decrypt all**: reveal every encrypted value for display, without
//!   touching the document

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::cipher::Cipher;
use crate::core::pillar::{is_encrypted, Pillar};
use crate::core::types::SecretName;
use crate::error::{ConfigError, Result};

/// A document-level encryption request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    /// Set `name` to the encryption of `value`.
    EncryptValue { name: &'a str, value: &'a str },
    /// Encrypt every plaintext value.
    EncryptAll,
}

/// Result of [`Transformer::transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub pillar: Pillar,
    /// Whether any value was (re)encrypted
    pub changed: bool,
}

/// A decrypted secret.
#[derive(Debug)]
pub struct Revealed {
    pub name: SecretName,
    pub value: Zeroizing<String>,
}

/// Runs cipher operations over pillar documents.
pub struct Transformer<'c, C: Cipher> {
    cipher: &'c C,
}

impl<'c, C: Cipher> Transformer<'c, C> {
    pub fn new(cipher: &'c C) -> Self {
        Self { cipher }
    }

    /// Apply an encryption request to a pillar.
    ///
    /// # Errors
    ///
    /// Returns error if the request is invalid or encryption fails. On
    /// error the input pillar is dropped unchanged; nothing is partially
    /// applied.
    pub fn transform(
        &self,
        mut pillar: Pillar,
        request: &Request<'_>,
        recipient: &C::Recipient,
    ) -> Result<Transformed> {
        let changed = match *request {
            Request::EncryptValue { name, value } => {
                self.encrypt_value(&mut pillar, name, value, recipient)?
            }
            Request::EncryptAll => self.encrypt_all(&mut pillar, recipient)?,
        };

        Ok(Transformed { pillar, changed })
    }

    /// Encrypt `value` and store it under `name`.
    ///
    /// Any previous value is overwritten, encrypted or not. Always returns
    /// `true`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyName` for an empty name, or the cipher's
    /// error.
    pub fn encrypt_value(
        &self,
        pillar: &mut Pillar,
        name: &str,
        value: &str,
        recipient: &C::Recipient,
    ) -> Result<bool> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName.into());
        }

        let ciphertext = self.cipher.encrypt(value, recipient)?;
        if pillar.insert(name, ciphertext).is_some() {
            debug!(name, "replaced existing value");
        }

        Ok(true)
    }

    /// Encrypt every value that isn't encrypted yet.
    ///
    /// Returns whether anything changed; `false` for an empty or fully
    /// encrypted pillar.
    ///
    /// # Errors
    ///
    /// Returns the first cipher error. Ciphertexts are only written into
    /// the pillar after every value encrypted successfully.
    pub fn encrypt_all(&self, pillar: &mut Pillar, recipient: &C::Recipient) -> Result<bool> {
        let encrypted: Vec<(String, String)> = pillar
            .iter()
            .filter(|(_, value)| !is_encrypted(value))
            .map(|(name, value)| Ok((name.to_string(), self.cipher.encrypt(value, recipient)?)))
            .collect::<Result<_>>()?;

        debug!(
            encrypted = encrypted.len(),
            untouched = pillar.len() - encrypted.len(),
            cipher = self.cipher.name(),
            "encrypt all"
        );

        let changed = !encrypted.is_empty();
        for (name, ciphertext) in encrypted {
            pillar.insert(name, ciphertext);
        }

        Ok(changed)
    }

    /// Decrypt every encrypted value, in name order.
    ///
    /// Plaintext values are skipped. The pillar is not modified.
    ///
    /// # Errors
    ///
    /// Returns the first cipher error.
    pub fn decrypt_all(&self, pillar: &Pillar, keyring: &C::Keyring) -> Result<Vec<Revealed>> {
        pillar
            .iter()
            .filter(|(_, value)| is_encrypted(value))
            .map(|(name, value)| {
                Ok(Revealed {
                    name: name.to_string(),
                    value: self.cipher.decrypt(value, keyring)?,
                })
            })
            .collect()
    }

    /// A copy of `pillar` with every encrypted value replaced by its
    /// plaintext. The pillar itself is not modified.
    ///
    /// # Errors
    ///
    /// Returns the first cipher error.
    pub fn reveal(&self, pillar: &Pillar, keyring: &C::Keyring) -> Result<Pillar> {
        let mut plain = pillar.clone();
        for secret in self.decrypt_all(pillar, keyring)? {
            plain.insert(secret.name, secret.value.as_str());
        }
        Ok(plain)
    }
}
