//! Value encryption.
//!
//! Provides the encryption/decryption abstraction used by the transformer
//! and its GnuPG implementation.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file next to `gpg.rs`
//! 3. Re-export from this module

use zeroize::Zeroizing;

use crate::core::types::ArmoredBlob;
use crate::error::Result;

pub mod armor;
mod gpg;

#[cfg(test)]
pub(crate) mod mock;

pub use gpg::Gpg;

/// Cryptographic backend trait.
///
/// Recipients and keyrings are backend-specific:
/// - gpg: a resolved [`Identity`](crate::core::keyring::Identity) to encrypt
///   to, and a loaded secret [`Keyring`](crate::core::keyring::Keyring) to
///   decrypt with
pub trait Cipher {
    /// Whom a value is encrypted to.
    type Recipient;

    /// Private key material a value is decrypted with.
    type Keyring;

    /// Encrypt a plaintext value for one recipient.
    ///
    /// # Returns
    ///
    /// An armored block starting with the PGP message header.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &str, recipient: &Self::Recipient) -> Result<ArmoredBlob>;

    /// Decrypt an armored value.
    ///
    /// The backend picks the matching private key from `keyring` by the
    /// message's recipient key id.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the armor is wrong or decryption fails.
    fn decrypt(&self, armored: &str, keyring: &Self::Keyring) -> Result<Zeroizing<String>>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}
