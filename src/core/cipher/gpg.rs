//! GPG cipher backend.
//!
//! Encrypts values using GnuPG (GNU Privacy Guard).
//!
//! ## Requirements
//!
//! - `gpg` CLI must be installed
//! - The recipient's public key must be in the public keyring
//! - The matching secret key must be in the secret keyring for decryption
//!
//! Keys with a passphrase can't be used non-interactively; pillar keys are
//! expected to be unprotected, as the Salt gpg renderer requires.

use tracing::trace;
use zeroize::Zeroizing;

use super::{armor, Cipher};
use crate::core::constants::PGP_HEADER;
use crate::core::gpg;
use crate::core::keyring::{Identity, Keyring};
use crate::core::types::ArmoredBlob;
use crate::error::{CipherError, KeyringError, Result};

/// GPG cipher backend using the gpg CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct Gpg;

impl Cipher for Gpg {
    type Recipient = Identity;
    type Keyring = Keyring;

    fn name(&self) -> &'static str {
        "gpg"
    }

    fn encrypt(&self, plaintext: &str, recipient: &Identity) -> Result<ArmoredBlob> {
        trace!(
            recipient = %recipient.fingerprint(),
            plaintext_len = plaintext.len(),
            "encrypting with GPG"
        );

        // Not signed: only the recipient is named.
        let output = recipient.home().run(
            &[
                "--quiet",
                "--yes",
                "--trust-model",
                "always",
                "--armor",
                "--encrypt",
                "--recipient",
                recipient.fingerprint(),
            ],
            plaintext.as_bytes(),
        )?;

        if !output.status.success() {
            return Err(CipherError::EncryptionFailed(format!(
                "gpg encrypt failed: {}",
                gpg::stderr(&output)
            ))
            .into());
        }

        let ciphertext = String::from_utf8(output.stdout)
            .map_err(|e| CipherError::EncryptionFailed(format!("UTF-8 error: {}", e)))?;

        if !ciphertext.contains(PGP_HEADER) {
            return Err(CipherError::EncryptionFailed(
                "gpg output is not an armored message".to_string(),
            )
            .into());
        }

        trace!(ciphertext_len = ciphertext.len(), "encrypted with GPG");
        Ok(ciphertext)
    }

    fn decrypt(&self, armored: &str, keyring: &Keyring) -> Result<Zeroizing<String>> {
        trace!(ciphertext_len = armored.len(), "decrypting with GPG");

        if keyring.is_empty() {
            return Err(KeyringError::Empty(keyring.path().to_path_buf()).into());
        }
        armor::expect_message(armored)?;

        let output = keyring
            .home()
            .run(&["--quiet", "--yes", "--decrypt"], armored.as_bytes())?;

        if !output.status.success() {
            return Err(CipherError::DecryptionFailed(format!(
                "gpg decrypt failed: {}. Ensure the secret keyring holds the recipient's key.",
                gpg::stderr(&output)
            ))
            .into());
        }

        let plaintext = Zeroizing::new(output.stdout);
        let plaintext = std::str::from_utf8(&plaintext)
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {}", e)))?;

        trace!(plaintext_len = plaintext.len(), "decrypted with GPG");
        Ok(Zeroizing::new(plaintext.to_string()))
    }
}
