//! Reversible stand-in cipher for unit tests.

use zeroize::Zeroizing;

use super::Cipher;
use crate::core::constants::PGP_HEADER;
use crate::core::types::ArmoredBlob;
use crate::error::{CipherError, Result};

const FOOTER: &str = "-----END PGP MESSAGE-----";

/// Wraps the reversed plaintext in PGP armor lines.
///
/// Recipients are plain names; the "keyring" is the list of names that may
/// decrypt. A recipient named `fail` makes encryption fail.
pub struct MockCipher;

impl Cipher for MockCipher {
    type Recipient = String;
    type Keyring = Vec<String>;

    fn encrypt(&self, plaintext: &str, recipient: &String) -> Result<ArmoredBlob> {
        if recipient == "fail" {
            return Err(CipherError::EncryptionFailed("mock failure".to_string()).into());
        }
        let reversed: String = plaintext.chars().rev().collect();
        Ok(format!("{PGP_HEADER}\n{recipient}\n{reversed}\n{FOOTER}\n"))
    }

    fn decrypt(&self, armored: &str, keyring: &Vec<String>) -> Result<Zeroizing<String>> {
        super::armor::expect_message(armored)?;
        let mut lines = armored.lines().skip(1);
        let recipient = lines.next().unwrap_or_default();
        if !keyring.iter().any(|k| k == recipient) {
            return Err(CipherError::DecryptionFailed("no secret key".to_string()).into());
        }
        let body: Vec<&str> = lines.take_while(|line| *line != FOOTER).collect();
        Ok(Zeroizing::new(body.join("\n").chars().rev().collect()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
