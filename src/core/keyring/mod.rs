//! Keyring loading and identity resolution.
//!
//! A keyring file (binary or armored, public or secret) is imported into a
//! private [`GpgHome`] and listed back to learn its entries. Identities are
//! resolved against those entries by display name, email, raw user id or
//! key id, in that priority order across the whole keyring.

mod colons;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::gpg::{self, GpgHome};
use crate::error::{KeyringError, Result};

pub use colons::{parse_listing, parse_user_id};

/// Which half of a key pair a keyring is expected to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyringKind {
    Public,
    Secret,
}

impl KeyringKind {
    fn list_flag(self) -> &'static str {
        match self {
            Self::Public => "--list-keys",
            Self::Secret => "--list-secret-keys",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Secret => "secret",
        }
    }
}

/// A user id split into its conventional parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId {
    /// The full user id string, e.g. `Salt Master (pillar) <salt@example.com>`
    pub raw: String,
    /// Display name part
    pub name: String,
    /// Comment part, without parentheses
    pub comment: Option<String>,
    /// Email part, without angle brackets
    pub email: Option<String>,
}

/// Subkey of a keyring entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subkey {
    pub key_id: String,
    pub fingerprint: String,
}

/// One key pair entry of a keyring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEntry {
    /// Long (16 hex digit) id of the primary key
    pub key_id: String,
    /// Fingerprint of the primary key
    pub fingerprint: String,
    pub subkeys: Vec<Subkey>,
    pub user_ids: Vec<UserId>,
}

impl KeyEntry {
    /// Whether `wanted` names this key by fingerprint, long id or short id.
    ///
    /// Subkeys count too. Matching ignores case and an optional `0x` prefix.
    pub fn matches_key_id(&self, wanted: &str) -> bool {
        let wanted = wanted
            .strip_prefix("0x")
            .or_else(|| wanted.strip_prefix("0X"))
            .unwrap_or(wanted);
        if wanted.len() < 8 || !wanted.chars().all(|c| c.is_ascii_hexdigit()) {
            return false;
        }

        let primary = std::iter::once((self.key_id.as_str(), self.fingerprint.as_str()));
        let subkeys = self
            .subkeys
            .iter()
            .map(|s| (s.key_id.as_str(), s.fingerprint.as_str()));

        primary.chain(subkeys).any(|(key_id, fingerprint)| {
            fingerprint.eq_ignore_ascii_case(wanted)
                || key_id.eq_ignore_ascii_case(wanted)
                || (wanted.len() == 8
                    && key_id.len() >= 8
                    && key_id[key_id.len() - 8..].eq_ignore_ascii_case(wanted))
        })
    }
}

/// Find the entry an identifier refers to.
///
/// Every entry is tried by display name first, then every entry by email,
/// then by raw user id, then by key id. The first match in keyring order
/// wins; duplicates are not reported.
pub fn resolve<'a>(entries: &'a [KeyEntry], identifier: &str) -> Option<&'a KeyEntry> {
    if identifier.is_empty() {
        return None;
    }

    find_by_user_id(entries, |uid| uid.name == identifier)
        .or_else(|| find_by_user_id(entries, |uid| uid.email.as_deref() == Some(identifier)))
        .or_else(|| find_by_user_id(entries, |uid| uid.raw == identifier))
        .or_else(|| {
            entries
                .iter()
                .find(|entry| entry.matches_key_id(identifier))
        })
}

fn find_by_user_id<'a>(
    entries: &'a [KeyEntry],
    matches: impl Fn(&UserId) -> bool,
) -> Option<&'a KeyEntry> {
    entries
        .iter()
        .find(|entry| entry.user_ids.iter().any(&matches))
}

/// A resolved key pair entry, usable as an encryption recipient.
///
/// Holds a shared handle on the home the entry was imported into, so the
/// home stays alive as long as any identity from it does.
#[derive(Debug, Clone)]
pub struct Identity {
    entry: KeyEntry,
    home: Arc<GpgHome>,
}

impl Identity {
    /// Fingerprint of the primary key.
    pub fn fingerprint(&self) -> &str {
        &self.entry.fingerprint
    }

    /// Key pair entry this identity was resolved to.
    pub fn entry(&self) -> &KeyEntry {
        &self.entry
    }

    pub(crate) fn home(&self) -> &GpgHome {
        &self.home
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry.user_ids.first() {
            Some(uid) => write!(f, "{} [{}]", uid.raw, self.entry.key_id),
            None => write!(f, "{}", self.entry.key_id),
        }
    }
}

/// A loaded keyring.
#[derive(Debug)]
pub struct Keyring {
    path: PathBuf,
    kind: KeyringKind,
    entries: Vec<KeyEntry>,
    home: Arc<GpgHome>,
}

impl Keyring {
    /// Load a keyring file.
    ///
    /// # Errors
    ///
    /// - `KeyringError::Read` if the file can't be read
    /// - `KeyringError::Empty` if the file is blank or holds no keys of `kind`
    /// - `KeyringError::Parse` if gpg rejects the data
    /// - `KeyringError::GpgNotFound` if gpg is not installed
    pub fn load(path: &Path, kind: KeyringKind) -> Result<Self> {
        debug!(path = %path.display(), kind = kind.label(), "loading keyring");

        let data = fs::read(path).map_err(|source| KeyringError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(KeyringError::Empty(path.to_path_buf()).into());
        }

        let home = GpgHome::new()?;
        let imported = home.run(&["--quiet", "--import"], &data)?;

        let listing = home.run(&["--with-colons", "--fixed-list-mode", kind.list_flag()], b"")?;
        if !listing.status.success() {
            return Err(KeyringError::Gpg(gpg::stderr(&listing)).into());
        }
        let entries = parse_listing(&String::from_utf8_lossy(&listing.stdout));

        if !imported.status.success() {
            if entries.is_empty() {
                return Err(KeyringError::Parse {
                    path: path.to_path_buf(),
                    reason: gpg::stderr(&imported),
                }
                .into());
            }
            warn!(
                path = %path.display(),
                reason = %gpg::stderr(&imported),
                "some keys could not be imported"
            );
        }

        if entries.is_empty() {
            return Err(KeyringError::Empty(path.to_path_buf()).into());
        }

        debug!(entries = entries.len(), "keyring loaded");

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            entries,
            home: Arc::new(home),
        })
    }

    /// Resolve a name, email, user id or key id to an identity.
    pub fn resolve(&self, identifier: &str) -> Option<Identity> {
        let entry = resolve(&self.entries, identifier)?;
        debug!(identifier, key_id = %entry.key_id, "resolved identity");

        Some(Identity {
            entry: entry.clone(),
            home: Arc::clone(&self.home),
        })
    }

    /// Resolve an identifier, failing if nothing matches.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::IdentityNotFound` if no entry matches.
    pub fn require(&self, identifier: &str) -> Result<Identity> {
        self.resolve(identifier).ok_or_else(|| {
            KeyringError::IdentityNotFound {
                identifier: identifier.to_string(),
                path: self.path.clone(),
            }
            .into()
        })
    }

    /// Keyring file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> KeyringKind {
        self.kind
    }

    /// Entries in keyring order.
    pub fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn home(&self) -> &GpgHome {
        &self.home
    }
}
