//! Pillar documents.
//!
//! A pillar is a YAML mapping that keeps its secrets under `secure_vars`,
//! preceded by the renderer line Salt uses to pick the gpg renderer:
//!
//! ```text
//! #!yaml|gpg
//!
//! secure_vars:
//!   db_password: |-
//!     -----BEGIN PGP MESSAGE-----
//!     ...
//!     -----END PGP MESSAGE-----
//!   db_user: app
//! ```
//!
//! Values containing the PGP message header are considered encrypted,
//! everything else is plaintext. Other top-level keys are carried through
//! untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::core::constants::{PGP_HEADER, PILLAR_HEADER};
use crate::core::types::{SecretName, SecretValue};
use crate::error::{PillarError, Result};

const SECURE_VARS: &str = "secure_vars";

/// Whether a value is already an armored PGP message.
pub fn is_encrypted(value: &str) -> bool {
    value.contains(PGP_HEADER)
}

/// A parsed pillar document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pillar {
    secure_vars: BTreeMap<SecretName, SecretValue>,
    extra: Mapping,
}

impl Pillar {
    /// Create an empty pillar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse pillar text.
    ///
    /// Comment-only text and a null `secure_vars` give an empty pillar.
    /// Scalar values that aren't strings (numbers, booleans) are kept in
    /// their textual form.
    ///
    /// # Errors
    ///
    /// Returns `PillarError::Parse` for invalid YAML or a non-mapping
    /// document, and `PillarError::NestedValue` when a secret's value is a
    /// sequence or mapping.
    pub fn parse(text: &str) -> Result<Self> {
        if is_blank(text) {
            return Ok(Self::new());
        }

        let mut extra: Mapping = serde_yaml::from_str(text).map_err(PillarError::Parse)?;
        let vars = match extra.shift_remove(SECURE_VARS) {
            None | Some(Value::Null) => Mapping::new(),
            Some(vars) => serde_yaml::from_value(vars).map_err(PillarError::Parse)?,
        };

        let mut secure_vars = BTreeMap::new();
        for (key, value) in vars {
            let name = scalar_text(key).ok_or_else(|| {
                PillarError::NestedValue("<non-scalar key>".to_string())
            })?;
            let value = scalar_text(value).ok_or_else(|| PillarError::NestedValue(name.clone()))?;
            secure_vars.insert(name, value);
        }

        Ok(Self { secure_vars, extra })
    }

    /// Load a pillar file.
    ///
    /// A missing file is an empty pillar, so a new pillar can be started
    /// from scratch. A file that exists but doesn't parse is logged and
    /// also treated as empty, so one bad file can't stop a batch.
    ///
    /// # Errors
    ///
    /// Returns `PillarError::Read` if the file exists but can't be read.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no pillar file, starting empty");
                return Ok(Self::new());
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("skipping {}: {}", path.display(), e);
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(PillarError::Read {
                    path: path.to_path_buf(),
                    source,
                }
                .into())
            }
        };

        match Self::parse(&text) {
            Ok(pillar) => {
                debug!(path = %path.display(), secrets = pillar.len(), "pillar loaded");
                Ok(pillar)
            }
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                Ok(Self::new())
            }
        }
    }

    /// Render the pillar, renderer line first.
    ///
    /// `secure_vars` comes first, followed by the other top-level keys in
    /// their original order and with their original key types.
    ///
    /// # Errors
    ///
    /// Returns `PillarError::Serialize` if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        let vars: Mapping = self
            .secure_vars
            .iter()
            .map(|(name, value)| (Value::from(name.as_str()), Value::from(value.as_str())))
            .collect();

        let mut document = Mapping::with_capacity(self.extra.len() + 1);
        document.insert(Value::from(SECURE_VARS), Value::Mapping(vars));
        for (key, value) in &self.extra {
            document.insert(key.clone(), value.clone());
        }

        let body = serde_yaml::to_string(&document).map_err(PillarError::Serialize)?;

        Ok(format!("{}{}", PILLAR_HEADER, body))
    }

    /// Write the rendered pillar to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_yaml()?)
    }

    /// Value of a secret.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.secure_vars.get(name).map(String::as_str)
    }

    /// Set a secret, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<SecretName>,
        value: impl Into<SecretValue>,
    ) -> Option<SecretValue> {
        self.secure_vars.insert(name.into(), value.into())
    }

    /// Secrets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.secure_vars
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Names of secrets that are still plaintext.
    pub fn plaintext_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, value)| !is_encrypted(value))
            .map(|(name, _)| name)
            .collect()
    }

    /// Number of encrypted secrets.
    pub fn encrypted_count(&self) -> usize {
        self.iter().filter(|(_, value)| is_encrypted(value)).count()
    }

    pub fn len(&self) -> usize {
        self.secure_vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secure_vars.is_empty()
    }
}

/// Write a file through a temporary sibling and a rename, mode 0644.
///
/// # Errors
///
/// Returns `PillarError::Write` if any step fails.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source: io::Error| PillarError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    debug!(path = %path.display(), "pillar written");
    Ok(())
}

/// Nothing but whitespace and comments.
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

/// Textual form of a scalar YAML value; `None` for sequences and mappings.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
