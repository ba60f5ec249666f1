//! secure-pillar - Encrypt individual values in Salt pillar files with GnuPG.
//!
//! Salt's gpg renderer decrypts any pillar value that is an armored PGP
//! message. This crate produces such pillars: it encrypts named values,
//! encrypts whatever is still plaintext in a file or a whole tree, and
//! shows encrypted values back in plaintext.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── set           # Encrypt one named value
//! │   ├── encrypt       # Encrypt all plaintext values of a file
//! │   ├── decrypt       # Show encrypted values in plaintext
//! │   ├── recurse       # Batch encrypt a directory tree
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # Settings and .secure-pillar.toml
//!     ├── gpg           # Private GnuPG homes
//!     ├── keyring/      # Keyring loading and identity resolution
//!     ├── cipher/       # Encryption backends
//!     │   ├── mod       # Cipher trait
//!     │   ├── armor     # ASCII armor inspection
//!     │   └── gpg       # GnuPG implementation
//!     ├── pillar        # Pillar document model
//!     ├── transform     # Per-document encryption and decryption
//!     ├── walk          # Directory batch encryption
//!     └── engine        # Request orchestration
//! ```
//!
//! # Example
//!
//! ```no_run
//! use secure_pillar::core::config::{Overrides, Settings};
//! use secure_pillar::core::engine::{Destination, Engine, Source};
//!
//! # fn main() -> secure_pillar::error::Result<()> {
//! let settings = Settings::resolve(None, Overrides {
//!     pgp_key: Some("Salt Master".to_string()),
//!     ..Overrides::default()
//! })?;
//! let engine = Engine::new(settings);
//!
//! let source = Source::from_arg("pillar/app.sls");
//! engine.encrypt_file(&source, &Destination::from_arg("pillar/app.sls"))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
