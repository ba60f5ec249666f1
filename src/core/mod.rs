//! Core library components.
//!
//! Keyring loading, value encryption, the pillar document model and the
//! transformations applied to single files and directory trees.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod engine;
pub mod gpg;
pub mod keyring;
pub mod pillar;
pub mod transform;
pub mod types;
pub mod walk;
