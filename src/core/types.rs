//! Type aliases for domain concepts.

/// Name of a secret inside a pillar (e.g. `db_password`).
pub type SecretName = String;

/// A pillar value, either plaintext or an armored PGP message.
pub type SecretValue = String;

/// ASCII-armored OpenPGP message.
pub type ArmoredBlob = String;
