//! Parsing of `gpg --with-colons` key listings.
//!
//! Only the records needed for identity resolution are read:
//! `pub`/`sec` open a new entry, `sub`/`ssb` add a subkey, `fpr` fills in
//! the fingerprint of the key it follows and `uid` adds a user id.

use super::{KeyEntry, Subkey, UserId};

const KEY_ID_FIELD: usize = 4;
const FINGERPRINT_FIELD: usize = 9;
const USER_ID_FIELD: usize = 9;

/// Parse a colon listing into key entries, in listing order.
pub fn parse_listing(listing: &str) -> Vec<KeyEntry> {
    let mut entries: Vec<KeyEntry> = Vec::new();

    for line in listing.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or_default();

        match field(0) {
            "pub" | "sec" => entries.push(KeyEntry {
                key_id: field(KEY_ID_FIELD).to_string(),
                ..KeyEntry::default()
            }),
            "sub" | "ssb" => {
                if let Some(entry) = entries.last_mut() {
                    entry.subkeys.push(Subkey {
                        key_id: field(KEY_ID_FIELD).to_string(),
                        fingerprint: String::new(),
                    });
                }
            }
            "fpr" => {
                if let Some(entry) = entries.last_mut() {
                    let fingerprint = field(FINGERPRINT_FIELD).to_string();
                    match entry.subkeys.last_mut() {
                        Some(subkey) if subkey.fingerprint.is_empty() => {
                            subkey.fingerprint = fingerprint
                        }
                        None if entry.fingerprint.is_empty() => entry.fingerprint = fingerprint,
                        _ => {}
                    }
                }
            }
            "uid" => {
                if let Some(entry) = entries.last_mut() {
                    entry
                        .user_ids
                        .push(parse_user_id(&unescape(field(USER_ID_FIELD))));
                }
            }
            _ => {}
        }
    }

    entries
}

/// Split a raw `Name (Comment) <email>` user id into its parts.
pub fn parse_user_id(raw: &str) -> UserId {
    let email = match (raw.rfind('<'), raw.rfind('>')) {
        (Some(start), Some(end)) if start < end => Some(raw[start + 1..end].trim().to_string()),
        _ => None,
    };

    let comment = match (raw.find('('), raw.rfind(')')) {
        (Some(start), Some(end)) if start < end => Some(raw[start + 1..end].trim().to_string()),
        _ => None,
    };

    let name_end = raw.find(['(', '<']).unwrap_or(raw.len());

    UserId {
        raw: raw.to_string(),
        name: raw[..name_end].trim().to_string(),
        comment,
        email,
    }
}

/// Decode the `\xHH` escapes gpg uses inside colon listings.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'x') {
            if let Some(byte) = field
                .get(i + 2..i + 4)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
