//! Password hashing and cookie-value signing. Pure functions over the
//! caller-supplied secret; nothing here touches the database.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 8;
const SALT_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Random fixed-length salt drawn from ASCII letters.
pub fn make_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LEN)
        .map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char)
        .collect()
}

/// Salted SHA-256 over name + password + salt, returned as "salt,hash".
/// Deterministic given the same salt, so it both creates and verifies.
pub fn hash_password(name: &str, password: &str, salt: Option<&str>) -> String {
    let salt = salt.map(str::to_string).unwrap_or_else(make_salt);
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{},{}", salt, hex::encode(hasher.finalize()))
}

/// Recompute with the stored salt and compare. Malformed stored values
/// (no comma) simply fail verification.
pub fn verify_password(name: &str, password: &str, stored: &str) -> bool {
    match stored.split_once(',') {
        Some((salt, _)) => hash_password(name, password, Some(salt)) == stored,
        None => false,
    }
}

fn mac_hex(secret: &str, value: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(value.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// MAC a value with the server secret, producing the cookie form "value|mac".
pub fn sign(secret: &str, value: &str) -> String {
    format!("{}|{}", value, mac_hex(secret, value))
}

/// Verify a "value|mac" token. Missing delimiter, empty value, or a mac
/// mismatch all mean "no identity" rather than an error, so tampered or
/// absent cookies never crash a request.
pub fn verify_signed(secret: &str, token: &str) -> Option<String> {
    let (value, _) = token.split_once('|')?;
    if value.is_empty() {
        return None;
    }
    if sign(secret, value) == token {
        Some(value.to_string())
    } else {
        None
    }
}
