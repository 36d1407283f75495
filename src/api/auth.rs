//! Password hashing and session tokens.
//!
//! Clients hold the raw session token; only its SHA-256 digest is stored.

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use axum::http::HeaderMap;
use rand::Rng;
use sha2::{Digest, Sha256};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password with Argon2id
pub fn hash_password(password: &str) -> Result<String, anyhow::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| anyhow::anyhow!("Password hash error: {}", e))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// 32 random bytes, hex encoded
pub fn generate_session_token() -> String {
  let bytes: [u8; 32] = rand::thread_rng().gen();
  hex::encode(bytes)
}

pub fn hash_session_token(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

/// Lowercased, trimmed email, or `None` when it cannot be an address.
pub fn normalize_email(email: &str) -> Option<String> {
  let email = email.trim().to_lowercase();
  let (local, domain) = email.split_once('@')?;
  if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
    return None;
  }
  Some(email)
}
