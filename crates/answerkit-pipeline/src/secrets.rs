// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token secret generation and hashing.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes backing a widget-token secret.
const SECRET_BYTES: usize = 48;

/// Characters of the secret exposed as a non-secret identification prefix.
pub const PREFIX_LEN: usize = 8;

/// Generate a new URL-safe token secret.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex SHA-256 of a raw token secret. The only form ever persisted.
pub fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// The non-secret identification prefix of a secret.
pub fn secret_prefix(secret: &str) -> String {
    secret.chars().take(PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_unique_and_url_safe() {
        let a = generate_secret();
        let b = generate_secret();
        assert_ne!(a, b);
        assert!(a.len() >= 60);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = hash_token("secret");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn prefix_is_eight_chars() {
        assert_eq!(secret_prefix("abcdefghijkl"), "abcdefgh");
        assert_eq!(secret_prefix("ab"), "ab");
    }
}
