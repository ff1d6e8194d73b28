//! Argon2id password storage for admins and authors

use std::fmt;

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, password_hash::rand_core::OsRng};

/// 去掉易混淆的 0/O、1/l/I
const TEMP_PASSWORD_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

pub const TEMP_PASSWORD_LENGTH: usize = 12;

/// Hashing failed, or the stored value is not a PHC string
#[derive(Debug)]
pub struct PasswordError {
    stage: &'static str,
    source: password_hash::Error,
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "password {} failed: {}", self.stage, self.source)
    }
}

impl std::error::Error for PasswordError {}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|source| PasswordError {
            stage: "hash",
            source,
        })
}

/// `Ok(false)` on mismatch; `Err` only when `hash` cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|source| PasswordError {
        stage: "parse",
        source,
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// `$argon2id$...` / `$argon2i$...` / `$argon2d$...`
pub fn is_argon2_hash(s: &str) -> bool {
    s.starts_with("$argon2")
}

/// 新建作者或管理员重置时下发的一次性密码
pub fn generate_temporary_password() -> String {
    super::generate_from_alphabet(TEMP_PASSWORD_CHARS, TEMP_PASSWORD_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).expect("verify should succeed"));
        assert!(!verify_password("battery staple", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_plain_text_is_not_a_hash() {
        assert!(!is_argon2_hash("admin"));
        let err = verify_password("admin", "admin").unwrap_err();
        assert!(err.to_string().starts_with("password parse failed"));
    }

    #[test]
    fn test_temporary_password_charset() {
        let pwd = generate_temporary_password();
        assert_eq!(pwd.len(), TEMP_PASSWORD_LENGTH);
        assert!(pwd.bytes().all(|b| TEMP_PASSWORD_CHARS.contains(&b)));
        assert!(!pwd.contains('0') && !pwd.contains('O') && !pwd.contains('l'));
    }
}
