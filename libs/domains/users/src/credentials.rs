//! Password hashing, verification and policy.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{
        SaltString,
        rand_core::{OsRng, RngCore},
    },
};

use crate::error::{UserError, UserResult};

/// Argon2id memory cost in KiB
pub const HASH_MEMORY_COST_KIB: u32 = 19_456;
/// Argon2id iterations
pub const HASH_TIME_COST: u32 = 2;
pub const HASH_PARALLELISM: u32 = 1;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn hasher() -> UserResult<Argon2<'static>> {
    let params = Params::new(HASH_MEMORY_COST_KIB, HASH_TIME_COST, HASH_PARALLELISM, None)
        .map_err(|e| UserError::PasswordHash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash `password` with a fresh salt into a PHC string.
pub fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

/// True iff `password` reproduces `hash`. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    // Cost parameters are read back from the PHC string
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Check the password policy, reporting only the first rule that fails.
///
/// Rules in order: minimum length, an uppercase letter, a lowercase
/// letter, a digit, a symbol from [`PASSWORD_SYMBOLS`].
pub fn validate_password_strength(password: &str) -> UserResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(UserError::Validation(
            "password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(UserError::Validation(
            "password must contain at least one lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(UserError::Validation(
            "password must contain at least one digit".to_string(),
        ));
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err(UserError::Validation(format!(
            "password must contain at least one symbol ({PASSWORD_SYMBOLS})"
        )));
    }
    Ok(())
}

/// Random URL-safe password of exactly `length` characters from the OS RNG.
pub fn generate_random_password(length: usize) -> UserResult<String> {
    if length < MIN_PASSWORD_LENGTH {
        return Err(UserError::Validation(format!(
            "generated passwords must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| UserError::PasswordHash(e.to_string()))?;

    // 256 is a multiple of 64, so the modulo keeps the distribution uniform
    Ok(bytes
        .iter()
        .map(|b| URL_SAFE_ALPHABET[(*b % 64) as usize] as char)
        .collect())
}
