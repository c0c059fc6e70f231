// ============================
// sessionauth-backend/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use zeroize::Zeroize;

/// Minimum password length; anything of three chars or fewer is rejected
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Default scrypt cost (`log2(N)`)
pub const DEFAULT_WORK_FACTOR: u8 = 15;

const SCRYPT_BLOCK_SIZE: u32 = 8;
const SCRYPT_PARALLELISM: u32 = 1;
const SCRYPT_OUTPUT_LEN: usize = 32;

/// Hash a password using scrypt with the given work factor
pub fn hash_password(plain: &str, work_factor: u8) -> anyhow::Result<String> {
    let params = Params::new(
        work_factor,
        SCRYPT_BLOCK_SIZE,
        SCRYPT_PARALLELISM,
        SCRYPT_OUTPUT_LEN,
    )
    .map_err(|e| anyhow::anyhow!("invalid scrypt parameters: {e}"))?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Check that a password is long enough. Length is counted in chars.
pub fn validate_password_length(password: &str, min_length: usize) -> bool {
    password.chars().count() >= min_length
}

/// Securely hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String, work_factor: u8) -> anyhow::Result<String> {
    let hash = hash_password(plain, work_factor);
    plain.zeroize();
    hash
}
