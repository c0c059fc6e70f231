// ============================
// sessionauth-backend/src/auth/token_generator.rs
// ============================
//! Session ids: 256 random bits, URL-safe base64 so they fit in a cookie as-is.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

const SESSION_ID_BYTES: usize = 32;

pub fn generate_secure_token() -> String {
    let mut buffer = [0u8; SESSION_ID_BYTES];
    rand::rng().fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
