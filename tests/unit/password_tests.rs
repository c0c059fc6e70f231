// ============================
// tests/unit/password_tests.rs
// ============================
use sessionauth_backend::auth::{
    hash_password, validate_password_length, verify_password, MIN_PASSWORD_LENGTH,
};

#[test]
fn test_password_hashing_and_verification() {
    let hash = hash_password("1234", 4).unwrap();

    assert_ne!(hash, "1234");
    assert!(verify_password(&hash, "1234"));
    assert!(!verify_password(&hash, "wrong_password"));
}

#[test]
fn test_hash_from_other_cost_still_verifies() {
    let cheap = hash_password("1234", 4).unwrap();
    let dearer = hash_password("1234", 6).unwrap();

    // the cost is read back from the stored hash
    assert!(verify_password(&cheap, "1234"));
    assert!(verify_password(&dearer, "1234"));
}

#[test]
fn test_password_length_boundary() {
    assert_eq!(MIN_PASSWORD_LENGTH, 4);
    assert!(!validate_password_length("abc", MIN_PASSWORD_LENGTH));
    assert!(validate_password_length("abcd", MIN_PASSWORD_LENGTH));
}
