//! Small pure helpers: reference generation, email normalization, and PIN handling.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Suffix for the sender's leg of a transfer reference pair.
pub const DEBIT_SUFFIX: &str = "_DB";
/// Suffix for the recipient's leg of a transfer reference pair.
pub const CREDIT_SUFFIX: &str = "_CR";

/// Generates a funding reference: `PAYGO_<userId>_<epochMillis>_<rand0-9999>`.
///
/// The random component makes references unguessable; user id and timestamp make collisions across the system
/// practically impossible. The reference doubles as the idempotency key for the whole funding flow.
pub fn new_funding_reference(user_id: i64) -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce = rand::thread_rng().gen_range(0..10_000);
    format!("PAYGO_{user_id}_{millis}_{nonce}")
}

/// A correlated pair of transfer references sharing one base token: `TRF_<epochMillis>_<rand0-99999>` with
/// `_DB` and `_CR` suffixes for the two ledger legs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReferences {
    pub debit: String,
    pub credit: String,
}

pub fn new_transfer_references() -> TransferReferences {
    let millis = Utc::now().timestamp_millis();
    let nonce = rand::thread_rng().gen_range(0..100_000);
    let base = format!("TRF_{millis}_{nonce}");
    TransferReferences { debit: format!("{base}{DEBIT_SUFFIX}"), credit: format!("{base}{CREDIT_SUFFIX}") }
}

/// Recipient emails are matched case-insensitively and ignoring surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Transfer PINs are exactly four ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    static PIN_FORMAT: OnceLock<Regex> = OnceLock::new();
    let re = PIN_FORMAT.get_or_init(|| Regex::new(r"^\d{4}$").expect("PIN regex is valid"));
    re.is_match(pin)
}

#[derive(Debug, Clone, Error)]
#[error("Could not hash PIN: {0}")]
pub struct PinHashError(String);

/// Hashes a PIN into an argon2 PHC string for storage on the user row.
pub fn hash_pin(pin: &str) -> Result<String, PinHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(pin.as_bytes(), &salt).map_err(|e| PinHashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a PIN against the stored argon2 PHC string. An unparseable hash counts as a mismatch.
pub fn verify_pin(stored_hash: &str, pin: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default().verify_password(pin.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn funding_references_are_unique_and_well_formed() {
        let a = new_funding_reference(42);
        let b = new_funding_reference(42);
        assert!(a.starts_with("PAYGO_42_"));
        assert_eq!(a.split('_').count(), 4);
        // Same user, same millisecond is possible; the nonce still separates them (with overwhelming probability).
        assert_ne!(a, b);
    }

    #[test]
    fn transfer_references_share_a_base() {
        let refs = new_transfer_references();
        assert!(refs.debit.starts_with("TRF_"));
        assert!(refs.debit.ends_with("_DB"));
        assert!(refs.credit.ends_with("_CR"));
        let base_d = refs.debit.trim_end_matches("_DB");
        let base_c = refs.credit.trim_end_matches("_CR");
        assert_eq!(base_d, base_c);
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Bola@Example.COM "), "bola@example.com");
    }

    #[test]
    fn pin_format() {
        assert!(is_valid_pin("0412"));
        assert!(!is_valid_pin("041"));
        assert!(!is_valid_pin("04121"));
        assert!(!is_valid_pin("04a2"));
        assert!(!is_valid_pin(""));
    }

    #[test]
    fn pin_hash_round_trip() {
        let hash = hash_pin("1234").unwrap();
        assert!(verify_pin(&hash, "1234"));
        assert!(!verify_pin(&hash, "4321"));
        assert!(!verify_pin("not-a-phc-string", "1234"));
    }
}
