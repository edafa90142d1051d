use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Computes the hex-encoded HMAC-SHA-512 signature of a webhook payload.
///
/// The hash runs over the exact bytes received on the wire; re-serializing the JSON would break byte-identity
/// with what the gateway signed.
pub fn calculate_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signature_is_deterministic_and_key_sensitive() {
        let payload = br#"{"event":"charge.success"}"#;
        let a = calculate_signature("sk_test_1", payload);
        let b = calculate_signature("sk_test_1", payload);
        let c = calculate_signature("sk_test_2", payload);
        assert_eq!(a, b);
        assert_ne!(a, c);
        // SHA-512 digest, hex-encoded.
        assert_eq!(a.len(), 128);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_covers_the_exact_bytes() {
        let a = calculate_signature("sk", br#"{"a":1}"#);
        let b = calculate_signature("sk", br#"{"a": 1}"#);
        assert_ne!(a, b);
    }
}
