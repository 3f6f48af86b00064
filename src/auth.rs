//! Password hashing and session-cookie signing.
//!
//! The cookie carries `{token}.{hex hmac}`; the MAC is checked before the
//! token is ever looked up in the store.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Sign a session token for cookie transport
pub fn sign_token(secret: &[u8], token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    format!("{}.{}", token, hex::encode(mac.finalize().into_bytes()))
}

/// Verify a signed cookie value and return the embedded token
pub fn verify_signed_token(secret: &[u8], value: &str) -> Option<String> {
    let (token, signature) = value.rsplit_once('.')?;
    let signature = hex::decode(signature).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_roundtrip() {
        let secret = b"test-secret";
        let signed = sign_token(secret, "abc-123");
        assert_eq!(verify_signed_token(secret, &signed), Some("abc-123".to_string()));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let secret = b"test-secret";
        let signed = sign_token(secret, "abc-123");
        let tampered = signed.replacen("abc", "xyz", 1);
        assert_eq!(verify_signed_token(secret, &tampered), None);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let signed = sign_token(b"secret-a", "abc-123");
        assert_eq!(verify_signed_token(b"secret-b", &signed), None);
    }

    #[test]
    fn test_malformed_cookie_values() {
        assert_eq!(verify_signed_token(b"s", "no-separator"), None);
        assert_eq!(verify_signed_token(b"s", "token.nothex!"), None);
        assert_eq!(verify_signed_token(b"s", ""), None);
    }

    #[test]
    fn test_password_hash_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
    }
}
