//! Remember-token sessions.
//!
//! A remember token has the shape `{user_id}.{nonce}.{signature}` where the
//! signature is a base64url HMAC-SHA256 over `{user_id}.{nonce}`. Tokens do
//! not expire on their own; removing the user from the directory or rotating
//! the signing key revokes them.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::config::GuardConfig;
use crate::resolver::{User, UserId};
use crate::Secret;

type HmacSha256 = Hmac<Sha256>;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 16;

/// Issues and verifies remember tokens.
///
/// # Examples
///
/// ```
/// use asset_guard::SessionSigner;
///
/// let signer = SessionSigner::generate();
/// let token = signer.issue(42);
///
/// assert_eq!(signer.verify(token.expose_secret()), Some(42));
/// assert_eq!(format!("{}", token), "[REDACTED]");
/// ```
#[derive(Debug)]
pub struct SessionSigner {
    key: Secret<Vec<u8>>,
}

impl SessionSigner {
    /// Creates a signer with a fresh random 32-byte key.
    pub fn generate() -> Self {
        let mut key = vec![0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        Self {
            key: Secret::new(key),
        }
    }

    /// Creates a signer from an existing key.
    pub fn from_key(key: Secret<Vec<u8>>) -> Self {
        Self { key }
    }

    /// Issues a new remember token for `user_id`.
    pub fn issue(&self, user_id: UserId) -> Secret<String> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let payload = format!("{}.{}", user_id, URL_SAFE_NO_PAD.encode(nonce));
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&payload).finalize().into_bytes());
        Secret::new(format!("{}.{}", payload, signature))
    }

    /// Returns the user id a token was issued for, if the signature holds.
    pub fn verify(&self, token: &str) -> Option<UserId> {
        let (payload, signature) = token.rsplit_once('.')?;
        let (user_id, nonce) = payload.split_once('.')?;
        if nonce.is_empty() || nonce.contains('.') {
            return None;
        }
        let user_id: UserId = user_id.parse().ok()?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        self.mac(payload).verify_slice(&signature).ok()?;
        Some(user_id)
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.key.expose_secret())
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        mac
    }
}

/// Lifetime of a cookie set by the session helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieExpiry {
    /// Twenty years, the conventional "permanent" cookie.
    Permanent,
    /// Expire immediately, deleting the cookie.
    Remove,
}

/// A `Set-Cookie` instruction for the response.
#[derive(Debug)]
pub struct SetCookie {
    /// Cookie name
    pub name: String,
    /// Cookie value, absent when removing
    pub value: Option<Secret<String>>,
    /// Cookie lifetime
    pub expiry: CookieExpiry,
}

/// Signs `user` in by issuing a permanent remember-token cookie.
pub fn sign_in(signer: &SessionSigner, user: &User, config: &GuardConfig) -> SetCookie {
    tracing::info!(user_id = user.id, "signing in");
    SetCookie {
        name: config.cookie_name.clone(),
        value: Some(signer.issue(user.id)),
        expiry: CookieExpiry::Permanent,
    }
}

/// Signs the current browser out by deleting the remember-token cookie.
pub fn sign_out(config: &GuardConfig) -> SetCookie {
    SetCookie {
        name: config.cookie_name.clone(),
        value: None,
        expiry: CookieExpiry::Remove,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dude() -> User {
        User {
            id: 9,
            first_name: "dude".to_string(),
            last_name: "mctalis".to_string(),
            email: "dude@example.com".to_string(),
        }
    }

    #[test]
    fn issued_tokens_verify() {
        let signer = SessionSigner::generate();
        let token = signer.issue(9);
        assert_eq!(signer.verify(token.expose_secret()), Some(9));
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let signer = SessionSigner::generate();
        let a = signer.issue(1);
        let b = signer.issue(1);
        assert_ne!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn tampered_user_id_fails() {
        let signer = SessionSigner::generate();
        let token = signer.issue(1);
        let forged = format!("2{}", &token.expose_secret()[1..]);
        assert_eq!(signer.verify(&forged), None);
    }

    #[test]
    fn malformed_tokens_fail() {
        let signer = SessionSigner::generate();
        assert_eq!(signer.verify(""), None);
        assert_eq!(signer.verify("1"), None);
        assert_eq!(signer.verify("1.abc"), None);
        assert_eq!(signer.verify("x.abc.def"), None);
        assert_eq!(signer.verify("1..def"), None);
        assert_eq!(signer.verify("1.abc.!!!"), None);
    }

    #[test]
    fn same_key_verifies_across_signers() {
        let key = vec![7u8; 32];
        let a = SessionSigner::from_key(Secret::new(key.clone()));
        let b = SessionSigner::from_key(Secret::new(key));
        let token = a.issue(3);
        assert_eq!(b.verify(token.expose_secret()), Some(3));
    }

    #[test]
    fn signer_debug_redacts_key() {
        let signer = SessionSigner::from_key(Secret::new(vec![1, 2, 3]));
        assert!(format!("{:?}", signer).contains("[REDACTED]"));
    }

    #[test]
    fn sign_in_sets_permanent_cookie() {
        let signer = SessionSigner::generate();
        let cookie = sign_in(&signer, &dude(), &GuardConfig::default());
        assert_eq!(cookie.name, "remember_token");
        assert_eq!(cookie.expiry, CookieExpiry::Permanent);
        let value = cookie.value.expect("token issued");
        assert_eq!(signer.verify(value.expose_secret()), Some(9));
    }

    #[test]
    fn sign_out_removes_cookie() {
        let cookie = sign_out(&GuardConfig::default().with_cookie_name("sid"));
        assert_eq!(cookie.name, "sid");
        assert!(cookie.value.is_none());
        assert_eq!(cookie.expiry, CookieExpiry::Remove);
    }
}
