use crate::config;
use crate::types::inventory::{Administrator, Document, IdsExhausted, next_id};

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD, decode_config, encode_config};
use jwt_simple::algorithms::MACLike;
use jwt_simple::prelude::{
    Claims, Duration as JwtDuration, HS256Key, NoCustomClaims, VerificationOptions,
};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use std::collections::HashSet;

#[derive(Debug, Clone)]
pub(crate) struct AuthState {
    key: HS256Key,
    issuer: String,
    cookie_name: String,
    token_ttl: time::Duration,
    cookie_secure: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid auth key")]
    InvalidKey,
    #[error("invalid auth token")]
    InvalidToken,
    #[error("auth token missing expiry")]
    MissingExpiry,
    #[error("auth token missing subject")]
    MissingSubject,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("failed to hash password: {0}")]
    Hash(String),
}

impl AuthState {
    pub(crate) fn from_config(config: &config::AppConfig) -> Result<Self, AuthError> {
        let auth = &config.auth;
        let key_bytes = decode_key(&auth.key)?;
        let key = HS256Key::from_bytes(&key_bytes);

        Ok(Self {
            key,
            issuer: config.app_name.clone(),
            cookie_name: auth.cookie_name.clone(),
            token_ttl: auth.token_ttl,
            cookie_secure: auth.cookie_secure,
        })
    }

    pub(crate) fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub(crate) fn issue_token(&self, admin_id: u32) -> Result<String, AuthError> {
        let ttl_seconds = self.token_ttl.whole_seconds();
        if ttl_seconds <= 0 {
            return Err(AuthError::InvalidToken);
        }
        let claims = Claims::create(JwtDuration::from_secs(ttl_seconds as u64))
            .with_subject(admin_id.to_string())
            .with_issuer(&self.issuer);
        self.key
            .authenticate(claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub(crate) fn session_cookie(&self, token: &str) -> String {
        let max_age = self.token_ttl.whole_seconds().max(0);
        let mut cookie = format!(
            "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
            self.cookie_name
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub(crate) fn clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.cookie_name
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Returns the administrator id carried by a valid token.
    pub(crate) fn verify_token(&self, token: &str) -> Result<u32, AuthError> {
        let mut options = VerificationOptions::default();
        let mut issuers = HashSet::new();
        issuers.insert(self.issuer.clone());
        options.allowed_issuers = Some(issuers);

        let claims = self
            .key
            .verify_token::<NoCustomClaims>(token, Some(options))
            .map_err(|_| AuthError::InvalidToken)?;

        if claims.expires_at.is_none() {
            return Err(AuthError::MissingExpiry);
        }

        let subject = claims.subject.ok_or(AuthError::MissingSubject)?;
        subject
            .trim()
            .parse()
            .map_err(|_| AuthError::MissingSubject)
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub national_id: String,
    pub email: String,
}

/// Appends a new administrator. `password_hash` must come from
/// [`hash_password`]; hashing stays outside the store's write lock.
pub fn register_administrator(
    document: &mut Document,
    registration: Registration,
    password_hash: String,
) -> Result<Administrator, IdsExhausted> {
    let administrator = Administrator {
        id: next_id(
            "administradores",
            document.administrators.iter().map(|admin| admin.id),
        )?,
        name: registration.name,
        national_id: registration.national_id,
        email: registration.email,
        password_hash,
    };
    document.administrators.push(administrator.clone());
    Ok(administrator)
}

/// Finds the first administrator whose national id or email equals
/// `identifier` and whose stored hash accepts `password`.
pub fn authenticate(
    document: &Document,
    identifier: &str,
    password: &str,
) -> Result<Administrator, AuthError> {
    document
        .administrators
        .iter()
        .filter(|admin| admin.national_id == identifier || admin.email == identifier)
        .find(|admin| verify_password(password, &admin.password_hash))
        .cloned()
        .ok_or(AuthError::InvalidCredentials)
}

pub fn find_administrator(document: &Document, admin_id: u32) -> Option<&Administrator> {
    document
        .administrators
        .iter()
        .find(|admin| admin.id == admin_id)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    let salt = SaltString::encode_b64(&salt).map_err(|err| AuthError::Hash(err.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    let hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
}

fn decode_key(raw: &str) -> Result<Vec<u8>, AuthError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AuthError::InvalidKey);
    }

    let decoded = decode_config(trimmed, URL_SAFE_NO_PAD)
        .or_else(|_| decode_config(trimmed, STANDARD))
        .or_else(|_| decode_config(trimmed, STANDARD_NO_PAD))
        .map_err(|_| AuthError::InvalidKey)?;

    if decoded.is_empty() {
        return Err(AuthError::InvalidKey);
    }

    Ok(decoded)
}

pub fn generate_auth_key() -> Result<String, AuthError> {
    let mut rng = OsRng;
    generate_auth_key_with_rng(&mut rng)
}

pub(crate) fn generate_auth_key_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<String, AuthError> {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    let encoded = encode_config(bytes, URL_SAFE_NO_PAD);
    if encoded.is_empty() {
        return Err(AuthError::InvalidKey);
    }
    Ok(encoded)
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for value in dest.iter_mut() {
                *value = 0;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for ZeroRng {}

    #[test]
    fn generate_auth_key_with_rng__should_match_fixture() {
        // Given
        let mut rng = ZeroRng;

        // When
        let key = generate_auth_key_with_rng(&mut rng).expect("auth key");

        // Then
        assert_eq!(key, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    }

    #[test]
    fn register_administrator__should_store_hash_not_password() {
        // Given
        let mut document = Document::default();
        let password_hash = hash_password("secret").expect("hash password");

        // When
        let admin = register_administrator(&mut document, registration("ana"), password_hash)
            .expect("register");

        // Then
        assert_eq!(admin.id, 1);
        assert_ne!(admin.password_hash, "secret");
        assert!(admin.password_hash.starts_with("$argon2"));
        assert_eq!(document.administrators, vec![admin]);
    }

    #[test]
    fn authenticate__should_accept_national_id_or_email() {
        // Given
        let mut document = Document::default();
        register(&mut document, "ana", "secret");

        // When
        let by_id = authenticate(&document, "ana-dni", "secret").expect("by national id");
        let by_email = authenticate(&document, "ana@example.com", "secret").expect("by email");

        // Then
        assert_eq!(by_id.id, 1);
        assert_eq!(by_email.id, 1);
    }

    #[test]
    fn authenticate__should_reject_wrong_password() {
        // Given
        let mut document = Document::default();
        register(&mut document, "ana", "secret");

        // When
        let result = authenticate(&document, "ana-dni", "wrong");

        // Then
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn authenticate__should_reject_unknown_identifier_on_empty_collection() {
        // Given
        let document = Document::default();

        // When
        let result = authenticate(&document, "nonexistent", "x");

        // Then
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn authenticate__should_reject_malformed_stored_hash() {
        // Given
        let mut document = Document::default();
        document.administrators.push(Administrator {
            id: 1,
            name: "Legacy".to_string(),
            national_id: "1".to_string(),
            email: "legacy@example.com".to_string(),
            password_hash: "plaintext".to_string(),
        });

        // When
        let result = authenticate(&document, "1", "plaintext");

        // Then
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn verify_token__should_return_issued_admin_id() {
        // Given
        let auth = AuthState::from_config(&config::AppConfig::default()).expect("auth state");
        let token = auth.issue_token(7).expect("issue token");

        // When
        let admin_id = auth.verify_token(&token).expect("verify token");

        // Then
        assert_eq!(admin_id, 7);
    }

    #[test]
    fn verify_token__should_reject_token_from_other_key() {
        // Given
        let auth = AuthState::from_config(&config::AppConfig::default()).expect("auth state");
        let mut other_config = config::AppConfig::default();
        other_config.auth.key = encode_config(b"another-secret", URL_SAFE_NO_PAD);
        let other = AuthState::from_config(&other_config).expect("other auth state");
        let token = other.issue_token(7).expect("issue token");

        // When
        let result = auth.verify_token(&token);

        // Then
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn from_config__should_reject_empty_key() {
        // Given
        let mut app_config = config::AppConfig::default();
        app_config.auth.key = "  ".to_string();

        // When
        let result = AuthState::from_config(&app_config);

        // Then
        assert!(matches!(result, Err(AuthError::InvalidKey)));
    }

    fn register(document: &mut Document, name: &str, password: &str) {
        let password_hash = hash_password(password).expect("hash password");
        register_administrator(document, registration(name), password_hash).expect("register");
    }

    fn registration(name: &str) -> Registration {
        Registration {
            name: name.to_string(),
            national_id: format!("{name}-dni"),
            email: format!("{name}@example.com"),
        }
    }
}
