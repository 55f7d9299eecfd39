//! Password hashing and identity tokens.
//!
//! Passwords are stored as Argon2id PHC strings. Tokens are HS256 JWTs
//! carrying the user id and email; there is no refresh flow.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::{AppError, Caller, ConfigError};

/// Default token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn new(user_id: &str, email: &str, issued_at: i64, ttl_secs: u64) -> Self {
        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        }
    }
}

/// Issues and verifies tokens, hashes and checks passwords.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: u64,
    hash_params: Params,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates the service with the default Argon2id cost parameters.
    pub fn new(secret: &SecretString, token_ttl_secs: u64) -> Result<Self, AppError> {
        Self::with_hash_params(secret, token_ttl_secs, Params::default())
    }

    /// Creates the service with explicit Argon2 cost parameters.
    pub fn with_hash_params(
        secret: &SecretString,
        token_ttl_secs: u64,
        hash_params: Params,
    ) -> Result<Self, AppError> {
        let secret = secret.expose_secret().as_bytes();
        if secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "JWT_SECRET".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(jsonwebtoken::Algorithm::HS256),
            token_ttl_secs,
            hash_params,
        })
    }

    #[must_use]
    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_secs
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.hash_params.clone())
    }

    /// Hashes a password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                AppError::Internal(format!("password hashing failed: {}", e))
            })
    }

    /// Checks a password against a stored PHC string.
    ///
    /// Cost parameters are read from the hash itself, so hashes produced under
    /// older settings keep verifying.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            error!(error = %e, "Stored password hash is malformed");
            AppError::Internal(format!("malformed password hash: {}", e))
        })?;
        match self.hasher().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => {
                error!(error = %e, "Password verification failed");
                Err(AppError::Internal(format!(
                    "password verification failed: {}",
                    e
                )))
            }
        }
    }

    /// Signs a token for the given identity, valid from now.
    pub fn issue_token(&self, user_id: &str, email: &str) -> Result<String, AppError> {
        let claims = Claims::new(user_id, email, Utc::now().timestamp(), self.token_ttl_secs);
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Token signing failed");
            AppError::Internal(format!("token signing failed: {}", e))
        })
    }

    /// Verifies signature and expiry, returning the caller identity.
    pub fn verify_token(&self, token: &str) -> Result<Caller, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            AppError::Authentication("Invalid or expired token".to_string())
        })?;
        Ok(Caller {
            id: data.claims.sub,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        let secret = SecretString::from("unit-test-secret".to_string());
        let params = Params::new(8, 1, 1, None).unwrap();
        AuthService::with_hash_params(&secret, 60, params).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let auth = service();
        let hash = auth.hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(auth.verify_password("correct-horse", &hash).unwrap());
        assert!(!auth.verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn test_hash_uses_random_salt() {
        let auth = service();
        let a = auth.hash_password("same").unwrap();
        let b = auth.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_malformed_hash_is_internal_error() {
        let auth = service();
        let result = auth.verify_password("pw", "not-a-phc-string");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_token_round_trip() {
        let auth = service();
        let token = auth.issue_token("usr_1", "ada@example.com").unwrap();
        let caller = auth.verify_token(&token).unwrap();
        assert_eq!(caller.id, "usr_1");
        assert_eq!(caller.email, "ada@example.com");
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = service();
        let issued = Utc::now().timestamp() - 7200;
        let token = auth
            .sign(&Claims::new("usr_1", "ada@example.com", issued, 60))
            .unwrap();
        let result = auth.verify_token(&token);
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AuthService::new(&SecretString::from("other-secret".to_string()), 60).unwrap();
        let token = other.issue_token("usr_1", "ada@example.com").unwrap();
        assert!(service().verify_token(&token).is_err());
        assert!(service().verify_token("garbage").is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = AuthService::new(&SecretString::from(String::new()), 60);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
