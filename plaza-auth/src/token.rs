//! Access token issuance and validation.
//!
//! Access tokens are signed HS256 claims (subject, email, display name,
//! tenant, role) with a fixed issuer/audience/expiry; refresh tokens are
//! opaque 256-bit random values with no embedded claims. The signing secret
//! comes from configuration only — construction fails without one.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use plaza_core::{Error, JwtConfig, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::User;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Tenant (organization) id.
    pub org: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// A freshly minted token pair.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenIssuer {
    config: JwtConfig,
}

impl TokenIssuer {
    /// Fails when no signing secret is configured; there is no fallback.
    pub fn new(config: JwtConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Mint a signed access token plus an opaque refresh token.
    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.config.access_token_ttl)
            .map_err(|e| Error::Token(format!("Invalid token lifetime: {}", e)))?;
        let expires_at = now + ttl;

        let claims = AccessClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            org: user.organization_id.clone(),
            role: user.role.clone(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| Error::Token(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            refresh_token: new_refresh_token(),
            expires_at,
        })
    }

    /// Validate signature, issuer, audience and expiry.
    pub fn decode(&self, token: &str) -> Result<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_audience(&[self.config.audience.as_str()]);

        decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| Error::Token(e.to_string()))
    }
}

/// 256 bits of entropy, base64-encoded; carries no claims.
pub fn new_refresh_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// Strip the `Bearer ` scheme from an Authorization header value. Returns
/// `None` when the value does not carry the scheme.
pub fn strip_bearer(header: &str) -> Option<&str> {
    let header = header.trim();
    let prefix = "Bearer ";
    if header.len() <= prefix.len() || !header.starts_with(prefix) {
        return None;
    }
    Some(header[prefix.len()..].trim())
}
