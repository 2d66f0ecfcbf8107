use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

use crate::config::JwtConfig;

pub struct JwtState {
    pub user_id: i32,
    pub expiration: Option<DateTime<Utc>>,
    pub issued_at: DateTime<Utc>,
    pub not_before: Option<DateTime<Utc>>,
    pub audience: Option<String>,
}

impl JwtState {
    /// A fresh token for the user, valid for the configured session duration.
    /// `None` when the expiration does not fit in a timestamp.
    pub fn new(config: &JwtConfig, user_id: i32) -> Option<Self> {
        let now = Utc::now();

        // Duration::seconds panics past i64::MAX milliseconds
        let seconds = i64::try_from(config.session_duration)
            .ok()
            .filter(|seconds| *seconds <= i64::MAX / 1000)?;
        let expiration = now.checked_add_signed(Duration::seconds(seconds))?;

        Some(Self {
            user_id,
            expiration: Some(expiration),
            issued_at: now,
            not_before: None,
            audience: None,
        })
    }

    pub fn serialize(&self, config: &JwtConfig) -> Option<String> {
        let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
        let claims = Claims::new(RegisteredClaims {
            issued_at: Some(self.issued_at.timestamp() as u64),
            expiration: self.expiration.map(|x| x.timestamp() as u64),
            issuer: Some(config.issuer.to_string()),
            json_web_token_id: None,
            subject: Some(self.user_id.to_string()),
            not_before: self.not_before.map(|x| x.timestamp() as u64),
            audience: self.audience.clone(),
        });

        claims.sign_with_key(&key).ok()
    }

    pub fn verify(config: &JwtConfig, token: &str) -> Option<Self> {
        let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
        let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

        let claims = token.claims();

        if claims.registered.issuer.clone()? != config.issuer {
            return None;
        }

        let iat = Utc
            .timestamp_opt(claims.registered.issued_at? as i64, 0)
            .single()?;
        if iat > Utc::now() {
            return None;
        }

        let nbf = claims
            .registered
            .not_before
            .and_then(|x| Utc.timestamp_opt(x as i64, 0).single());
        if let Some(nbf) = nbf {
            if nbf > Utc::now() {
                return None;
            }
        }

        let exp = claims
            .registered
            .expiration
            .and_then(|x| Utc.timestamp_opt(x as i64, 0).single());
        if let Some(exp) = exp {
            if exp < Utc::now() {
                return None;
            }
        }

        let user_id = claims.registered.subject.clone()?.parse::<i32>().ok()?;
        let audience = claims.registered.audience.clone();

        Some(JwtState {
            user_id,
            expiration: exp,
            issued_at: iat,
            not_before: nbf,
            audience,
        })
    }
}
