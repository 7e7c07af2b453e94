use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;
use ulid::Ulid;

use crate::config::JwtConfig;

pub struct AuthJwtPayload {
    pub user_id: Ulid,
    pub token_id: Ulid,
    pub expiration: Option<DateTime<Utc>>,
    pub issued_at: DateTime<Utc>,
    pub not_before: Option<DateTime<Utc>>,
    pub audience: Option<String>,
}

impl AuthJwtPayload {
    /// A fresh token for a user, expiring at the given time.
    pub fn new(user_id: Ulid, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token_id: Ulid::new(),
            expiration: Some(expires_at),
            issued_at: Utc::now(),
            not_before: None,
            audience: None,
        }
    }
}

pub trait JwtState: Sized {
    fn to_claims(&self) -> Claims;

    fn from_claims(claims: &Claims) -> Option<Self>;

    fn serialize(&self, config: &JwtConfig) -> Option<String> {
        let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
        let mut claims = self.to_claims();

        claims.registered.issuer = Some(config.issuer.clone());

        if claims.registered.issued_at.is_none() {
            claims.registered.issued_at = Some(chrono::Utc::now().timestamp() as u64);
        }

        claims.sign_with_key(&key).ok()
    }

    fn verify(config: &JwtConfig, token: &str) -> Option<Self> {
        let key = Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()?;
        let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

        let claims = token.claims();

        if claims.registered.issuer.as_ref() != Some(&config.issuer) {
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

        Self::from_claims(claims)
    }
}

impl JwtState for AuthJwtPayload {
    fn to_claims(&self) -> Claims {
        Claims {
            registered: RegisteredClaims {
                issuer: None,
                subject: Some(self.user_id.to_string()),
                audience: self.audience.clone(),
                expiration: self.expiration.map(|x| x.timestamp() as u64),
                not_before: self.not_before.map(|x| x.timestamp() as u64),
                issued_at: Some(self.issued_at.timestamp() as u64),
                json_web_token_id: Some(self.token_id.to_string()),
            },
            private: Default::default(),
        }
    }

    fn from_claims(claims: &Claims) -> Option<Self> {
        Some(Self {
            audience: claims.registered.audience.clone(),
            expiration: claims
                .registered
                .expiration
                .and_then(|x| Utc.timestamp_opt(x as i64, 0).single()),
            issued_at: Utc
                .timestamp_opt(claims.registered.issued_at? as i64, 0)
                .single()?,
            not_before: claims
                .registered
                .not_before
                .and_then(|x| Utc.timestamp_opt(x as i64, 0).single()),
            token_id: claims
                .registered
                .json_web_token_id
                .as_ref()
                .and_then(|x| Ulid::from_string(x).ok())?,
            user_id: claims
                .registered
                .subject
                .as_ref()
                .and_then(|x| Ulid::from_string(x).ok())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            issuer: "wander".to_string(),
            secret: "test-secret".to_string(),
        }
    }

    #[test]
    fn round_trip() {
        let config = config();
        let user_id = Ulid::new();
        let payload = AuthJwtPayload::new(user_id, Utc::now() + Duration::days(7));

        let token = payload.serialize(&config).unwrap();
        let verified = AuthJwtPayload::verify(&config, &token).unwrap();

        assert_eq!(verified.user_id, user_id);
        assert_eq!(verified.token_id, payload.token_id);
        assert_eq!(
            verified.expiration.map(|x| x.timestamp()),
            payload.expiration.map(|x| x.timestamp())
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = AuthJwtPayload::new(Ulid::new(), Utc::now() + Duration::days(7))
            .serialize(&config())
            .unwrap();

        let other = JwtConfig {
            issuer: "wander".to_string(),
            secret: "other-secret".to_string(),
        };

        assert!(AuthJwtPayload::verify(&other, &token).is_none());
    }

    #[test]
    fn rejects_wrong_issuer() {
        let token = AuthJwtPayload::new(Ulid::new(), Utc::now() + Duration::days(7))
            .serialize(&config())
            .unwrap();

        let other = JwtConfig {
            issuer: "not-wander".to_string(),
            secret: "test-secret".to_string(),
        };

        assert!(AuthJwtPayload::verify(&other, &token).is_none());
    }

    #[test]
    fn rejects_expired_token() {
        let config = config();
        let token = AuthJwtPayload::new(Ulid::new(), Utc::now() - Duration::hours(1))
            .serialize(&config)
            .unwrap();

        assert!(AuthJwtPayload::verify(&config, &token).is_none());
    }

    #[test]
    fn rejects_token_issued_in_the_future() {
        let config = config();
        let mut payload = AuthJwtPayload::new(Ulid::new(), Utc::now() + Duration::days(7));
        payload.issued_at = Utc::now() + Duration::hours(1);

        let token = payload.serialize(&config).unwrap();

        assert!(AuthJwtPayload::verify(&config, &token).is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(AuthJwtPayload::verify(&config(), "not-a-token").is_none());
    }
}
