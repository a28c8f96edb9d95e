use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, error::AppError, state::AppState};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing and verification keys, built once from [`JwtConfig`] at startup.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::seconds(config.ttl_minutes.saturating_mul(60)),
        }
    }

    /// Signs a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(ttl)
            .context("token expiry out of range")?;
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)?;
        debug!(subject = %subject, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Signs a token with the configured ttl.
    pub fn issue_default(&self, subject: &str) -> anyhow::Result<String> {
        self.issue(subject, self.ttl)
    }

    /// Returns the token's subject. Every failure collapses into
    /// [`AppError::Unauthorized`].
    pub fn verify(&self, token: &str) -> Result<String, AppError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            AppError::Unauthorized
        })?;

        // jsonwebtoken accepts exp == now; a token is dead once its second arrives.
        if data.claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
            debug!(exp = data.claims.exp, "jwt expired");
            return Err(AppError::Unauthorized);
        }

        debug!(subject = %data.claims.sub, "jwt verified");
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
        })
    }

    #[test]
    fn issue_and_verify_returns_subject() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let token = keys.issue_default("alice").expect("sign");
        assert_eq!(keys.verify(&token).expect("verify"), "alice");
    }

    #[test]
    fn empty_subject_round_trips() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.issue_default("").expect("sign");
        assert_eq!(keys.verify(&token).expect("verify"), "");
    }

    #[test]
    fn out_of_range_ttl_is_an_error() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert!(keys.issue("alice", Duration::MAX).is_err());

        let huge = JwtKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 1_000_000_000_000,
        });
        assert!(huge.issue_default("alice").is_err());
    }

    #[test]
    fn zero_ttl_is_already_expired() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.issue("alice", Duration::ZERO).expect("sign");
        assert!(matches!(keys.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn past_expiry_is_rejected() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.issue("alice", Duration::minutes(-5)).expect("sign");
        assert!(matches!(keys.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn verify_rejects_other_secret() {
        let signer = make_keys("secret-a", "iss", "aud");
        let verifier = make_keys("secret-b", "iss", "aud");
        let token = signer.issue_default("alice").expect("sign");
        assert!(matches!(verifier.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys("same-secret", "good-iss", "good-aud");
        let bad_keys = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good_keys.issue_default("alice").expect("sign");
        assert!(matches!(bad_keys.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert!(matches!(keys.verify("not.a.jwt"), Err(AppError::Unauthorized)));
        assert!(matches!(keys.verify(""), Err(AppError::Unauthorized)));
    }

    #[test]
    fn verify_rejects_token_without_subject() {
        #[derive(Serialize)]
        struct NoSubject {
            exp: i64,
            iss: String,
            aud: String,
        }

        let keys = make_keys("dev-secret", "iss", "aud");
        let claims = NoSubject {
            exp: (OffsetDateTime::now_utc() + Duration::minutes(5)).unix_timestamp(),
            iss: "iss".into(),
            aud: "aud".into(),
        };
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .expect("sign");
        assert!(matches!(keys.verify(&token), Err(AppError::Unauthorized)));
    }
}
