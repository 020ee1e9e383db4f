//! Mints and validates short-lived, pet-scoped read tokens.

use cac_types::TokenError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Required `sub` claim for every delegated access token.
pub const SUBJECT: &str = "pet-records";

fn max_token_duration() -> Duration {
    Duration::days(7)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "petId")]
    pet_id: i64,
    iat: i64,
    exp: i64,
}

/// Mints and validates HS256-signed delegated access tokens against a
/// server-held symmetric secret.
pub struct DelegatedAccessTokens {
    secret: Vec<u8>,
}

impl DelegatedAccessTokens {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Mints a token granting read access to `pet_id`'s signed records
    /// for `duration`, clamped to 7 days and silently clamping with a
    /// warning rather than rejecting the request.
    pub fn mint(&self, pet_id: i64, duration: Duration) -> String {
        let capped = if duration > max_token_duration() {
            log::warn!(
                "requested delegated token duration for pet {pet_id} exceeds the 7-day cap; clamping"
            );
            max_token_duration()
        } else {
            duration
        };

        let now = Utc::now();
        let claims = Claims {
            sub: SUBJECT.to_string(),
            pet_id,
            iat: now.timestamp(),
            exp: (now + capped).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .expect("HS256 encoding of well-formed claims cannot fail")
    }

    /// Validates `token`'s signature and expiry and extracts the
    /// claimed `petId`. Every failure — bad signature, expiry,
    /// malformed structure, wrong subject — collapses to
    /// `InvalidTemporaryToken`; the secret is never echoed back (spec
    /// §4.8).
    pub fn validate(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat"]);

        let data = decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map_err(|_| TokenError::InvalidTemporaryToken)?;

        if data.claims.sub != SUBJECT {
            return Err(TokenError::InvalidTemporaryToken);
        }

        Ok(data.claims.pet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_then_validate_recovers_pet_id() {
        let tokens = DelegatedAccessTokens::new(b"server-secret".to_vec());
        let token = tokens.mint(42, Duration::hours(1));

        assert_eq!(tokens.validate(&token).expect("validate"), 42);
    }

    #[test]
    fn validate_rejects_wrong_secret() {
        let tokens = DelegatedAccessTokens::new(b"server-secret".to_vec());
        let other = DelegatedAccessTokens::new(b"a-different-secret".to_vec());
        let token = tokens.mint(42, Duration::hours(1));

        assert!(matches!(
            other.validate(&token),
            Err(TokenError::InvalidTemporaryToken)
        ));
    }

    #[test]
    fn validate_rejects_expired_token() {
        let tokens = DelegatedAccessTokens::new(b"server-secret".to_vec());
        let now = Utc::now();
        let expired_claims = Claims {
            sub: SUBJECT.to_string(),
            pet_id: 42,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &expired_claims,
            &EncodingKey::from_secret(&tokens.secret),
        )
        .expect("encode expired token");

        assert!(matches!(
            tokens.validate(&token),
            Err(TokenError::InvalidTemporaryToken)
        ));
    }

    #[test]
    fn validate_rejects_wrong_subject() {
        let tokens = DelegatedAccessTokens::new(b"server-secret".to_vec());
        let now = Utc::now();
        let wrong_subject = Claims {
            sub: "not-pet-records".to_string(),
            pet_id: 42,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &wrong_subject,
            &EncodingKey::from_secret(&tokens.secret),
        )
        .expect("encode token with wrong subject");

        assert!(matches!(
            tokens.validate(&token),
            Err(TokenError::InvalidTemporaryToken)
        ));
    }

    #[test]
    fn mint_clamps_durations_beyond_seven_days() {
        let tokens = DelegatedAccessTokens::new(b"server-secret".to_vec());
        let token = tokens.mint(7, Duration::days(30));

        // The token must still be valid right now; if the cap were
        // not applied the exp claim would be ~30 days out, which
        // would also pass, so we additionally assert the clamp by
        // decoding without expiry checks and comparing iat/exp.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(&tokens.secret),
            &validation,
        )
        .expect("decode");

        let lifetime_seconds = data.claims.exp - data.claims.iat;
        assert_eq!(lifetime_seconds, Duration::days(7).num_seconds());
    }
}
