//! JWT Token Codec
//! Mission: Issue and verify signed, time-limited session tokens

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{crypto, encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Why a presented token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

/// Freshly signed token with its absolute expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS256 codec bound to the process secret
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from the shared secret and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for a user that expires one TTL from now
    pub fn issue(&self, user_id: i64, role: &str) -> Result<IssuedToken> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?;
        let token = self.issue_with_expiry(user_id, role, expires_at)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Sign a token with an explicit expiry
    pub fn issue_with_expiry(
        &self,
        user_id: i64,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String> {
        let claims = Claims {
            user_id,
            role: role.to_string(),
            exp: expires_at.timestamp(),
        };

        debug!(user_id, role, exp = claims.exp, "Signing session token");

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Verify a token against the current time
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        self.parse_at(token, Utc::now())
    }

    /// Verify a token's structure, then its signature, then its expiry against `now`.
    ///
    /// Everything after the second dot is the signature, so a damaged signature
    /// segment is always reported as `InvalidSignature`.
    pub fn parse_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut segments = token.splitn(3, '.');
        let (Some(header), Some(payload), Some(signature)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header: Header = decode_segment(header)?;
        if header.alg != Algorithm::HS256 {
            return Err(TokenError::Malformed);
        }
        let claims: Claims = decode_segment(payload)?;

        let message = &token[..token.len() - signature.len() - 1];
        let valid = crypto::verify(
            signature,
            message.as_bytes(),
            &self.decoding_key,
            Algorithm::HS256,
        );
        if !matches!(valid, Ok(true)) {
            return Err(TokenError::InvalidSignature);
        }

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-12345";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::hours(24))
    }

    #[test]
    fn test_issue_and_parse() {
        let codec = codec();
        let issued = codec.issue(42, "receptionist").unwrap();
        assert_eq!(issued.token.split('.').count(), 3);

        let claims = codec.parse(&issued.token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.role, "receptionist");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_default_lifetime_is_applied() {
        let codec = codec();
        let before = Utc::now();
        let issued = codec.issue(1, "admin").unwrap();

        let lifetime = issued.expires_at - before;
        assert!(lifetime >= Duration::hours(24));
        assert!(lifetime < Duration::hours(24) + Duration::seconds(5));
    }

    #[test]
    fn test_expiry_checked_at_parse_time() {
        let codec = codec();
        let now = Utc::now();
        let token = codec
            .issue_with_expiry(9, "doctor", now + Duration::hours(1))
            .unwrap();

        let claims = codec.parse_at(&token, now + Duration::minutes(30)).unwrap();
        assert_eq!(claims.user_id, 9);
        assert_eq!(claims.role, "doctor");

        assert_eq!(
            codec.parse_at(&token, now + Duration::hours(2)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_expired_at_exact_expiry() {
        let codec = codec();
        let exp = Utc::now() + Duration::minutes(5);
        let token = codec.issue_with_expiry(1, "admin", exp).unwrap();

        assert_eq!(codec.parse_at(&token, exp), Err(TokenError::Expired));
    }

    #[test]
    fn test_any_flipped_signature_bit_is_rejected() {
        let codec = codec();
        let token = codec.issue(5, "receptionist").unwrap().token;
        let (message, signature) = token.rsplit_once('.').unwrap();
        let raw = URL_SAFE_NO_PAD.decode(signature).unwrap();

        for byte in 0..raw.len() {
            for bit in 0..8 {
                let mut tampered = raw.clone();
                tampered[byte] ^= 1 << bit;
                let forged = format!("{}.{}", message, URL_SAFE_NO_PAD.encode(&tampered));

                assert_eq!(
                    codec.parse(&forged),
                    Err(TokenError::InvalidSignature),
                    "byte {} bit {}",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_any_flipped_character_bit_in_signature_is_rejected() {
        let codec = codec();
        let token = codec.issue(5, "receptionist").unwrap().token;
        let (message, signature) = token.rsplit_once('.').unwrap();

        for (index, original) in signature.bytes().enumerate() {
            for bit in 0..7 {
                let mut tampered = signature.as_bytes().to_vec();
                tampered[index] = original ^ (1 << bit);
                let tampered = String::from_utf8(tampered).unwrap();
                let forged = format!("{}.{}", message, tampered);

                assert_eq!(
                    codec.parse(&forged),
                    Err(TokenError::InvalidSignature),
                    "char {} bit {} -> {:?}",
                    index,
                    bit,
                    tampered
                );
            }
        }
    }

    #[test]
    fn test_dot_inside_signature_is_a_bad_signature() {
        let codec = codec();
        let token = codec.issue(5, "doctor").unwrap().token;
        let forged = format!("{}.extra", token);

        assert_eq!(codec.parse(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_unsupported_algorithm_is_malformed() {
        let codec = codec();
        let token = codec.issue(5, "doctor").unwrap().token;
        let (_, rest) = token.split_once('.').unwrap();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS512","typ":"JWT"}"#);

        assert_eq!(
            codec.parse(&format!("{}.{}", header, rest)),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_edited_claims_are_rejected() {
        let codec = codec();
        let token = codec.issue(5, "doctor").unwrap().token;
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = Claims {
            user_id: 5,
            role: "receptionist".to_string(),
            exp: Utc::now().timestamp() + 3600,
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], payload, parts[2]);

        assert_eq!(codec.parse(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_different_secrets_reject() {
        let issuer = TokenCodec::new("secret1", Duration::hours(1));
        let verifier = TokenCodec::new("secret2", Duration::hours(1));
        let token = issuer.issue(1, "admin").unwrap().token;

        assert_eq!(verifier.parse(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec();
        assert_eq!(codec.parse(""), Err(TokenError::Malformed));
        assert_eq!(codec.parse("no-dots-at-all"), Err(TokenError::Malformed));
        assert_eq!(codec.parse("only.two"), Err(TokenError::Malformed));
        assert_eq!(codec.parse("a.b.c.d"), Err(TokenError::Malformed));
        assert_eq!(codec.parse(".."), Err(TokenError::Malformed));
        assert_eq!(codec.parse("!!!.???.***"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_claims_without_expiry_are_malformed() {
        let codec = codec();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"user_id":1,"role":"admin"}"#);
        let message = format!("{}.{}", header, payload);
        let signature = jsonwebtoken::crypto::sign(
            message.as_bytes(),
            &EncodingKey::from_secret(SECRET.as_bytes()),
            Algorithm::HS256,
        )
        .unwrap();
        let token = format!("{}.{}", message, signature);

        assert_eq!(codec.parse(&token), Err(TokenError::Malformed));
    }
}
