use super::model::{AuthenticatedUser, CustomClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // Standard JWT claims (validated by jsonwebtoken library)
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,

    #[serde(default)]
    roles: Option<Vec<String>>,
    #[serde(rename = "https://hazard-reports/claims", default)]
    custom_claims: Option<CustomClaims>,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        user_from_claims(token_data.claims)
    }
}

/// Report ownership and validator stamps are numeric, so the subject must be too.
fn user_from_claims(claims: Claims) -> Result<AuthenticatedUser, AppError> {
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Auth("Token subject is not a valid user id".to_string()))?;

    let roles = claims
        .roles
        .or_else(|| claims.custom_claims.map(|c| c.roles))
        .unwrap_or_default();

    Ok(AuthenticatedUser {
        user_id,
        sub: claims.sub,
        roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        serde_json::from_value(serde_json::json!({
            "sub": sub,
            "iss": "https://auth.example.com",
            "aud": ["hazard-api"],
            "exp": 4_102_444_800u64,
            "https://hazard-reports/claims": { "roles": ["reviewer"] }
        }))
        .unwrap()
    }

    #[test]
    fn test_numeric_subject_becomes_user_id() {
        let user = user_from_claims(claims("42")).unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.sub, "42");
        assert_eq!(user.roles, vec!["reviewer".to_string()]);
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let err = user_from_claims(claims("abc-123")).unwrap_err();
        assert_eq!(err.code(), "unauthenticated");
    }
}
