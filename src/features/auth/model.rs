use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller identity established by the auth middleware and threaded into each
/// handler as an extractor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Numeric user id parsed from the token subject
    pub user_id: i64,
    pub sub: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(default)]
    pub roles: Vec<String>,
}
