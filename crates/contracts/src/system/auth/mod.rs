use serde::{Deserialize, Serialize};

/// Claims of the bearer token issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize, // expiration timestamp
    #[serde(default)]
    pub iat: usize, // issued at
}
