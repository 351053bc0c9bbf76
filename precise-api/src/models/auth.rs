use serde::{Deserialize, Serialize};

/// Claims of a Selene access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}
