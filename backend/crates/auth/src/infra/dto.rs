//! Wire DTOs for the token endpoint

use serde::{Deserialize, Serialize};

/// Form body of `POST {base}/token`
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// JSON answer of `POST {base}/token`
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
