//! HTTP Credential Exchange
//!
//! `POST {base}/token` with a form-encoded username and password.

use platform::client::{build_client, read_json};
use platform::{ApiEndpoints, HttpError};

use crate::application::config::AuthConfig;
use crate::domain::gateway::CredentialExchange;
use crate::domain::value_object::{bearer_token::BearerToken, credentials::Credentials};
use crate::error::{AuthError, AuthResult};
use crate::infra::dto::{TokenRequest, TokenResponse};

/// reqwest-backed [`CredentialExchange`]
#[derive(Debug, Clone)]
pub struct HttpCredentialExchange {
    client: reqwest::Client,
    endpoints: ApiEndpoints,
}

impl HttpCredentialExchange {
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let client = build_client(&config.http)?;
        Ok(Self::with_client(client, config.endpoints.clone()))
    }

    /// Share an existing client (connection pool) with other gateways
    pub fn with_client(client: reqwest::Client, endpoints: ApiEndpoints) -> Self {
        Self { client, endpoints }
    }
}

impl CredentialExchange for HttpCredentialExchange {
    async fn exchange(&self, credentials: &Credentials) -> AuthResult<BearerToken> {
        let url = self.endpoints.token_url()?;
        tracing::debug!(%url, username = %credentials.username, "Exchanging credentials");

        let response = self
            .client
            .post(url)
            .form(&TokenRequest {
                username: credentials.username.as_str(),
                password: credentials.password.expose(),
            })
            .send()
            .await
            .map_err(HttpError::from)?;

        let body: TokenResponse = read_json(response).await?;

        BearerToken::new(body.access_token)
            .map_err(|e| AuthError::AuthenticationFailed(format!("unusable token: {}", e)))
    }
}
