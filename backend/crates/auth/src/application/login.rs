//! Login Use Case
//!
//! Exchanges operator credentials for a bearer token and stores it in the
//! session. A failed exchange is reported once and never retried.

use std::sync::Arc;

use platform::HttpError;

use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::gateway::CredentialExchange;
use crate::domain::value_object::credentials::Credentials;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Login output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOutput {
    /// Session generation after the token was stored
    pub generation: u64,
}

/// Login use case
pub struct LoginUseCase<E>
where
    E: CredentialExchange,
{
    exchange: Arc<E>,
    config: Arc<AuthConfig>,
}

impl<E> LoginUseCase<E>
where
    E: CredentialExchange,
{
    pub fn new(exchange: Arc<E>, config: Arc<AuthConfig>) -> Self {
        Self { exchange, config }
    }

    pub async fn execute(&self, session: &AuthSession, input: LoginInput) -> AuthResult<LoginOutput> {
        let credentials = Credentials::new(&input.username, input.password).inspect_err(|e| e.log())?;

        let exchanged =
            tokio::time::timeout(self.config.login_timeout, self.exchange.exchange(&credentials))
                .await;

        let token = match exchanged {
            Ok(Ok(token)) => token,
            Ok(Err(e)) => {
                e.log();
                return Err(e);
            }
            Err(_) => {
                let e = AuthError::Transport(HttpError::Timeout);
                e.log();
                return Err(e);
            }
        };

        let generation = session.establish(token);

        tracing::info!(
            username = %credentials.username,
            generation,
            "Operator logged in"
        );

        Ok(LoginOutput { generation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::domain::value_object::bearer_token::BearerToken;

    enum Script {
        Token(&'static str),
        Reject,
        Hang,
    }

    struct FakeExchange {
        script: Script,
        calls: AtomicUsize,
    }

    impl FakeExchange {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl CredentialExchange for FakeExchange {
        async fn exchange(&self, credentials: &Credentials) -> AuthResult<BearerToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(credentials.username.as_str(), "surveyor");
            match self.script {
                Script::Token(t) => BearerToken::new(t),
                Script::Reject => Err(AuthError::AuthenticationFailed(
                    "backend responded with 401 Unauthorized".into(),
                )),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!()
                }
            }
        }
    }

    fn input(password: &str) -> LoginInput {
        LoginInput {
            username: "surveyor".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let exchange = FakeExchange::new(Script::Token("tok-1"));
        let usecase = LoginUseCase::new(exchange.clone(), Arc::new(AuthConfig::default()));
        let session = AuthSession::new();

        let out = usecase.execute(&session, input("pw")).await.unwrap();

        assert_eq!(out.generation, 1);
        assert_eq!(session.current_token().unwrap().expose(), "tok-1");
        assert_eq!(exchange.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_session_empty_and_is_not_retried() {
        let exchange = FakeExchange::new(Script::Reject);
        let usecase = LoginUseCase::new(exchange.clone(), Arc::new(AuthConfig::default()));
        let session = AuthSession::new();

        let err = usecase.execute(&session, input("wrong")).await.unwrap_err();

        assert!(matches!(err, AuthError::AuthenticationFailed(_)));
        assert!(!session.is_authenticated());
        assert_eq!(exchange.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_previous_token() {
        let session = AuthSession::new();
        session.establish(BearerToken::new("old").unwrap());

        let usecase = LoginUseCase::new(
            FakeExchange::new(Script::Reject),
            Arc::new(AuthConfig::default()),
        );
        assert!(usecase.execute(&session, input("wrong")).await.is_err());
        assert_eq!(session.current_token().unwrap().expose(), "old");
    }

    #[tokio::test]
    async fn test_invalid_input_skips_exchange() {
        let exchange = FakeExchange::new(Script::Token("tok"));
        let usecase = LoginUseCase::new(exchange.clone(), Arc::new(AuthConfig::default()));
        let session = AuthSession::new();

        let err = usecase.execute(&session, input("")).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidPassword(_)));
        assert_eq!(exchange.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_timeout_is_transport_error() {
        let usecase = LoginUseCase::new(
            FakeExchange::new(Script::Hang),
            Arc::new(AuthConfig::development()),
        );
        let session = AuthSession::new();

        let err = usecase.execute(&session, input("pw")).await.unwrap_err();

        assert!(matches!(err, AuthError::Transport(HttpError::Timeout)));
        assert!(!session.is_authenticated());
    }
}
