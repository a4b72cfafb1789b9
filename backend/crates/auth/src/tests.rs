//! Unit tests for the auth crate
//! Login flows wired end to end against an in-process token endpoint.

#[cfg(test)]
mod login_flow_tests {
    use std::sync::Arc;

    use axum::{Form, Json, Router, http::StatusCode, routing::post};
    use platform::ApiEndpoints;
    use serde::Deserialize;
    use serde_json::{Value, json};

    use crate::application::config::AuthConfig;
    use crate::application::login::{LoginInput, LoginUseCase};
    use crate::domain::entity::auth_session::AuthSession;
    use crate::error::AuthError;
    use crate::infra::http::HttpCredentialExchange;
    use kernel::error::kind::ErrorKind;

    #[derive(Deserialize)]
    struct TokenForm {
        username: String,
        password: String,
    }

    async fn token(Form(form): Form<TokenForm>) -> (StatusCode, Json<Value>) {
        if form.username == "surveyor" && form.password == "s3cret pass" {
            (StatusCode::OK, Json(json!({"access_token": "tok-abc"})))
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Incorrect username or password"})))
        }
    }

    async fn login_usecase() -> LoginUseCase<HttpCredentialExchange> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/token", post(token)))
                .await
                .unwrap();
        });
        let endpoints = ApiEndpoints::new(&format!("http://{}", addr)).unwrap();
        let config = Arc::new(AuthConfig::development().with_endpoints(endpoints));
        let exchange = HttpCredentialExchange::new(&config).unwrap();
        LoginUseCase::new(Arc::new(exchange), config)
    }

    fn input(username: &str, password: &str) -> LoginInput {
        LoginInput {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let usecase = login_usecase().await;
        let session = AuthSession::new();
        let handle = session.handle();

        let output = usecase
            .execute(&session, input("surveyor", "s3cret pass"))
            .await
            .unwrap();

        assert_eq!(output.generation, 1);
        assert_eq!(handle.current_token().unwrap().expose(), "tok-abc");

        assert!(session.logout());
        assert!(!handle.is_authenticated());
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_session_empty() {
        let usecase = login_usecase().await;
        let session = AuthSession::new();

        let err = usecase
            .execute(&session, input("surveyor", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::AuthenticationFailed(_)));
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        assert!(!session.is_authenticated());
        assert_eq!(session.generation(), 0);
    }

    #[tokio::test]
    async fn test_relogin_replaces_token_after_invalidation() {
        let usecase = login_usecase().await;
        let session = AuthSession::new();

        usecase
            .execute(&session, input("surveyor", "s3cret pass"))
            .await
            .unwrap();
        session.handle().invalidate();
        let output = usecase
            .execute(&session, input("surveyor", "s3cret pass"))
            .await
            .unwrap();

        assert_eq!(output.generation, 3);
        assert!(session.is_authenticated());
    }
}
