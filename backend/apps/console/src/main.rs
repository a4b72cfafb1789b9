//! Console Entry Point
//!
//! Logs in, submits one image, waits for the analysis and prints the result.
//! Uses `anyhow` for startup errors; everything below reports through
//! `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use analysis::{
    HttpAnalysisGateway, ImagePayload, RequestReportUseCase, ResultPresenter, TaskLifecycleClient,
};
use auth::{AuthSession, HttpCredentialExchange, LoginInput, LoginUseCase};
use kernel::error::app_error::{AppError, AppResult, OptionExt, ResultExt};
use kernel::error::kind::ErrorKind;
use platform::client::build_client;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ConsoleConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "console=info,analysis=info,auth=info,platform=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConsoleConfig::from_env(std::env::args().skip(1))?;
    let session = AuthSession::new();

    let outcome = run(&config, &session).await;
    session.logout();
    outcome.map_err(anyhow::Error::from)
}

async fn run(config: &ConsoleConfig, session: &AuthSession) -> AppResult<()> {
    // One connection pool for every backend call
    let http = build_client(&config.http)
        .map_app_err(ErrorKind::Internal, "cannot build the HTTP client")?;

    let exchange = HttpCredentialExchange::with_client(http.clone(), config.endpoints.clone());
    let login = LoginUseCase::new(Arc::new(exchange), Arc::new(config.auth()));
    login
        .execute(
            session,
            LoginInput {
                username: config.username.clone(),
                password: config.password.clone(),
            },
        )
        .await?;

    let image = ImagePayload::from_path(&config.image).await?;

    let analysis = config.analysis();
    let gateway = Arc::new(HttpAnalysisGateway::with_client(http, analysis.endpoints));
    let client = TaskLifecycleClient::new(
        Arc::clone(&gateway),
        session.handle(),
        Arc::new(analysis.poll),
    );

    let task_id = client.submit(image).await?;
    tracing::info!(task_id = %task_id, "Waiting for analysis");

    let snapshot = tokio::select! {
        snapshot = client.wait_for_terminal() => snapshot,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(task_id = %task_id, "Interrupted, discarding task");
            client.reset();
            return Ok(());
        }
    };

    let outcome = match snapshot.records() {
        Some(records) => {
            let presenter = ResultPresenter::new(records);
            let center = presenter.map_center();
            println!("Task {}: {} encroachment(s)", task_id, records.len());
            println!("Map center: {:.6}, {:.6}", center.lat(), center.lon());
            print!("{}", presenter.render_table());

            if config.report {
                let report = RequestReportUseCase::new(Arc::clone(&gateway), session.handle());
                let link = report.execute(&snapshot).await?;
                println!("Report: {}", link);
            }
            Ok(())
        }
        None => snapshot
            .error
            .as_ref()
            .ok_or_app_err(ErrorKind::Internal, format!("task ended in state {}", snapshot.state))
            .and_then(|failure| Err(AppError::new(failure.kind, failure.message.clone()))),
    };

    client.reset();
    outcome
}
