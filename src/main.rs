use std::{process, sync::Arc};

use scriptorium::{
    application::{
        clock::{SystemClock, UuidGenerator},
        error::AppError,
        posts::PostService,
    },
    config,
    infra::{
        bootstrap::{self, STARTUP_TARGET},
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let (reader, writer) = bootstrap::post_stores(&settings.database).await?;

    let posts = PostService::new(
        reader,
        writer,
        Arc::new(UuidGenerator),
        Arc::new(SystemClock),
    );
    let admin_gate = bootstrap::admin_gate(&settings.admin);

    serve_http(&settings, ApiState::new(posts, admin_gate)).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    bootstrap::migrate(&settings.database).await?;
    Ok(())
}

async fn serve_http(settings: &config::Settings, api_state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(api_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target: STARTUP_TARGET,
        addr = %settings.server.addr,
        "Listening"
    );

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown({
        let shutdown = shutdown.clone();
        async move { shutdown.notified().await }
    });
    let mut handle = tokio::spawn(async move { server.await });

    let outcome = tokio::select! {
        outcome = &mut handle => outcome,
        () = shutdown_signal() => {
            info!(target: "scriptorium::shutdown", "Shutdown signal received, draining connections");
            shutdown.notify_one();
            match tokio::time::timeout(settings.server.graceful_shutdown, &mut handle).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        target: "scriptorium::shutdown",
                        timeout_secs = settings.server.graceful_shutdown.as_secs(),
                        "Graceful shutdown timed out; aborting open connections"
                    );
                    handle.abort();
                    return Ok(());
                }
            }
        }
    };

    outcome
        .map_err(|err| AppError::unexpected(format!("server task failed: {err}")))?
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target: "scriptorium::shutdown", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target: "scriptorium::shutdown", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
