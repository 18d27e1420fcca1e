//! Startup shared by the three service binaries: tracing, configuration,
//! the database connector, the HTTP stack and graceful shutdown.

use std::{net::SocketAddr, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, Request, Response},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{DbConfig, ServerConfig, ServiceKind},
    db::{RetryPolicy, connect_with_retry},
    routes::create_service_router,
    state::AppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shop_services=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Full application for one service, with state bound and layers applied.
pub fn build_app(kind: ServiceKind, state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                service = kind.name(),
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_request(|_request: &Request<_>, _span: &tracing::Span| {
            tracing::debug!("request started");
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    create_service_router(kind)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

/// Runs one service until ctrl-c or SIGTERM, then closes the pool.
pub async fn run(kind: ServiceKind) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let db_config = DbConfig::from_env()?;
    let server_config = ServerConfig::from_env(kind);

    let pool = match connect_with_retry(&db_config, RetryPolicy::default()).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(
                service = kind.name(),
                error = %format!("{err:#}"),
                "fatal: no database connection"
            );
            return Err(err);
        }
    };

    let state = AppState::new(pool.clone(), server_config.request_timeout);
    let app = build_app(kind, state);

    let addr = SocketAddr::from((
        server_config.host.parse::<std::net::IpAddr>()?,
        server_config.port,
    ));
    tracing::info!("{} listening on {}", kind.name(), addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("{} stopped", kind.name());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
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
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
