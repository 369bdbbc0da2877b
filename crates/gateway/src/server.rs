use std::{net::SocketAddr, sync::Arc};

use {
    aistudio_config::{Severity, StudioConfig},
    aistudio_protocol::{
        API_HEALTH_PATH, BackendHealth, ErrorBody, LEGACY_ALIASES, WEBHOOK_HEALTH_PATH,
        WebhookHealth, legacy_path, messages,
    },
    axum::{
        Router,
        body::Bytes,
        extract::{DefaultBodyLimit, State, rejection::BytesRejection},
        http::{
            HeaderMap, HeaderValue, Method, StatusCode, Uri, header::CONTENT_TYPE,
            request::Parts,
        },
        response::{IntoResponse, Json, Response},
        routing::{get, post},
    },
    chrono::{SecondsFormat, Utc},
    tower_http::{
        cors::{AllowOrigin, CorsLayer},
        trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    },
    tracing::{Level, info, warn},
};

use crate::{
    state::GatewayState,
    webhook_routes::{proxy_request, webhook_handler},
};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayState>,
}

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    let cors = cors_layer(&state);
    let trace_level = if state.mode.is_production() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(trace_level))
        .on_response(DefaultOnResponse::new().level(trace_level));
    let body_limit = DefaultBodyLimit::max(state.body_limit_bytes);

    let mut router = Router::new()
        .route(
            WEBHOOK_HEALTH_PATH,
            get(webhook_health_handler)
                // `health` is not a channel, but it shares the `{channel}` slot.
                .post(
                    |State(app): State<AppState>,
                     headers: HeaderMap,
                     body: Result<Bytes, BytesRejection>| async move {
                        proxy_request(&app.gateway, "health", &headers, body).await
                    },
                )
                .fallback(not_found_handler),
        )
        .route(
            API_HEALTH_PATH,
            get(api_health_handler).fallback(not_found_handler),
        )
        .route(
            "/api/webhook/{channel}",
            post(webhook_handler).fallback(not_found_handler),
        );

    for &channel in LEGACY_ALIASES {
        router = router.route(
            &legacy_path(channel),
            post(
                move |State(app): State<AppState>,
                      headers: HeaderMap,
                      body: Result<Bytes, BytesRejection>| async move {
                    proxy_request(&app.gateway, channel, &headers, body).await
                },
            )
            .fallback(not_found_handler),
        );
    }

    router
        .fallback(not_found_handler)
        .layer(body_limit)
        .layer(cors)
        .layer(trace)
        .with_state(AppState { gateway: state })
}

fn cors_layer(state: &GatewayState) -> CorsLayer {
    let allow_origin = if state.mode.is_production() {
        let origins: Vec<HeaderValue> = state
            .cors
            .production_origins()
            .iter()
            .filter_map(|o| match o.trim_end_matches('/').parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(origin = %o, error = %e, "ignoring invalid CORS origin");
                    None
                },
            })
            .collect();
        AllowOrigin::list(origins)
    } else {
        AllowOrigin::predicate(|origin: &HeaderValue, _parts: &Parts| {
            origin.to_str().is_ok_and(is_local_origin)
        })
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

/// Whether `origin` is `http(s)://` on the local machine, any port.
#[must_use]
pub fn is_local_origin(origin: &str) -> bool {
    url::Url::parse(origin).is_ok_and(|u| {
        matches!(u.scheme(), "http" | "https")
            && matches!(u.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"))
    })
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Start the gateway HTTP server and run until SIGINT/SIGTERM.
pub async fn start_gateway(config: &StudioConfig) -> anyhow::Result<()> {
    for d in &aistudio_config::validate(config).diagnostics {
        match d.severity {
            Severity::Error | Severity::Warning => {
                warn!(path = %d.path, severity = %d.severity, "config: {}", d.message)
            },
            Severity::Info => info!(path = %d.path, "config: {}", d.message),
        }
    }

    let state = GatewayState::new(config);
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;

    log_banner(&state, local);

    let app = build_gateway_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("gateway stopped");
    Ok(())
}

fn log_banner(state: &GatewayState, addr: SocketAddr) {
    let origins = if state.mode.is_production() {
        state.cors.production_origins().join(", ")
    } else {
        "any localhost origin".to_string()
    };
    let mut lines = vec![
        format!("aistudio gateway v{}", state.version),
        format!("mode: {}", state.mode),
        format!("listening: http://{addr}"),
        format!("cors: {origins}"),
        format!(
            "pin: {}",
            if state.authenticator.has_pin() {
                "configured"
            } else {
                "not set"
            }
        ),
    ];
    for channel in state.registry.iter() {
        lines.push(format!(
            "{} → {}{}",
            channel.name,
            channel.description,
            if channel.requires_pin {
                " [pin]"
            } else {
                ""
            }
        ));
    }
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn webhook_health_handler() -> impl IntoResponse {
    Json(WebhookHealth {
        status: messages::WEBHOOK_HEALTHY.into(),
        timestamp: now_rfc3339(),
    })
}

async fn api_health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(BackendHealth {
        status: messages::BACKEND_HEALTHY.into(),
        environment: state.gateway.mode.to_string(),
        timestamp: now_rfc3339(),
    })
}

async fn not_found_handler(method: Method, uri: Uri) -> Response {
    let body = ErrorBody::new(messages::ROUTE_NOT_FOUND).for_route(method.as_str(), uri.path());
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
