//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the welcome and relay handlers
//! - Wire up middleware (tracing, cross-origin headers)
//! - Bind server to listener and shut down gracefully
//! - Decode, forward, translate, respond

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::http::request::{InboundRequest, ProxyMethod};
use crate::http::response::WelcomePayload;
use crate::proxy::Forwarder;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            forwarder: Arc::new(Forwarder::new(config.upstream.clone())),
            config: config.clone(),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let wildcard = HeaderValue::from_static("*");

        Router::new()
            .route("/", get(welcome_handler).fallback(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                wildcard.clone(),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                wildcard.clone(),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                wildcard,
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, e.g. for driving it without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.normalized_base(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

async fn welcome_handler(State(state): State<AppState>) -> Json<WelcomePayload> {
    Json(WelcomePayload::for_upstream(&state.config.upstream.host()))
}

/// Main relay handler: decode, forward, translate.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = match ProxyMethod::try_from(request.method()) {
        Ok(m) => m,
        Err(unsupported) => {
            tracing::warn!(method = %unsupported.0, "Rejected unsupported method");
            return unsupported.into_response();
        }
    };

    let inbound =
        match InboundRequest::decode(method, request, state.config.limits.max_body_size).await {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::error!(error = %e, "Unexpected error");
                return e.into_response();
            }
        };

    match state.forwarder.forward(inbound).await {
        Ok(upstream) => upstream.into_response(),
        Err(e) => {
            tracing::error!(error = %e, timeout = e.is_timeout(), "Request failed");
            e.into_response()
        }
    }
}
