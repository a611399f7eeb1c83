//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single dispatching handler
//! - Wire up middleware (request ID, tracing, access log)
//! - Bind server to a plain or TLS listener
//! - Drain in-flight requests on shutdown, bounded by the grace period

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::health;
use crate::http::middleware::access_log;
use crate::http::request::request_span;
use crate::lifecycle::startup::StartupError;
use crate::proxy::ApiProxy;
use crate::resilience::Deadline;
use crate::routing::{RouteKind, RouteTable};
use crate::static_files::StaticAssets;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub proxy: Arc<ApiProxy>,
    pub assets: Arc<StaticAssets>,
    pub deadline: Deadline,
}

/// HTTP server for the console proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, StartupError> {
        let routes = Arc::new(RouteTable::from_config(&config.api, &config.health));
        let proxy = Arc::new(ApiProxy::from_config(&config, routes.clone())?);
        let assets = Arc::new(StaticAssets::new(&config.static_files)?);

        let state = AppState {
            routes,
            proxy,
            assets,
            deadline: Deadline::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let routes = state.routes.clone();
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(from_fn_with_state(routes, access_log))
            .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    fn grace(&self) -> Duration {
        Duration::from_secs(self.config.timeouts.shutdown_grace_secs)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let grace = self.grace();
        let mut drain = shutdown.resubscribe();
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .into_future();

        tokio::select! {
            result = server => result?,
            _ = async {
                let _ = drain.recv().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Grace period elapsed with requests in flight"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server behind rustls on `addr`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let grace = self.grace();
        let handle = axum_server::Handle::new();

        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTPS server draining");
            drain.graceful_shutdown(Some(grace));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Send each request to the liveness handler, the API proxy or the static host.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    match state.routes.classify(request.method(), request.uri().path()) {
        RouteKind::Health => health::liveness().await.into_response(),
        RouteKind::Api => state.proxy.handle(request).await,
        RouteKind::Static => {
            let path = request.uri().path().to_owned();
            match state.deadline.run(state.assets.serve(request)).await {
                Ok(response) => response,
                Err(err) => err.into_response_for(&path),
            }
        }
    }
}
