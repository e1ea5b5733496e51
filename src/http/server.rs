//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the package handler
//! - Wire up middleware (request ID, timeout, tracing)
//! - Dispatch requests to the package routing table
//! - Apply configuration updates by swapping the routing table
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::{
    is_tooling_request, propagate_request_id_layer, request_host, request_path,
    set_request_id_layer, RequestIdExt,
};
use crate::http::response::{self, Outcome};
use crate::observability::metrics;
use crate::package::{ProvisionError, TemplateData};
use crate::routing::PackageRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub packages: Arc<ArcSwap<PackageRouter>>,
}

/// HTTP server for vanity import paths.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    packages: Arc<ArcSwap<PackageRouter>>,
}

impl HttpServer {
    /// Provision every configured package and build the server.
    pub fn new(config: ServerConfig) -> Result<Self, ProvisionError> {
        let table = PackageRouter::from_config(&config.packages)?;
        metrics::record_packages(table.len());
        for route in table.routes() {
            let package = route.package();
            tracing::info!(
                path = package.path(),
                host = package.host().unwrap_or("*"),
                vcs = package.vcs(),
                url = package.url(),
                submodules = package.submodules().len(),
                "Package registered"
            );
        }

        let packages = Arc::new(ArcSwap::from_pointee(table));
        let state = AppState {
            packages: packages.clone(),
        };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            packages,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(package_handler))
            .route("/{*path}", any(package_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |req: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %req.method(),
                                uri = %req.uri(),
                                request_id = %req.request_id(),
                            )
                        },
                    ))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// A clone of the fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config the server was started with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Provision `config` and make it the active package table.
    ///
    /// On error the active table is left untouched.
    pub fn reload(&self, config: &ServerConfig) -> Result<usize, ProvisionError> {
        swap_packages(&self.packages, config)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Package tables arriving on `config_updates` replace the active one.
    /// Listener and timeout settings are fixed for the lifetime of the server.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");
        metrics::record_packages(self.packages.load().len());

        let packages = self.packages.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match swap_packages(&packages, &config) {
                    Ok(count) => tracing::info!(packages = count, "Configuration reloaded"),
                    Err(e) => tracing::error!(
                        error = %e,
                        "Rejected configuration update, keeping current packages"
                    ),
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn swap_packages(
    packages: &ArcSwap<PackageRouter>,
    config: &ServerConfig,
) -> Result<usize, ProvisionError> {
    let table = PackageRouter::from_config(&config.packages)?;
    let count = table.len();
    packages.store(Arc::new(table));
    metrics::record_packages(count);
    Ok(count)
}

/// Resolves the request against its package and renders the answer.
async fn package_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let table = state.packages.load_full();
    let path = request_path(&request);

    let Some(package) = table.match_request(&request) else {
        tracing::warn!(request_id = %request.request_id(), path = %path, "No package matched");
        metrics::record_request("none", Outcome::NotFound, start_time);
        return (StatusCode::NOT_FOUND, "no package registered for path").into_response();
    };

    let resolution = package.resolve(&path);
    let tooling = is_tooling_request(request.uri().query());
    let data = TemplateData {
        host: request_host(&request).unwrap_or_default(),
        path: resolution.path,
        vcs: package.vcs(),
        url: resolution.url,
    };

    tracing::debug!(
        request_id = %request.request_id(),
        path = %path,
        import_root = resolution.path,
        url = resolution.url,
        submodule = resolution.submodule.is_some(),
        tooling,
        "Resolved package"
    );

    let (outcome, resp) = match response::render(package.template(), &data, tooling) {
        Ok(resp) if tooling => (Outcome::Metadata, resp),
        Ok(resp) => (Outcome::Redirect, resp),
        Err(e) => {
            tracing::error!(
                request_id = %request.request_id(),
                package = package.path(),
                error = %e,
                "Failed to render response"
            );
            (Outcome::Error, e.into_response())
        }
    };

    tracing::info!(
        request_id = %request.request_id(),
        import_root = resolution.path,
        outcome = outcome.as_str(),
        "Served vanity import"
    );
    metrics::record_request(package.path(), outcome, start_time);
    resp
}
