//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use gopkg::config::{PackageConfig, ServerConfig, SubmoduleConfig};
use gopkg::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// A package with the given submodules as `(path, url)` pairs.
pub fn package(path: &str, url: &str, submodules: &[(&str, &str)]) -> PackageConfig {
    PackageConfig {
        path: path.into(),
        url: url.into(),
        submodules: submodules
            .iter()
            .map(|(path, url)| SubmoduleConfig {
                path: path.to_string(),
                url: url.to_string(),
            })
            .collect(),
        ..Default::default()
    }
}

pub fn config(packages: Vec<PackageConfig>) -> ServerConfig {
    ServerConfig {
        packages,
        ..Default::default()
    }
}

/// Drive a single request through the fully layered router.
pub async fn send(server: &HttpServer, host: &str, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Host", host)
        .body(Body::empty())
        .unwrap();
    server.router().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A running server bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub updates: mpsc::UnboundedSender<ServerConfig>,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

pub async fn start_server(config: ServerConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(server.run(listener, config_updates, server_shutdown));
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown,
        updates,
        handle,
    }
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
