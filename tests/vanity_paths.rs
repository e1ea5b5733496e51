//! Request handling through the layered router, without sockets.

use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use gopkg::config::PackageConfig;
use gopkg::http::X_REQUEST_ID;
use gopkg::HttpServer;

mod common;
use common::{body_text, config, package, send};

fn scenario_server() -> HttpServer {
    HttpServer::new(config(vec![package(
        "/pkg",
        "https://host/a",
        &[("/sub", "https://host/b")],
    )]))
    .unwrap()
}

#[tokio::test]
async fn test_submodule_metadata() {
    let server = scenario_server();
    let response = send(&server, "example.com", "/pkg/sub/foo?go-get=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/html");
    let body = body_text(response).await;
    assert!(body.contains(r#"<meta name="go-import" content="example.com/pkg/sub git https://host/b">"#));
    assert!(body.contains("go get example.com/pkg/sub"));
}

#[tokio::test]
async fn test_unmatched_subpath_uses_package() {
    let server = scenario_server();
    let response = send(&server, "example.com", "/pkg/other?go-get=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"content="example.com/pkg git https://host/a""#));
}

#[tokio::test]
async fn test_browser_redirected_to_submodule() {
    let server = scenario_server();
    let response = send(&server, "example.com", "/pkg/sub").await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "https://host/b");
}

#[tokio::test]
async fn test_other_go_get_values_redirect() {
    let server = scenario_server();
    for uri in ["/pkg?go-get=0", "/pkg?go-get=", "/pkg?go-get", "/pkg/?x=1"] {
        let response = send(&server, "example.com", uri).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
        assert_eq!(response.headers().get(LOCATION).unwrap(), "https://host/a");
    }
}

#[tokio::test]
async fn test_mount_root_with_and_without_slash() {
    let server = HttpServer::new(config(vec![package(
        "/caddy/gopkg",
        "https://github.com/org/repo",
        &[],
    )]))
    .unwrap();

    for uri in ["/caddy/gopkg?go-get=1", "/caddy/gopkg/?go-get=1"] {
        let body = body_text(send(&server, "example.com", uri).await).await;
        assert!(
            body.contains(r#"content="example.com/caddy/gopkg git https://github.com/org/repo""#),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_escaped_path_resolves_like_plain_path() {
    let server = scenario_server();
    let body = body_text(send(&server, "example.com", "/pkg/s%75b?go-get=1").await).await;
    assert!(body.contains(r#"content="example.com/pkg/sub git https://host/b""#));

    let response = send(&server, "example.com", "/p%6Bg/sub").await;
    assert_eq!(response.headers().get(LOCATION).unwrap(), "https://host/b");
}

#[tokio::test]
async fn test_nested_submodules_longest_wins() {
    let server = HttpServer::new(config(vec![package(
        "/pkg",
        "https://host/a",
        &[("/a/b", ""), ("/a", "https://host/short")],
    )]))
    .unwrap();

    let body = body_text(send(&server, "example.com", "/pkg/a/b/c?go-get=1").await).await;
    assert!(body.contains(r#"content="example.com/pkg/a/b git https://host/a""#));

    let body = body_text(send(&server, "example.com", "/pkg/a/c?go-get=1").await).await;
    assert!(body.contains(r#"content="example.com/pkg/a git https://host/short""#));
}

#[tokio::test]
async fn test_unregistered_path_is_404() {
    let server = scenario_server();
    let response = send(&server, "example.com", "/elsewhere?go-get=1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&server, "example.com", "/pkgs").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_vcs_and_template() {
    let server = HttpServer::new(config(vec![PackageConfig {
        vcs: "hg".into(),
        template: Some("{{.Host}}{{.Path}} {{.Vcs}} {{.URL}}".into()),
        ..package("/tools", "https://hg.example.com/tools", &[])
    }]))
    .unwrap();

    let body = body_text(send(&server, "go.example.com", "/tools/cmd?go-get=1").await).await;
    assert_eq!(body, "go.example.com/tools hg https://hg.example.com/tools");
}

#[tokio::test]
async fn test_failing_template_is_500() {
    let server = HttpServer::new(config(vec![PackageConfig {
        template: Some("{{.Branch}}".into()),
        ..package("/pkg", "https://host/a", &[])
    }]))
    .unwrap();

    let response = send(&server, "example.com", "/pkg?go-get=1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("Branch"));

    // Browsers never hit the template.
    let response = send(&server, "example.com", "/pkg").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_host_restricted_package() {
    let server = HttpServer::new(config(vec![
        PackageConfig {
            host: Some("go.example.com".into()),
            ..package("/pkg", "https://host/go", &[])
        },
        package("/pkg", "https://host/default", &[]),
    ]))
    .unwrap();

    let response = send(&server, "GO.example.com", "/pkg").await;
    assert_eq!(response.headers().get(LOCATION).unwrap(), "https://host/go");

    let response = send(&server, "example.org", "/pkg").await;
    assert_eq!(response.headers().get(LOCATION).unwrap(), "https://host/default");
}

#[tokio::test]
async fn test_request_id_on_response() {
    let server = scenario_server();
    let response = send(&server, "example.com", "/pkg").await;
    let id = response.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_reload_swaps_packages() {
    let server = scenario_server();

    server
        .reload(&config(vec![package("/new", "https://host/new", &[])]))
        .unwrap();
    let response = send(&server, "example.com", "/new").await;
    assert_eq!(response.headers().get(LOCATION).unwrap(), "https://host/new");
    let response = send(&server, "example.com", "/pkg").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A broken update leaves the active table in place.
    assert!(server
        .reload(&config(vec![package("/broken", "", &[])]))
        .is_err());
    let response = send(&server, "example.com", "/new").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}
