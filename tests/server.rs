//! End-to-end tests of `HttpServer` over TCP.

use std::time::Duration;

use errorh::config::loader::{parse_config, Format};
use errorh::config::ServerConfig;
use errorh::{HttpServer, RegisterError};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

mod common;

use common::{fixture, fixtures};

fn site_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.files.relative_to = fixtures();
    config.errorh = serde_json::json!({
        "errorFiles": { "404": "404.html", "default": "50x.html" },
        "staticRoute": {
            "path": "/{path*}",
            "handler": { "directory": { "path": "." } }
        }
    });
    config
}

#[tokio::test]
async fn test_serves_site_with_error_pages() {
    let server = HttpServer::new(site_config()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .run_until(listener, async {
                let _ = stop_rx.await;
            })
            .await
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let res = client.get(format!("http://{addr}/")).send().await.expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "index page\n");

    let res = client.get(format!("http://{addr}/missing")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["content-type"], "text/html");
    assert_eq!(res.text().await.unwrap(), fixture("404.html"));

    let _ = stop_tx.send(());
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_invalid_options_rejected_at_startup() {
    let mut config = site_config();
    config.errorh = serde_json::json!({ "errorFiles": [] });

    let err = HttpServer::new(config).err().expect("registration must fail");
    assert!(matches!(err, RegisterError::InvalidOptions(ref errors) if errors.len() == 1));
    assert!(err.to_string().contains("errorFiles"));
}

#[tokio::test]
async fn test_router_from_toml_config() {
    let toml = format!(
        r#"
        [files]
        relative_to = "{}"

        [errorh.errorFiles]
        404 = "404.html"
        "#,
        fixtures().display()
    );
    let config = parse_config(&toml, Format::Toml).unwrap();
    let server = HttpServer::new(config).unwrap();

    let res = common::get_path(server.router(), "/nothing-here").await;
    assert_eq!(res.status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(res.text(), fixture("404.html"));
}
