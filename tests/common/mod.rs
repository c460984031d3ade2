#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chess_core::model::MaterialModel;
use chess_core::SharedModel;
use reqwest::Client;
use server::config::Config;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A server running on an ephemeral port for the duration of a test.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Build a URL for an API endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the API with the material evaluator and default config.
pub async fn spawn_server() -> TestServer {
    spawn_server_with(Arc::new(MaterialModel), Config::default()).await
}

pub async fn spawn_server_with(model: SharedModel, config: Config) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let app = server::router(model, config);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server crashed");
    });

    TestServer { addr }
}

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}
