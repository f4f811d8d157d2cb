//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use mock_server::config::ServerConfig;
use mock_server::http::HttpServer;
use mock_server::lifecycle::Shutdown;
use mock_server::routing::{Route, RouteTable};

/// A mock server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub routes: Arc<RouteTable>,
    pub updates: mpsc::UnboundedSender<Vec<Route>>,
    shutdown: Shutdown,
}

impl TestServer {
    /// Start a server answering `routes` with `config`.
    pub async fn start(config: ServerConfig, routes: Vec<Route>) -> Self {
        let table = Arc::new(RouteTable::new());
        table.bulk_load(routes);

        let shutdown = Shutdown::new();
        let (updates, route_updates) = mpsc::unbounded_channel();
        let server = HttpServer::new(config, Arc::clone(&table));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server_shutdown = shutdown.listener();
        tokio::spawn(async move {
            let _ = server.run(listener, Some(route_updates), server_shutdown).await;
        });

        Self {
            addr,
            routes: table,
            updates,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// HTTP client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// A server config with the auth gate set to `token`.
pub fn config_with_token(token: &str) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.auth.token = token.to_string();
    config
}
