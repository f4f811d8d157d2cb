//! HTTP Mock Server
//!
//! ```text
//!     Client Request
//!     ───────────────▶ request id ─▶ access log ─▶ timeout
//!                          │
//!                          ▼
//!                    /openapi ──────────────▶ generated OpenAPI document
//!                    resolve route (RouteTable)
//!                          │
//!                          ▼
//!                    auth gate ─▶ latency ─▶ rate limit ─▶ dispatcher
//!                                                            │
//!                           defined route  ◀─────────────────┤
//!                           /status/<code> ◀─────────────────┤
//!                           404            ◀─────────────────┘
//!
//!     route files ─▶ loader ─▶ RouteTable ◀─ watcher (hot reload)
//!     OpenAPI doc ─▶ importer ─┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use mock_server::config::{resolve_config, Args};
use mock_server::http::HttpServer;
use mock_server::lifecycle::{load_initial_routes, start_route_watcher, Shutdown};
use mock_server::observability::{init_logging, init_metrics};
use mock_server::routing::RouteTable;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    if args.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }
    if args.validate {
        println!("configuration is valid");
        return Ok(());
    }

    init_logging(&config.logging)?;
    tracing::info!("mock-server v{} starting", env!("CARGO_PKG_VERSION"));

    if config.metrics.enabled {
        let addr: SocketAddr = config.metrics.address.parse()?;
        init_metrics(addr)?;
    }

    let routes = Arc::new(RouteTable::new());
    let loaded = load_initial_routes(&config.routes, &routes).await?;
    tracing::info!(routes = loaded, "Route table ready");

    // The watcher stops when its handle is dropped.
    let (_watcher, route_updates) = match start_route_watcher(&config.routes)? {
        Some((watcher, rx)) => (Some(watcher), Some(rx)),
        None => (None, None),
    };

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        auth = !config.auth.token.is_empty(),
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, routes);
    let server_task = tokio::spawn(server.run(listener, route_updates, shutdown.listener()));

    shutdown.listen_for_signals().await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
