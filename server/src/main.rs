//! Control/telemetry service binary (`ew-server`): axum + socketioxide,
//! a `/health` endpoint, a permissive CORS layer, and a periodic tick task
//! driving the simulation core. The core (`ew-sim`) never depends on axum
//! or socketioxide directly — this binary is the sole place that bridges
//! `CoreEvent`s onto a transport.

mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use socketioxide::SocketIo;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use ew_sim::config::SimConfig;
use ew_types::CoreEvent;
use handlers::on_connect;
use state::{Engine, SharedEngine};

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Drives the simulation core at a fixed tick rate and re-broadcasts the
/// `CoreEvent`s each tick produces over the socket.
async fn run_tick_loop(engine: SharedEngine, io: SocketIo, tick_hz: f64) {
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / tick_hz));
    loop {
        interval.tick().await;

        let mut events = vec![CoreEvent::Update { dt_ms: 1000.0 / tick_hz }];
        {
            let mut eng = engine.write().await;
            eng.tick(&mut events);
        }
        events.push(CoreEvent::Sync);

        let _ = io.emit("core-events", &events);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ew_server=info,socketioxide=warn".into()),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "ew-server starting");

    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => SimConfig::load(std::path::Path::new(&path))?,
        Err(_) => SimConfig::default(),
    };
    info!(satellites = config.satellites.len(), "loaded simulation config");

    let engine: SharedEngine = Arc::new(RwLock::new(Engine::from_config(config)));

    let (socket_layer, io) = SocketIo::builder().build_layer();

    let engine_sock = engine.clone();
    io.ns("/", move |socket: socketioxide::extract::SocketRef| {
        let engine = engine_sock.clone();
        async move {
            on_connect(socket, engine).await;
        }
    });

    tokio::spawn(run_tick_loop(engine.clone(), io.clone(), 60.0));

    let cors_origins_env =
        std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string());
    let cors = if cors_origins_env.trim() == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_origins_env
            .split(',')
            .filter_map(|o| o.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .layer(socket_layer)
        .layer(cors);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");
    info!(addr, "listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
