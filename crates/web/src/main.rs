use std::sync::{Arc, Mutex};

use tower_http::trace::TraceLayer;
use tracing::info;

use chess_tutor_core::engine::StockfishEngine;
use chess_tutor_core::TutorConfig;

mod routes;

pub struct AppState {
    pub config: TutorConfig,
    /// Started on the first review request and restarted after a failure
    pub engine: Mutex<Option<StockfishEngine>>,
}

impl AppState {
    pub fn new(config: TutorConfig) -> Self {
        Self {
            config,
            engine: Mutex::new(None),
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = TutorConfig::from_env();
    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "server running");

    axum::serve(listener, app).await
}
