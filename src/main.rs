use std::sync::Arc;

use axum::{Router, middleware::from_fn};
use dotenv::dotenv;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::FmtSubscriber;

use crate::{
    common::app_state::AppState, config::config::CONFIG, health::handlers::health_routes,
    mw::request_mw::request_mw, quiz::handlers::quiz_routes, quiz::notifier::spawn_notifier,
};

mod common;
mod config;
mod health;
mod mw;
mod quiz;

#[cfg(test)]
mod tests;

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/health", health_routes(state.clone()))
        .nest("/quiz", quiz_routes(state))
        .layer(from_fn(request_mw))
}

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let level = CONFIG
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::DEBUG);

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state
    let state = AppState::from_config(&CONFIG).unwrap_or_else(|e| panic!("{}", e));
    spawn_notifier(state.get_sessions().subscribe());
    state.get_sessions().spawn_cleanup();

    // Initialize webserver
    let address = format!("{}:{}", CONFIG.server.address, CONFIG.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", address, e));

    info!("Server listening on address: {}", address);
    axum::serve(listener, app(state))
        .await
        .unwrap_or_else(|e| panic!("Server stopped: {}", e));
}
