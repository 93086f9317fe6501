use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use huddle_api::auth::{AppState, AppStateInner};
use huddle_api::tokens::TokenKeys;
use huddle_realtime::bus::LocalBus;
use huddle_realtime::token::RealtimeKey;
use huddle_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huddle=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("HUDDLE_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let jwt_refresh_secret = std::env::var("HUDDLE_JWT_REFRESH_SECRET")
        .unwrap_or_else(|_| "dev-refresh-secret-change-me".into());
    let realtime_key =
        std::env::var("HUDDLE_REALTIME_KEY").unwrap_or_else(|_| "local.dev:dev-secret".into());
    let host = std::env::var("HUDDLE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("HUDDLE_PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()?;

    // Shared state
    let bus = LocalBus::new();
    let issuer = RealtimeKey::from_key(&realtime_key)?;

    let state: AppState = Arc::new(AppStateInner {
        store: Store::new(),
        keys: TokenKeys::new(jwt_secret, jwt_refresh_secret),
        publisher: Arc::new(bus),
        issuer: Arc::new(issuer),
    });

    let app = huddle_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Huddle server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
