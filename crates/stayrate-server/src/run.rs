use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Router};
use futures::FutureExt;
use stayrate_app::state::{AppConfig, AppState};
use stayrate_app::{dashboard, rest_api};
use tracing::debug;

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if args.cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    debug!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

fn main_router(state: AppState) -> Router<()> {
    let session_store = tower_sessions::MemoryStore::default();
    let session_layer = tower_sessions::SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(tower_sessions::Expiry::OnInactivity(
            time::Duration::hours(1),
        ));

    Router::new()
        .route("/", get(dashboard::dashboard))
        .nest("/api/hotel-class", rest_api::hotel_class::router())
        .nest("/api/hotel", rest_api::hotel::router())
        .nest("/api/review", rest_api::review::router())
        .nest("/api/user", rest_api::user::router())
        .layer(session_layer)
        .with_state(state)
        .route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let data_dir = config.data_dir();
    if !data_dir.is_dir() {
        tokio::fs::create_dir_all(&data_dir).await?;
        debug!("Created data directory {}", data_dir.display());
    }

    let pool = stayrate_dal::new_pool(&config.database_url()).await?;
    stayrate_dal::migrate(&pool).await?;

    let app_config = AppConfig {
        default_page_size: config.default_page_size,
    };

    Ok(AppState::new(app_config, pool))
}
