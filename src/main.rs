use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classdash_backend::api::router;
use classdash_backend::classroom::{
    ClassroomClient, ClassroomConfig, ClassroomHttpClient, NoopClassroomClient,
};
use classdash_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "classdash_backend=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://classdash.db".to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let classroom: Arc<dyn ClassroomClient> = match ClassroomConfig::new_from_env() {
        Ok(config) => Arc::new(ClassroomHttpClient::new(config)?),
        Err(e) => {
            warn!("classroom client disabled: {}", e);
            Arc::new(NoopClassroomClient)
        }
    };

    let state = AppState {
        db: pool.clone(),
        classroom,
    };

    let app = router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
