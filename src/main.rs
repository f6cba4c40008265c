use agentchat::{index, res, rooms, AppState, LocalStore};
use axum::{routing::get, Router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_url = dotenv::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:agentchat.db".to_owned());
    let store = LocalStore::open(&db_url).await.unwrap();
    info!(%db_url, "storage open");

    let app = Router::new()
        .route("/", get(index::index))
        .route("/style.css", get(res::stylesheet))
        .nest("/r", rooms::router())
        .with_state(AppState { store });

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
    info!("listening on http://localhost:8080");
    axum::serve(listener, app).await.unwrap();
}
