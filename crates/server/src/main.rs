use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

mod routes;

/// Issue service routes
pub fn app() -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/issues", get(routes::list_issues))
        .route("/api/issues/{id}", get(routes::get_issue))
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind port {port}: {e}");
            return;
        }
    };
    tracing::info!("Issue service running on http://localhost:{port}");
    if let Err(e) = axum::serve(listener, app()).await {
        tracing::error!("Server error: {e}");
    }
}
