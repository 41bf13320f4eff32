use anyhow::Result;
use axum::http::Method;
use caption_api::{api, config::Config};
use dotenv::dotenv;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    dotenv().ok();
    let config = Config::from_env()?;

    // API router
    let gemini = config.gemini_client();
    tracing::info!(model = %gemini.model(), "using Gemini model");
    let api_router = api::routes(api::AppState {
        completion: Arc::new(gemini),
        model: config.gemini_model.clone(),
    });

    // Built front-end with SPA-ish index fallback
    let index = format!("{}/index.html", config.static_dir);
    let static_service = ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(index));
    // CORS (the dev front-end runs on its own port)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = axum::Router::new()
        .merge(api_router)
        .nest_service("/", static_service)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Bind
    let addr = config.addr()?;
    tracing::info!("listening on http://{}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
