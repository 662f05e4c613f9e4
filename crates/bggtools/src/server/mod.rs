mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::prelude::{eprintln, *};

/// The plugin host is the only browser origin that calls this API.
pub const ALLOWED_ORIGIN: &str = "https://chat.openai.com";

#[derive(Debug, clap::Parser)]
#[command(name = "serve")]
#[command(about = "Serve the JSON API over HTTP")]
pub struct App {
    /// Port to listen on
    #[arg(short, long, env = "BGGTOOLS_PORT", default_value = "5003")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "BGGTOOLS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Directory holding the plugin manifest and logo
    #[arg(long, env = "BGGTOOLS_ASSETS", default_value = "assets")]
    pub assets: PathBuf,
}

pub struct AppState {
    pub http: reqwest::Client,
    pub assets: PathBuf,
}

pub async fn run(options: App, global: crate::Global) -> Result<()> {
    let addr = format!("{}:{}", options.host, options.port);

    let cors = CorsLayer::new()
        .allow_origin(ALLOWED_ORIGIN.parse::<HeaderValue>()?)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let state = Arc::new(AppState {
        http: reqwest::Client::new(),
        assets: options.assets,
    });

    let app_router = router(state).layer(cors);

    if global.verbose {
        eprintln!("BGG JSON proxy listening on http://{addr}");
        eprintln!("Upstream API base: {}", crate::bgg::BGG_API_BASE);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/.well-known/ai-plugin.json", get(handlers::manifest))
        .route("/logo.png", get(handlers::logo))
        .route("/user/{username}", get(handlers::user))
        .route("/hot", get(handlers::hot))
        .route("/collection/{username}/{status}", get(handlers::collection))
        .route("/plays/{username}", get(handlers::plays))
        .route("/thing/{game_id}", get(handlers::thing))
        .route("/search/{query}", get(handlers::search))
        .route("/advanced_search", get(handlers::advanced_search))
        .route("/rank/{category}", get(handlers::rank))
        .with_state(state)
}
