mod config;
mod database;
mod filters;
mod handlers;
mod mailer;
mod middleware;
mod models;
mod utils;

use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use std::env;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{services::ServeDir, trace::TraceLayer};

use config::AppConfig;
use database::{create_database_pool, Database};
use mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub mailer: Mailer,
    pub jwt_secret: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = AppConfig::from_env()?;

    let db = create_database_pool(&config.db).await?;
    log::info!("conexión a la base de datos establecida");

    let state = AppState {
        db,
        mailer: Mailer::new(config.smtp),
        jwt_secret: config.jwt_secret,
    };

    let app = create_router(state);

    // Get port from environment or use default
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    log::info!("servidor escuchando en http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        // Public routes (no authentication required)
        .route("/", get(|| async { Redirect::permanent("/login") }))
        .route("/login", get(handlers::auth::login_page))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        // Protected routes (authentication required)
        .route("/stock", get(handlers::stock::ver_stock))
        .route("/pedidos/nuevo", get(handlers::pedidos::formulario_pedido))
        .route("/pedidos", post(handlers::pedidos::crear_pedido))
        .route("/historial", get(handlers::pedidos::historial))
        // Admin-only routes
        .route("/pedidos/:id", post(handlers::pedidos::actualizar_pedido))
        .route("/panel", get(handlers::panel::panel_control))
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new()),
        )
        .with_state(state)
}
