mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App, HttpResponse, HttpServer,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::db::Database;
use crate::routes::create_routes;
use crate::utils::ssh::{RemoteCopy, ScpClient};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    // Fetches audio files from the storage servers
    pub remote_copy: Arc<dyn RemoteCopy>,
}

impl AppState {
    pub fn new(db: Database, config: Config, remote_copy: Arc<dyn RemoteCopy>) -> Self {
        AppState {
            db,
            config: Arc::new(config),
            remote_copy,
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    dotenvy::dotenv().ok();

    let log_level = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Precise API");

    let config = Config::from_env().map_err(anyhow::Error::msg)?;
    info!("Configuration loaded from environment");

    tokio::fs::create_dir_all(&config.data_dir).await?;
    info!("Staging audio files in {}", config.data_dir.display());

    let db = Database::new(&config.database_url, config.db_max_connections).await?;
    info!("Database connected");

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let state = web::Data::new(AppState::new(db, config, Arc::new(ScpClient)));

    info!("Server running at http://{}", addr);

    HttpServer::new(move || {
        // Any application may call the API; preflight echoes the requested headers
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["DELETE", "GET", "POST", "PUT"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            // Health checks
            .route("/health", web::get().to(health_check))
            .route("/health/db", web::get().to(health_check_db))
            .service(web::scope("/api").configure(create_routes))
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}

// Health check endpoints
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": true }))
}

async fn health_check_db(state: web::Data<AppState>) -> Result<HttpResponse, crate::error::AppError> {
    state.db.ping().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": true })))
}
