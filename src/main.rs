//! EHS dashboard server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use ehs_dashboard_lib::api;
use ehs_dashboard_lib::auth::{AdminCredentials, SessionKeys};
use ehs_dashboard_lib::config::Config;
use ehs_dashboard_lib::db::DbPool;
use ehs_dashboard_lib::middleware::RequestLogger;
use ehs_dashboard_lib::services::attachments::AttachmentStore;
use ehs_dashboard_lib::services::jsa::JsaService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!(
                "  - In production, DATABASE_URL, EHS_SESSION_SECRET and EHS_ADMIN_PASSWORD must be set"
            );
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  EHS Dashboard Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL, session secret and admin password");
    }

    let attachments = AttachmentStore::new(&config.storage.public_dir);
    tokio::fs::create_dir_all(attachments.dir())
        .await
        .expect("Failed to create attachment directory");

    let pool = DbPool::new(&config.database)
        .await
        .expect("Failed to initialize database");
    info!("Database connection established");

    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    info!("Database migrations complete");

    // Prepare shared state
    let bind_address = config.bind_address();
    let is_development = config.is_development();
    let uploads_dir = config.storage.public_dir.join("uploads");
    let max_upload_size = config.storage.max_upload_size;
    let credentials = AdminCredentials::from_settings(&config.session);
    let session_keys = SessionKeys::from_settings(&config.session, !is_development);
    let jsa_service = JsaService::new(pool.clone(), attachments);

    info!(
        "Attachments stored under {:?} ({}MB max per file)",
        uploads_dir,
        max_upload_size / 1024 / 1024
    );

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let config_data = web::Data::new(config);
    let shutdown_pool = pool.clone();

    // Start HTTP server
    let server = HttpServer::new(move || {
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .supports_credentials()
        } else {
            // Same-origin only in production
            Cors::default()
        };
        let cors = cors
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            // CORS must wrap outermost
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(config_data.clone())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(jsa_service.clone()))
            .app_data(web::Data::new(credentials.clone()))
            .app_data(web::Data::new(session_keys.clone()))
            .service(web::scope("/api/v1").configure(api::configure_api))
            .service(Files::new("/uploads", uploads_dir.clone()))
    });

    let result = server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await;

    if let Err(e) = shutdown_pool.close().await {
        warn!("Failed to close database: {}", e);
    }
    info!("Server stopped");

    result
}
