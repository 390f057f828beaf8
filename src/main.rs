//! Lectern Server - Library Lending System
//!
//! REST API server for library lending: catalog, accounts, loans.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("lectern_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lectern Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), config.loans.clone());

    // Seed admin account if configured and none exists
    services
        .users
        .ensure_bootstrap_admin(&config.bootstrap)
        .await
        .expect("Failed to bootstrap admin account");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Registration and login
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
        // Authors
        .route("/author/create", post(api::authors::create_author))
        .route("/author/get", get(api::authors::list_authors))
        .route("/author/get/:author_id", get(api::authors::get_author))
        .route("/author/update/:author_id", put(api::authors::update_author))
        .route("/author/delete/:author_id", delete(api::authors::delete_author))
        // Books
        .route("/book/create", post(api::books::create_book))
        .route("/book/get", get(api::books::list_books))
        .route("/book/get/:book_id", get(api::books::get_book))
        .route("/book/update/:book_id", put(api::books::update_book))
        .route("/book/delete/:book_id", delete(api::books::delete_book))
        // Loans
        .route("/book/take/:book_id", post(api::loans::take_book))
        .route("/book/return/:book_id", delete(api::loans::return_book))
        // User administration
        .route("/admin/users/get", get(api::users::list_users))
        .route("/admin/register_new", post(api::users::register_new))
        .route("/admin/update_user/:user_id", put(api::users::update_user))
        // Profile
        .route("/profile/update/", put(api::users::update_my_profile))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    routes
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
