mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod mail;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use db::{DBClient, Store};
use dotenv::dotenv;
use mail::sendmail::{Mailer, SmtpMailer};
use routes::create_router;
use service::{
    booking_service::BookingService,
    feedback_service::FeedbackService,
    identity_service::{AuthSettings, IdentityService},
    profile_service::ProfileService,
    vetting_service::VettingService,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub identity_service: IdentityService,
    pub vetting_service: VettingService,
    pub booking_service: BookingService,
    pub profile_service: ProfileService,
    pub feedback_service: FeedbackService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>, env: Config) -> Self {
        AppState {
            identity_service: IdentityService::new(
                store.clone(),
                mailer.clone(),
                AuthSettings::from_config(&env),
            ),
            vetting_service: VettingService::new(store.clone(), mailer.clone()),
            booking_service: BookingService::new(store.clone(), mailer),
            profile_service: ProfileService::new(store.clone()),
            feedback_service: FeedbackService::new(store),
            env,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fixit=debug,tower_http=debug")),
        )
        .init();

    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!("Failed to run migrations: {}", err);
        std::process::exit(1);
    }

    let mailer = match SmtpMailer::new(&config) {
        Ok(mailer) => mailer,
        Err(err) => {
            tracing::error!("Failed to set up the mail transport: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = tokio::fs::create_dir_all(&config.upload_dir).await {
        tracing::error!("Cannot create upload directory {}: {}", config.upload_dir, err);
        std::process::exit(1);
    }

    let app_state = AppState::new(
        Arc::new(DBClient::new(pool)),
        Arc::new(mailer),
        config.clone(),
    );

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        if let Err(err) = app_state.identity_service.ensure_admin(email, password).await {
            tracing::error!("Failed to bootstrap administrator {}: {}", email, err);
            std::process::exit(1);
        }
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT]);

    let app = create_router(Arc::new(app_state)).layer(cors);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Cannot bind port {}: {}", config.port, err);
            std::process::exit(1);
        }
    };

    tracing::info!("Server is running on http://localhost:{}", config.port);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
    }
}
