//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use google_auth::{GoogleAuthOptions, GoogleAuthService};
use sendgrid::{SendGridOptions, SendGridService};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::auth::store::OtpStore;
use crate::domains::auth::JwtService;
use crate::kernel::{
    GoogleAuthAdapter, PgUserStore, SendGridAdapter, ServerDeps, SystemClock,
};
use crate::server::routes::{
    google_login_handler, health_handler, request_otp_handler, verify_otp_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// Wires the vendor services behind their kernel adapters, assembles
/// ServerDeps, and mounts the auth routes plus the health check.
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    let sendgrid = Arc::new(SendGridService::new(SendGridOptions {
        api_key: config.sendgrid_api_key.clone(),
        from_email: config.email_from.clone(),
    }));

    let google = Arc::new(GoogleAuthService::new(GoogleAuthOptions {
        client_id: config.google_client_id.clone(),
    }));

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
    ));

    let deps = Arc::new(ServerDeps::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(SendGridAdapter::new(sendgrid)),
        Arc::new(GoogleAuthAdapter::new(google)),
        jwt_service,
        OtpStore::new(),
        Arc::new(SystemClock),
    ));

    let app_state = AppState {
        db_pool: pool,
        deps,
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/api/auth/request-otp", post(request_otp_handler))
        .route("/api/auth/verify-otp", post(verify_otp_handler))
        .route("/api/auth/google", post(google_login_handler))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
        .layer(cors)
}
