//! # BookSlot API
//!
//! The web server for the BookSlot appointment service: employee
//! availability lookups, booking creation and appointment status changes.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Load data, run the availability engine, shape responses
//! - **Middleware**: Error mapping shared by all handlers
//! - **Config**: Environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling shared by all endpoints
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use bookslot_core::{clock::Clock, engine::MeridiemPolicy};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Zone that opening hours and booking dates are expressed in
    pub timezone: Tz,
    /// How AM/PM markers in stored opening hours are read
    pub meridiem_policy: MeridiemPolicy,
    /// Source of the current instant
    pub clock: Arc<dyn Clock>,
}

impl ApiState {
    /// Wall-clock time in the configured zone.
    pub fn local_now(&self) -> NaiveDateTime {
        self.clock.now().with_timezone(&self.timezone).naive_local()
    }
}

/// Installs the global `tracing` subscriber.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the application router with every endpoint attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability lookups
        .merge(routes::availability::routes())
        // Booking and appointment status endpoints
        .merge(routes::booking::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins))
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use std::sync::Arc;
/// use bookslot_api::{config::ApiConfig, start_server};
/// use bookslot_core::clock::SystemClock;
///
/// let config = ApiConfig::from_env()?;
/// let db_pool = bookslot_db::create_pool(&config.database_url).await?;
/// start_server(config, db_pool, Arc::new(SystemClock)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(
    config: config::ApiConfig,
    db_pool: PgPool,
    clock: Arc<dyn Clock>,
) -> Result<()> {
    let state = Arc::new(ApiState {
        db_pool,
        timezone: config.timezone,
        meridiem_policy: config.meridiem_policy,
        clock,
    });
    info!(
        "Serving availability in {} with {:?} meridiem handling",
        config.timezone, config.meridiem_policy
    );

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
