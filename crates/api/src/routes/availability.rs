use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/employees/:id/availability",
            get(handlers::availability::get_availability_today),
        )
        .route(
            "/api/employees/:id/availability/:date",
            get(handlers::availability::get_availability),
        )
}
