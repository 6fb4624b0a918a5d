//! HTTP ingress for the issue labeler.
//!
//! # Endpoints
//!
//! - `POST /events` - Processes one notification envelope
//! - `GET /health` - Returns 200 if the server is running

use std::sync::Arc;

pub mod events;
pub mod health;

pub use events::events_handler;
pub use health::health_handler;

use crate::config::MapConfig;
use crate::labeler::Labeler;
use crate::processor::EventProcessor;

/// A labeler shareable across request tasks.
pub type SharedLabeler = Arc<dyn Labeler + Send + Sync>;

/// The processor type the server runs.
pub type SharedProcessor = Arc<EventProcessor<SharedLabeler, MapConfig>>;

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    processor: SharedProcessor,
}

impl AppState {
    pub fn new(processor: EventProcessor<SharedLabeler, MapConfig>) -> Self {
        AppState {
            processor: Arc::new(processor),
        }
    }

    pub fn processor(&self) -> SharedProcessor {
        Arc::clone(&self.processor)
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/events", post(events_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
