//! HTTP adapter - webhook endpoints and the health check.

mod dto;
mod handlers;
mod routes;
mod state;

pub use dto::ErrorResponse;
pub use handlers::WebhookApiError;
pub use routes::app_router;
pub use state::AppState;
