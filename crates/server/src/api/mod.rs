pub mod handlers;
pub mod recommend;
pub mod routes;
pub mod tracks;

pub use routes::create_router;

use serde::Serialize;

/// Standard error body for non-2xx API responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
