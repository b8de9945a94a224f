//! Intake API Library
//!
//! HTTP handlers, middleware and application setup for the upload service.

mod handlers;
mod middleware;
mod utils;

pub mod error;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use middleware::request_id::{RequestId, REQUEST_ID_HEADER};
