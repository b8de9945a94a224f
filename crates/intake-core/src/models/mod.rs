//! Data models for the application
//!
//! Everything here lives for the duration of a single request; the only state
//! that outlives a request is the file bytes written to the storage root.

mod ingest;
mod upload;

pub use ingest::*;
pub use upload::*;
