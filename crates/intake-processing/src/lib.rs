//! Intake Processing Library
//!
//! Validation rules and the ingestion pipeline that turns uploaded files into
//! stored objects.

pub mod ingest;
pub mod validator;

pub use ingest::{IngestError, Ingestor};
pub use validator::{FileValidator, ValidationError};
