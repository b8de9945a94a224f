//! Intake Storage Library
//!
//! This crate provides the `Storage` trait and its local filesystem
//! implementation.
//!
//! # Layout
//!
//! The storage root is a flat directory. Every object is named
//! `{uuid}{original extension}` (see [`keys::generate_stored_name`]); no
//! metadata is stored next to the bytes. Names must not contain path
//! separators, `..`, or start with `.` (hidden names are reserved for
//! in-flight temp files).

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::generate_stored_name;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
