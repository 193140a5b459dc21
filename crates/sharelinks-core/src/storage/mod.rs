//! Storage layer
//!
//! Persists the link collection as one blob of JSON text.
//!
//! ## Architecture
//!
//! - **Port**: [`LinkPersistence`] reads and writes the whole collection
//! - **Format**: versioned JSON envelope, see [`format`]
//! - **Backends**: [`FilePersistence`] on disk, [`MemoryPersistence`] in-process

pub mod error;
pub mod format;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use format::FORMAT_VERSION;
pub use persistence::{FilePersistence, LinkPersistence, MemoryPersistence};
