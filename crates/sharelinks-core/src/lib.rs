//! Shareable links core library
//!
//! Manages capability URLs that grant unauthenticated access to a single
//! item (document, shopping list, to-do, or note) on one device.
//!
//! # Architecture
//!
//! - **LinkStore**: owns the collection; every mutation rewrites it in full
//! - **LinkPersistence**: pluggable read-all / write-all backend
//! - **Clock**: injected time source for all expiry decisions
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = LinkStore::open(
//!     Box::new(FilePersistence::from_config(&config)),
//!     Box::new(SystemClock),
//!     config.store_options(),
//! );
//!
//! let url = store.create_shareable_link("doc-1", ItemType::Document, None)?;
//! if store.validate_link(link_id_from_url(&url)) {
//!     // serve the item
//! }
//! ```
//!
//! # Modules
//!
//! - `store`: link lifecycle operations (main entry point)
//! - `models`: link record and item types
//! - `clock`: system and manual clocks
//! - `id`: link id and share URL generation
//! - `storage`: persisted format and backends
//! - `config`: application configuration

pub mod clock;
pub mod config;
pub mod id;
pub mod models;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use id::{generate_link_id, link_id_from_url, share_url};
pub use models::{ItemType, ParseItemTypeError, ShareableLink};
pub use storage::{FilePersistence, LinkPersistence, MemoryPersistence, StorageError, StorageResult};
pub use store::{LinkStore, ShareError, StoreOptions};
