//! Synapsis Store
//!
//! Persistence around the pipeline:
//! - [`MapStore`]: JSON metadata for rendered maps, newest-first listing, stats
//! - [`Cleaner`]: retention and orphan cleanup, one-shot or on a background thread
//! - [`MapService`]: topic checks, map limit, generation into the data directory
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use synapsis_core::from_fn;
//! use synapsis_store::{MapService, MapStore};
//!
//! let store = Arc::new(MapStore::open("data/mindmaps", 1000)?);
//! let generator = from_fn(|_: &str| Ok("title: Rust".to_string()));
//! let service = MapService::new(generator, store, 1024);
//! let record = service.create_map("Rust")?;
//! println!("{} -> {}", record.id, record.path.display());
//! # Ok::<(), synapsis_store::StoreError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cleanup;
pub mod error;
pub mod record;
pub mod service;
pub mod store;

pub use cleanup::{Cleaner, CleanerHandle};
pub use error::StoreError;
pub use record::{CleanerStatus, CleanupKind, CleanupReport, MapRecord, StoreStats};
pub use service::{MapService, DEFAULT_LIST_LIMIT};
pub use store::{MapStore, METADATA_FILE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
