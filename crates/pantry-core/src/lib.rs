//! pantry-core library.
//!
//! # Conventions
//!
//! - **Errors**: module-level `thiserror` enums carrying an [`error::ErrorCode`];
//!   `anyhow::Result` only for config loading.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`). Every
//!   recovered fallback is logged at `warn`.

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod query;
pub mod store;

pub use model::{Item, ItemId, NewItem, StoredItem};
pub use query::{CategoryFilter, SortMode, ViewQuery};
pub use store::Store;
