//! Gaming Hub game catalog.
//!
//! This crate owns the list of bookable games shown by the Hub front ends.
//! [`CatalogStore`] keeps the catalog in memory and writes through to a
//! REST backend while it is reachable. When the backend fails it degrades
//! to a local JSON snapshot (or a built-in seed set) and says so in its
//! published [`CatalogSnapshot`].
//!
//! # Operations
//!
//! - **Initialize / retry**: load from the remote, else from the snapshot
//! - **Add / update / remove**: validated CRUD with remote/local write-through
//! - **Subscribe**: watch channel carrying every confirmed state change
//! - **Seed remote**: push the sample games to an empty backend
//!
//! The backend's field shape (`name` instead of `title`, numeric ids) never
//! leaves this crate.

pub mod error;
pub mod query;
pub mod remote;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod validation;
mod wire;

// Re-export primary types for convenience.
pub use error::{CatalogError, ErrorInfo, ErrorKind, RemoteError, SnapshotError, ValidationErrors};
pub use query::{CatalogStats, GameFilter};
pub use remote::{DEFAULT_API_BASE_URL, HttpRemote, RemoteFuture, RemoteSource};
pub use snapshot::SnapshotStore;
pub use store::CatalogStore;
pub use types::{
    CatalogSnapshot, Difficulty, GameInput, GameRecord, Mode, RetryReport, SeedReport, Status,
};
