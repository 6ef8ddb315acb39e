//! SQLite storage implementation for marketlens.
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. All other crates are database-agnostic and work with traits:
//! the repository traits defined in `marketlens-core` and the `KvStore`
//! trait defined in `marketlens-market-data`.
//!
//! ```text
//! core (domain)        market-data (governance)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod kv;
pub mod notes;
pub mod watchlists;

// Re-export database utilities
pub use db::{create_pool, get_connection, run_migrations, DbConnection, DbPool};

// Re-export storage errors
pub use errors::StorageError;

// Re-export repositories
pub use kv::SqliteKvStore;
pub use notes::NoteRepository;
pub use watchlists::WatchlistRepository;
