//! Watchlists module - domain models, services, and traits.

mod watchlists_model;
mod watchlists_service;
mod watchlists_traits;

pub use watchlists_model::{NewWatchlistItem, WatchlistItem};
pub use watchlists_service::WatchlistService;
pub use watchlists_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
