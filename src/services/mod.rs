// Service exports
pub mod cache;
pub mod inventory;
pub mod postgres;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats, CachedInventory};
pub use inventory::{InventoryReader, LeadStore, SessionLog, StoreError};
pub use postgres::{PostgresClient, PostgresError};
