//! Storage layer for the current state of every animal.
//!
//! Each animal has exactly one row; updates overwrite it in place. The
//! default implementation ([`store::AnimalStore`]) uses SeaORM on SQLite
//! in WAL mode so the read API and the simulator can work concurrently.

pub mod entities;
pub mod error;
pub mod store;


use async_trait::async_trait;
use farmsense_common::types::{AnimalRecord, AnimalUpdate, NewAnimal};

pub use error::{Result, StorageError};
pub use store::AnimalStore;

/// Persistence backend for animal records.
///
/// Implementations must be safe to share across threads (`Send + Sync`)
/// because the store is used from HTTP handlers and the simulation
/// scheduler concurrently.
#[async_trait]
pub trait AnimalRepository: Send + Sync {
    /// Returns every stored animal, ordered by display id then id.
    async fn list_animals(&self) -> Result<Vec<AnimalRecord>>;

    /// Looks up a single animal by its stable id.
    async fn get_animal(&self, id: &str) -> Result<Option<AnimalRecord>>;

    /// Looks up the first animal carrying the given display id.
    async fn find_by_display_id(&self, display_id: &str) -> Result<Option<AnimalRecord>>;

    /// Creates an animal, assigning a fresh id and `last_updated`.
    async fn insert_animal(&self, animal: &NewAnimal) -> Result<AnimalRecord>;

    /// Applies a partial update and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no animal has the given id.
    async fn update_animal(&self, id: &str, update: &AnimalUpdate) -> Result<AnimalRecord>;

    /// Returns the number of stored animals.
    async fn count_animals(&self) -> Result<u64>;
}
