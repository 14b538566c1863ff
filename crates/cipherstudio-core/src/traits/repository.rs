//! Generic repository trait for metadata record access.

use async_trait::async_trait;

use crate::result::AppResult;

/// Generic CRUD repository trait.
///
/// Each entity gets a strongly typed repository through the type
/// parameters. Entity-specific queries are defined on sub-traits in
/// `cipherstudio-database`.
#[async_trait]
pub trait Repository<Entity, Id>: Send + Sync + std::fmt::Debug + 'static
where
    Entity: Send + Sync + 'static + serde::Serialize,
    Id: Send + Sync + 'static,
{
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: &Id) -> AppResult<Option<Entity>>;

    /// Insert a fully formed entity and return the stored version.
    async fn insert(&self, entity: &Entity) -> AppResult<Entity>;

    /// Update an existing entity and return the stored version.
    async fn update(&self, entity: &Entity) -> AppResult<Entity>;

    /// Delete an entity by its primary key. Returns `true` if deleted.
    async fn delete(&self, id: &Id) -> AppResult<bool>;
}
