//! Repository layer.
//!
//! Data access goes through the [`Repository`] capability trait so handlers
//! depend on behavior, not on a concrete store. One Postgres-backed
//! implementation exists per entity.

use async_trait::async_trait;

pub mod project_repo;

pub use project_repo::ProjectRepository;

/// Generic CRUD capability over one entity table.
#[async_trait]
pub trait Repository {
    type Entity: Send;
    type Id: Send + Copy;
    type Create: Send + Sync;
    type Update: Send + Sync;

    /// Fetch a single entity by primary key.
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Entity>, sqlx::Error>;

    /// Fetch a window of entities.
    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Self::Entity>, sqlx::Error>;

    /// Insert a new entity, returning the stored row.
    async fn create(&self, input: &Self::Create) -> Result<Self::Entity, sqlx::Error>;

    /// Apply a patch. Returns `None` when no row matches `id`.
    async fn update(
        &self,
        id: Self::Id,
        input: &Self::Update,
    ) -> Result<Option<Self::Entity>, sqlx::Error>;

    /// Remove an entity. Returns `true` when a row was deleted.
    async fn delete(&self, id: Self::Id) -> Result<bool, sqlx::Error>;

    /// Whether an entity with this primary key exists.
    async fn exists(&self, id: Self::Id) -> Result<bool, sqlx::Error> {
        Ok(self.get_by_id(id).await?.is_some())
    }
}
