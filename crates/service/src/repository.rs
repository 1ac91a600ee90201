use async_trait::async_trait;

use crate::domain::{Product, ProductDraft, User, UserDraft};
use crate::errors::ServiceError;

/// Persistence gateway for users.
///
/// `save` inserts, or overwrites every field when the draft's id is stored.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError>;
    async fn save(&self, user: UserDraft) -> Result<User, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// Persistence gateway for products, including lookup by owning user.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Product>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, ServiceError>;
    async fn find_by_usuario_id(&self, usuario_id: i64) -> Result<Vec<Product>, ServiceError>;
    async fn save(&self, product: ProductDraft) -> Result<Product, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
