use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::{product, user};

use crate::domain::{Product, ProductDraft, User, UserDraft};
use crate::errors::ServiceError;
use crate::repository::{ProductRepository, UserRepository};

/// SeaORM-backed user repository.
#[derive(Clone)]
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        Ok(user::find_all(&self.db).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        Ok(user::find(&self.db, id).await?)
    }

    async fn save(&self, draft: UserDraft) -> Result<User, ServiceError> {
        Ok(user::save(&self.db, draft.id, &draft.name, &draft.email).await?)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(user::delete(&self.db, id).await?)
    }
}

#[derive(Clone)]
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(product::find_all(&self.db).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, ServiceError> {
        Ok(product::find(&self.db, id).await?)
    }

    async fn find_by_usuario_id(&self, usuario_id: i64) -> Result<Vec<Product>, ServiceError> {
        Ok(product::find_by_usuario(&self.db, usuario_id).await?)
    }

    async fn save(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        Ok(product::save(&self.db, draft.id, &draft.name, draft.price, draft.usuario_id).await?)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(product::delete(&self.db, id).await?)
    }
}
