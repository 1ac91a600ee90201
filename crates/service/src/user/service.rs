use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::{User, UserDraft, UserPatch};
use crate::errors::ServiceError;
use crate::repository::UserRepository;

const ENTITY: &str = "Usuario";

/// Usuario business rules over any user gateway.
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All users in storage order.
    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        self.repo.find_all().await
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Create a user; a client-chosen id that is already stored is a conflict.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{domain::UserDraft, repo::InMemoryGateway, user::UserService};
    /// let svc = UserService::new(Arc::new(InMemoryGateway::new()));
    /// let draft = UserDraft { id: Some(5), name: "Ana".into(), email: "ana@x.com".into() };
    /// let user = tokio_test::block_on(svc.create_user(draft.clone())).unwrap();
    /// assert_eq!(user.id, 5);
    /// assert!(tokio_test::block_on(svc.create_user(draft)).is_err());
    /// ```
    #[instrument(skip(self, draft), fields(id = ?draft.id))]
    pub async fn create_user(&self, draft: UserDraft) -> Result<User, ServiceError> {
        if let Some(id) = draft.id {
            if self.repo.exists_by_id(id).await? {
                return Err(ServiceError::already_exists(ENTITY));
            }
        }
        let user = self.repo.save(draft).await?;
        info!(user_id = user.id, "usuario_created");
        Ok(user)
    }

    /// Overwrite `name` and `email`; the id stays.
    #[instrument(skip(self, patch))]
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, ServiceError> {
        let existing = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        let updated = self
            .repo
            .save(UserDraft { id: Some(existing.id), name: patch.name, email: patch.email })
            .await?;
        info!(user_id = id, "usuario_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        self.repo.delete_by_id(existing.id).await?;
        info!(user_id = id, "usuario_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{ProductDraft, UserDraft, UserPatch};
    use crate::errors::ServiceError;
    use crate::test_support::memory_services;

    fn ana(id: i64) -> UserDraft {
        UserDraft { id: Some(id), name: "Ana".into(), email: "ana@x.com".into() }
    }

    #[tokio::test]
    async fn create_twice_conflicts_and_keeps_first() -> Result<(), anyhow::Error> {
        let (users, _) = memory_services();
        users.create_user(ana(5)).await?;

        let second = UserDraft { id: Some(5), name: "Other".into(), email: "other@x.com".into() };
        match users.create_user(second).await {
            Err(ServiceError::Conflict(msg)) => assert_eq!(msg, "Usuario ya existe"),
            other => panic!("expected conflict, got {other:?}"),
        }
        let stored = users.get_user(5).await?.unwrap();
        assert_eq!(stored.name, "Ana");
        Ok(())
    }

    #[tokio::test]
    async fn create_without_id_is_assigned() -> Result<(), anyhow::Error> {
        let (users, _) = memory_services();
        let u = users.create_user(UserDraft { id: None, name: "Bo".into(), email: "bo@x.com".into() }).await?;
        assert_eq!(users.list_users().await?, vec![u]);
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_name_and_email_only() -> Result<(), anyhow::Error> {
        let (users, _) = memory_services();
        users.create_user(ana(1)).await?;
        let updated = users
            .update_user(1, UserPatch { name: "Ana Maria".into(), email: "am@x.com".into() })
            .await?;
        assert_eq!(updated.id, 1);
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.email, "am@x.com");
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let (users, _) = memory_services();
        let err = users
            .update_user(9, UserPatch { name: "X".into(), email: "x@x.com".into() })
            .await
            .unwrap_err();
        match err {
            ServiceError::NotFound(msg) => assert_eq!(msg, "Usuario not found with id 9"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_then_missing() -> Result<(), anyhow::Error> {
        let (users, products) = memory_services();
        users.create_user(ana(2)).await?;
        products
            .create_product(ProductDraft { id: Some(20), name: "Pen".into(), price: 1.0, usuario_id: Some(2) })
            .await?;

        users.delete_user(2).await?;
        assert!(users.get_user(2).await?.is_none());
        assert!(matches!(users.delete_user(2).await, Err(ServiceError::NotFound(_))));
        // owned products survive, detached
        assert_eq!(products.get_product(20).await?.unwrap().usuario_id, None);
        Ok(())
    }
}
