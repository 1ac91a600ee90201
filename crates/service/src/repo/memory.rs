use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use models::{product, user};

use crate::domain::{Product, ProductDraft, User, UserDraft};
use crate::errors::ServiceError;
use crate::repository::{ProductRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    products: BTreeMap<i64, Product>,
    next_user_id: i64,
    next_product_id: i64,
}

/// In-process gateway holding both collections behind one lock.
///
/// Mirrors the SQL schema: ids ascend, store-assigned ids never reuse a
/// client-chosen one, and deleting a user detaches its products.
#[derive(Default)]
pub struct InMemoryGateway {
    tables: RwLock<Tables>,
}

impl InMemoryGateway {
    pub fn new() -> Self { Self::default() }
}

/// Pick the id for an insert and advance the sequence past it.
///
/// Once an id of `i64::MAX` is stored the sequence is exhausted, like a
/// Postgres `BIGSERIAL` after `setval` to its maximum.
fn assign_id<V>(next: &mut i64, rows: &BTreeMap<i64, V>, requested: Option<i64>) -> Result<i64, ServiceError> {
    let id = match requested {
        Some(id) => id,
        None => {
            let candidate = (*next).max(1);
            if rows.contains_key(&candidate) {
                return Err(ServiceError::Db("id sequence exhausted".into()));
            }
            candidate
        }
    };
    *next = (*next).max(id.saturating_add(1));
    Ok(id)
}

#[async_trait]
impl UserRepository for InMemoryGateway {
    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.users.get(&id).cloned())
    }

    async fn save(&self, draft: UserDraft) -> Result<User, ServiceError> {
        user::validate_name(&draft.name)?;
        user::validate_email(&draft.email)?;
        let mut t = self.tables.write().await;
        let id = match draft.id {
            Some(id) if t.users.contains_key(&id) => id,
            requested => {
                let Tables { users, next_user_id, .. } = &mut *t;
                assign_id(next_user_id, users, requested)?
            }
        };
        let row = User { id, name: draft.name, email: draft.email };
        t.users.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let mut t = self.tables.write().await;
        if t.users.remove(&id).is_none() {
            return Ok(false);
        }
        for p in t.products.values_mut().filter(|p| p.usuario_id == Some(id)) {
            p.usuario_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryGateway {
    async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.products.get(&id).cloned())
    }

    async fn find_by_usuario_id(&self, usuario_id: i64) -> Result<Vec<Product>, ServiceError> {
        let t = self.tables.read().await;
        Ok(t.products.values().filter(|p| p.usuario_id == Some(usuario_id)).cloned().collect())
    }

    // The owning-user reference is stored as given; no existence check.
    async fn save(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        product::validate_name(&draft.name)?;
        product::validate_price(draft.price)?;
        let mut t = self.tables.write().await;
        let id = match draft.id {
            Some(id) if t.products.contains_key(&id) => id,
            requested => {
                let Tables { products, next_product_id, .. } = &mut *t;
                assign_id(next_product_id, products, requested)?
            }
        };
        let row = Product { id, name: draft.name, price: draft.price, usuario_id: draft.usuario_id };
        t.products.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let mut t = self.tables.write().await;
        Ok(t.products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen(id: Option<i64>, usuario_id: Option<i64>) -> ProductDraft {
        ProductDraft { id, name: "Pen".into(), price: 1.5, usuario_id }
    }

    #[tokio::test]
    async fn assigned_ids_skip_client_chosen_ones() {
        let g = InMemoryGateway::new();
        let a = UserRepository::save(&g, UserDraft { id: None, name: "A".into(), email: "a@x.com".into() }).await.unwrap();
        assert_eq!(a.id, 1);
        let b = UserRepository::save(&g, UserDraft { id: Some(7), name: "B".into(), email: "b@x.com".into() }).await.unwrap();
        assert_eq!(b.id, 7);
        let c = UserRepository::save(&g, UserDraft { id: None, name: "C".into(), email: "c@x.com".into() }).await.unwrap();
        assert_eq!(c.id, 8);
    }

    #[tokio::test]
    async fn max_id_exhausts_sequence_without_overwriting() {
        let g = InMemoryGateway::new();
        let top = UserRepository::save(&g, UserDraft { id: Some(i64::MAX), name: "A".into(), email: "a@x.com".into() })
            .await
            .unwrap();
        assert_eq!(top.id, i64::MAX);

        let err = UserRepository::save(&g, UserDraft { id: None, name: "B".into(), email: "b@x.com".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
        assert_eq!(UserRepository::find_by_id(&g, i64::MAX).await.unwrap(), Some(top));

        // explicit ids below the top still insert
        let low = UserRepository::save(&g, UserDraft { id: Some(2), name: "C".into(), email: "c@x.com".into() }).await.unwrap();
        assert_eq!(low.id, 2);
    }

    #[tokio::test]
    async fn save_overwrites_existing_row() {
        let g = InMemoryGateway::new();
        ProductRepository::save(&g, pen(Some(3), Some(1))).await.unwrap();
        let again = ProductRepository::save(&g, ProductDraft { id: Some(3), name: "Ink".into(), price: 9.0, usuario_id: None })
            .await
            .unwrap();
        assert_eq!(again, Product { id: 3, name: "Ink".into(), price: 9.0, usuario_id: None });
        assert_eq!(ProductRepository::find_all(&g).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_user_detaches_products() {
        let g = InMemoryGateway::new();
        UserRepository::save(&g, UserDraft { id: Some(1), name: "A".into(), email: "a@x.com".into() }).await.unwrap();
        ProductRepository::save(&g, pen(Some(10), Some(1))).await.unwrap();
        assert_eq!(g.find_by_usuario_id(1).await.unwrap().len(), 1);

        assert!(UserRepository::delete_by_id(&g, 1).await.unwrap());
        assert!(!UserRepository::delete_by_id(&g, 1).await.unwrap());
        assert!(g.find_by_usuario_id(1).await.unwrap().is_empty());
        let kept = ProductRepository::find_by_id(&g, 10).await.unwrap().unwrap();
        assert_eq!(kept.usuario_id, None);
    }

    #[tokio::test]
    async fn save_applies_model_validation() {
        let g = InMemoryGateway::new();
        let err = ProductRepository::save(&g, ProductDraft { id: None, name: " ".into(), price: 1.0, usuario_id: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Model(models::errors::ModelError::Validation(_))));
        assert!(ProductRepository::find_all(&g).await.unwrap().is_empty());
    }
}
