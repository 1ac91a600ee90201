use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::domain::{Product, ProductDraft, ProductPatch};
use crate::errors::ServiceError;
use crate::repository::{ProductRepository, UserRepository};

const PRODUCTO: &str = "Producto";
const USUARIO: &str = "Usuario";

/// Producto business rules, including association to a usuario.
///
/// Holds the user gateway too, for the user-scoped update.
pub struct ProductService<P: ProductRepository + ?Sized, U: UserRepository + ?Sized> {
    products: Arc<P>,
    users: Arc<U>,
}

impl<P: ProductRepository + ?Sized, U: UserRepository + ?Sized> ProductService<P, U> {
    pub fn new(products: Arc<P>, users: Arc<U>) -> Self { Self { products, users } }

    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.products.find_all().await
    }

    /// Unlike every other lookup, a missing id is `Ok(None)` rather than `NotFound`.
    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, ServiceError> {
        self.products.find_by_id(id).await
    }

    #[instrument(skip(self, draft), fields(id = ?draft.id))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        if let Some(id) = draft.id {
            if self.products.exists_by_id(id).await? {
                return Err(ServiceError::already_exists(PRODUCTO));
            }
        }
        let created = self.products.save(draft).await?;
        info!(product_id = created.id, "producto_created");
        Ok(created)
    }

    /// Overwrite `name` and `price`; id and owner stay.
    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, id: i64, patch: ProductPatch) -> Result<Product, ServiceError> {
        let existing = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(PRODUCTO, id))?;
        let updated = self
            .products
            .save(ProductDraft { name: patch.name, price: patch.price, ..ProductDraft::from(existing) })
            .await?;
        info!(product_id = id, "producto_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(PRODUCTO, id))?;
        self.products.delete_by_id(existing.id).await?;
        info!(product_id = id, "producto_deleted");
        Ok(())
    }

    pub async fn list_products_by_user(&self, usuario_id: i64) -> Result<Vec<Product>, ServiceError> {
        self.products.find_by_usuario_id(usuario_id).await
    }

    /// Save `draft` under the owner of the *product* stored at `usuario_id`.
    ///
    /// The id is looked up in the product collection, not the user one, and
    /// the found product's owner (possibly none) is copied onto the draft.
    /// A miss is reported as a missing usuario.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{domain::ProductDraft, product::ProductService, repo::InMemoryGateway};
    /// let gw = Arc::new(InMemoryGateway::new());
    /// let svc = ProductService::new(gw.clone(), gw);
    /// let anchor = ProductDraft { id: Some(1), name: "Pen".into(), price: 1.0, usuario_id: Some(42) };
    /// tokio_test::block_on(svc.create_product(anchor)).unwrap();
    /// let draft = ProductDraft { id: Some(2), name: "Ink".into(), price: 2.0, usuario_id: None };
    /// let saved = tokio_test::block_on(svc.attach_product_to_user(1, draft)).unwrap();
    /// assert_eq!(saved.usuario_id, Some(42));
    /// ```
    #[instrument(skip(self, draft), fields(product_id = ?draft.id))]
    pub async fn attach_product_to_user(&self, usuario_id: i64, mut draft: ProductDraft) -> Result<Product, ServiceError> {
        let anchor = self
            .products
            .find_by_id(usuario_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(USUARIO, usuario_id))?;
        draft.usuario_id = anchor.usuario_id;
        let saved = self.products.save(draft).await?;
        info!(product_id = saved.id, usuario_id = ?saved.usuario_id, "producto_attached");
        Ok(saved)
    }

    /// `update_product` guarded by the usuario existing in the user collection.
    #[instrument(skip(self, patch))]
    pub async fn update_product_for_user(
        &self,
        usuario_id: i64,
        product_id: i64,
        patch: ProductPatch,
    ) -> Result<Product, ServiceError> {
        if !self.users.exists_by_id(usuario_id).await? {
            return Err(ServiceError::not_found(USUARIO, usuario_id));
        }
        self.update_product(product_id, patch).await
    }

    /// Create-or-keep by id. Not routed.
    ///
    /// On an id collision the stored record is re-saved as is (its id set to
    /// itself) and the candidate's other fields are discarded. Otherwise the
    /// candidate is persisted.
    #[instrument(skip(self, candidate), fields(id = ?candidate.id))]
    pub async fn save_product(&self, candidate: ProductDraft) -> Result<Product, ServiceError> {
        if let Some(id) = candidate.id {
            if self.products.exists_by_id(id).await? {
                if let Some(mut existing) = self.products.find_by_id(id).await? {
                    existing.id = id;
                    debug!(product_id = id, "save_product kept stored record");
                    return self.products.save(existing.into()).await;
                }
            }
        }
        self.products.save(candidate).await
    }
}
