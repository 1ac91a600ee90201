//! Inputs accepted by the services. Stored rows are the `models` entities.

pub type User = models::user::Model;
pub type Product = models::product::Model;

/// A user to persist. Without `id` the gateway assigns one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDraft {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

/// Fields an update may overwrite on a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserPatch {
    pub name: String,
    pub email: String,
}

/// A product to persist. Without `id` the gateway assigns one.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDraft {
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub usuario_id: Option<i64>,
}

/// Fields an update may overwrite on a product.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductPatch {
    pub name: String,
    pub price: f64,
}

impl From<User> for UserDraft {
    fn from(u: User) -> Self { Self { id: Some(u.id), name: u.name, email: u.email } }
}

impl From<Product> for ProductDraft {
    fn from(p: Product) -> Self { Self { id: Some(p.id), name: p.name, price: p.price, usuario_id: p.usuario_id } }
}
