use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::{
    product::ProductService,
    repo::{InMemoryGateway, SeaOrmProductRepository, SeaOrmUserRepository},
    repository::{ProductRepository, UserRepository},
    user::UserService,
};

pub type UserSvc = UserService<dyn UserRepository>;
pub type ProductSvc = ProductService<dyn ProductRepository, dyn UserRepository>;

/// Services shared by every handler, wired once at start-up.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserSvc>,
    pub products: Arc<ProductSvc>,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self {
            users: Arc::new(UserService::new(Arc::clone(&users))),
            products: Arc::new(ProductService::new(products, users)),
        }
    }

    pub fn seaorm(db: DatabaseConnection) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository { db: db.clone() });
        let products: Arc<dyn ProductRepository> = Arc::new(SeaOrmProductRepository { db });
        Self::new(users, products)
    }

    /// One in-process gateway serving both collections.
    pub fn in_memory() -> Self {
        let gateway = Arc::new(InMemoryGateway::new());
        let users: Arc<dyn UserRepository> = gateway.clone();
        let products: Arc<dyn ProductRepository> = gateway;
        Self::new(users, products)
    }
}
