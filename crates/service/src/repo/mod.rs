//! Gateway implementations of the repository traits.

pub mod memory;
pub mod seaorm;

pub use memory::InMemoryGateway;
pub use seaorm::{SeaOrmProductRepository, SeaOrmUserRepository};
