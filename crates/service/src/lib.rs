//! Service layer providing the usuario/producto business rules on top of models.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Ships a SeaORM gateway and an in-process gateway behind the same traits.

pub mod errors;
pub mod domain;
pub mod repository;
pub mod repo;
pub mod user;
pub mod product;
#[cfg(test)]
pub mod test_support;
