use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    /// `NotFound` carrying the caller-facing message, e.g. `Usuario not found with id 7`.
    pub fn not_found(entity: &str, id: i64) -> Self { Self::NotFound(format!("{} not found with id {}", entity, id)) }

    pub fn already_exists(entity: &str) -> Self { Self::Conflict(format!("{} ya existe", entity)) }
}
