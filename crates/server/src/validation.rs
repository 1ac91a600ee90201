//! Request-schema validation run before a handler sees the body.
//!
//! Handlers take [`ValidatedJson<T>`] instead of `Json<T>`: the body is
//! deserialized, then [`Validate::validate`] collects every offending field.
//! Any failure short-circuits with `400 Validation Failed`.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use models::errors::ModelError;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ApiError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

pub trait Validate {
    /// Empty when the value is acceptable.
    fn validate(&self) -> Vec<FieldError>;
}

/// Collects field errors in declaration order.
#[derive(Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self { Self::default() }

    /// A required field; `check` runs only when it is present.
    pub fn required<T>(&mut self, field: &str, value: Option<&T>, check: impl FnOnce(&T) -> Result<(), ModelError>) -> &mut Self
    where
        T: ?Sized,
    {
        match value {
            None => self.errors.push(FieldError::new(field, "must not be null")),
            Some(v) => self.model(field, check(v)),
        }
        self
    }

    /// Optional ids must be positive when given.
    pub fn positive_id(&mut self, field: &str, value: Option<i64>) -> &mut Self {
        if let Some(v) = value {
            if v <= 0 {
                self.errors.push(FieldError::new(field, "must be a positive integer"));
            }
        }
        self
    }

    fn model(&mut self, field: &str, result: Result<(), ModelError>) {
        if let Err(e) = result {
            let message = match e {
                ModelError::Validation(msg) | ModelError::Db(msg) => msg,
            };
            self.errors.push(FieldError::new(field, message));
        }
    }

    pub fn finish(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }
}

/// `Json<T>` that also passes [`Validate`].
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::ValidationFailed(vec![FieldError::new("body", rejection.body_text())]))?;
        let errors = value.validate();
        if !errors.is_empty() {
            return Err(ApiError::ValidationFailed(errors));
        }
        Ok(ValidatedJson(value))
    }
}
