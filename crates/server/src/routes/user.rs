use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service::domain::{User, UserDraft, UserPatch};
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::state::ServerState;
use crate::validation::{Checker, FieldError, Validate, ValidatedJson};

/// Body of create and update requests. `id` is ignored on update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UsuarioInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Validate for UsuarioInput {
    fn validate(&self) -> Vec<FieldError> {
        Checker::new()
            .positive_id("id", self.id)
            .required("name", self.name.as_deref(), models::user::validate_name)
            .required("email", self.email.as_deref(), models::user::validate_email)
            .finish()
    }
}

impl UsuarioInput {
    fn into_draft(self) -> UserDraft {
        UserDraft { id: self.id, name: self.name.unwrap_or_default(), email: self.email.unwrap_or_default() }
    }

    fn into_patch(self) -> UserPatch {
        UserPatch { name: self.name.unwrap_or_default(), email: self.email.unwrap_or_default() }
    }
}

#[utoipa::path(
    get, path = "/api/usuario/", tag = "usuario",
    responses((status = 200, description = "All users", body = [crate::openapi::UsuarioDoc]))
)]
pub async fn list_usuarios(State(state): State<ServerState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users().await?))
}

#[utoipa::path(
    post, path = "/api/usuario/", tag = "usuario",
    request_body = UsuarioInput,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UsuarioDoc),
        (status = 400, description = "Usuario ya existe, or validation failed")
    )
)]
pub async fn create_usuario(
    State(state): State<ServerState>,
    ValidatedJson(input): ValidatedJson<UsuarioInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let created = state.users.create_user(input.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/usuario/{id}", tag = "usuario",
    params(("id" = i64, Path, description = "Usuario id")),
    request_body = UsuarioInput,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UsuarioDoc),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Usuario not found")
    )
)]
pub async fn update_usuario(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<UsuarioInput>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.update_user(id, input.into_patch()).await?))
}

#[utoipa::path(
    delete, path = "/api/usuario/{id}", tag = "usuario",
    params(("id" = i64, Path, description = "Usuario id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Usuario not found"))
)]
pub async fn delete_usuario(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.users.delete_user(id).await?;
    Ok(StatusCode::OK)
}
