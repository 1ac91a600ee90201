use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service::domain::{Product, ProductDraft, ProductPatch};
use tracing::info;
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::state::ServerState;
use crate::validation::{Checker, FieldError, Validate, ValidatedJson};

/// Body of every producto write. Update paths read only `name` and `price`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProductoInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub usuario_id: Option<i64>,
}

impl Validate for ProductoInput {
    fn validate(&self) -> Vec<FieldError> {
        Checker::new()
            .positive_id("id", self.id)
            .required("name", self.name.as_deref(), models::product::validate_name)
            .required("price", self.price.as_ref(), |p: &f64| models::product::validate_price(*p))
            .positive_id("usuario_id", self.usuario_id)
            .finish()
    }
}

impl ProductoInput {
    fn into_draft(self) -> ProductDraft {
        ProductDraft {
            id: self.id,
            name: self.name.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            usuario_id: self.usuario_id,
        }
    }

    fn into_patch(self) -> ProductPatch {
        ProductPatch { name: self.name.unwrap_or_default(), price: self.price.unwrap_or_default() }
    }
}

#[utoipa::path(
    get, path = "/api/producto/", tag = "producto",
    responses((status = 200, description = "All products", body = [crate::openapi::ProductoDoc]))
)]
pub async fn list_productos(State(state): State<ServerState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.list_products().await?))
}

/// A missing id answers 200 with a `null` body.
#[utoipa::path(
    get, path = "/api/producto/{id}", tag = "producto",
    params(("id" = i64, Path, description = "Producto id")),
    responses((status = 200, description = "The product, or null", body = crate::openapi::ProductoDoc))
)]
pub async fn get_producto(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<Option<Product>>, ApiError> {
    Ok(Json(state.products.get_product(id).await?))
}

#[utoipa::path(
    post, path = "/api/producto/", tag = "producto",
    request_body = ProductoInput,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductoDoc),
        (status = 400, description = "Producto ya existe, or validation failed")
    )
)]
pub async fn create_producto(
    State(state): State<ServerState>,
    ValidatedJson(input): ValidatedJson<ProductoInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let created = state.products.create_product(input.into_draft()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/producto/{id}", tag = "producto",
    params(("id" = i64, Path, description = "Producto id")),
    request_body = ProductoInput,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductoDoc),
        (status = 404, description = "Producto not found")
    )
)]
pub async fn update_producto(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<ProductoInput>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.update_product(id, input.into_patch()).await?))
}

#[utoipa::path(
    delete, path = "/api/producto/{id}", tag = "producto",
    params(("id" = i64, Path, description = "Producto id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Producto not found"))
)]
pub async fn delete_producto(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.products.delete_product(id).await?;
    Ok(StatusCode::OK)
}

/// `id` is resolved against the producto collection; see `ProductService::attach_product_to_user`.
#[utoipa::path(
    post, path = "/api/producto/{id}/productos", tag = "producto",
    params(("id" = i64, Path, description = "Usuario id (looked up among productos)")),
    request_body = ProductoInput,
    responses(
        (status = 200, description = "Saved", body = crate::openapi::ProductoDoc),
        (status = 404, description = "Usuario not found")
    )
)]
pub async fn add_producto(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<ProductoInput>,
) -> Result<Json<Product>, ApiError> {
    let saved = state.products.attach_product_to_user(id, input.into_draft()).await?;
    info!(id, product_id = saved.id, "add_producto");
    Ok(Json(saved))
}

#[utoipa::path(
    put, path = "/api/producto/{id}/productos/{producto_id}", tag = "producto",
    params(
        ("id" = i64, Path, description = "Usuario id"),
        ("producto_id" = i64, Path, description = "Producto id")
    ),
    request_body = ProductoInput,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductoDoc),
        (status = 404, description = "Usuario or Producto not found")
    )
)]
pub async fn update_producto_de_usuario(
    State(state): State<ServerState>,
    Path((id, producto_id)): Path<(i64, i64)>,
    ValidatedJson(input): ValidatedJson<ProductoInput>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.update_product_for_user(id, producto_id, input.into_patch()).await?))
}

#[utoipa::path(
    get, path = "/api/producto/usuario/{usuario_id}", tag = "producto",
    params(("usuario_id" = i64, Path, description = "Owning usuario id")),
    responses((status = 200, description = "Products owned by the usuario", body = [crate::openapi::ProductoDoc]))
)]
pub async fn list_productos_por_usuario(
    State(state): State<ServerState>,
    Path(usuario_id): Path<i64>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.list_products_by_user(usuario_id).await?))
}
