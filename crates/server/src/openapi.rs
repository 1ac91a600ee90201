use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct UsuarioDoc { pub id: i64, pub name: String, pub email: String }

#[derive(ToSchema)]
pub struct ProductoDoc { pub id: i64, pub name: String, pub price: f64, pub usuario_id: Option<i64> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::user::list_usuarios,
        crate::routes::user::create_usuario,
        crate::routes::user::update_usuario,
        crate::routes::user::delete_usuario,
        crate::routes::product::list_productos,
        crate::routes::product::get_producto,
        crate::routes::product::create_producto,
        crate::routes::product::update_producto,
        crate::routes::product::delete_producto,
        crate::routes::product::add_producto,
        crate::routes::product::update_producto_de_usuario,
        crate::routes::product::list_productos_por_usuario,
    ),
    components(
        schemas(
            HealthResponse,
            UsuarioDoc,
            ProductoDoc,
            crate::routes::user::UsuarioInput,
            crate::routes::product::ProductoInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "usuario"),
        (name = "producto")
    )
)]
pub struct ApiDoc;
