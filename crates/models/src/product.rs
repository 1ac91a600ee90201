use sea_orm::{entity::prelude::*, ActiveValue::NotSet, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{db, errors, user};

pub const TABLE: &str = "producto";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "producto")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    /// Owning user, if any.
    pub usuario_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Usuario,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Usuario => Entity::belongs_to(user::Entity)
                .from(Column::UsuarioId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Usuario.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if name.chars().count() > 128 { return Err(errors::ModelError::Validation("name too long (<=128)".into())); }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(errors::ModelError::Validation("price must be a finite number >= 0".into()));
    }
    Ok(())
}

pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_usuario<C: ConnectionTrait>(db: &C, usuario_id: i64) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::UsuarioId.eq(usuario_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Insert, or overwrite every column when `id` is already stored.
pub async fn save<C: ConnectionTrait>(
    db: &C,
    id: Option<i64>,
    name: &str,
    price: f64,
    usuario_id: Option<i64>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_price(price)?;
    if let Some(id) = id {
        if let Some(found) = Entity::find_by_id(id).one(db).await? {
            let mut am: ActiveModel = found.into();
            am.name = Set(name.to_string());
            am.price = Set(price);
            am.usuario_id = Set(usuario_id);
            return Ok(am.update(db).await?);
        }
    }
    let am = ActiveModel {
        id: match id { Some(id) => Set(id), None => NotSet },
        name: Set(name.to_string()),
        price: Set(price),
        usuario_id: Set(usuario_id),
    };
    let created = am.insert(db).await?;
    if id.is_some() {
        db::sync_id_sequence(db, TABLE).await?;
    }
    Ok(created)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
