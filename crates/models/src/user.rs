use sea_orm::{entity::prelude::*, ActiveValue::NotSet, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{db, errors, product};

pub const TABLE: &str = "usuario";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usuario")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Product => Entity::has_many(product::Entity).into() }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Length counts the value as stored, padding included.
pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if name.chars().count() > 128 { return Err(errors::ModelError::Validation("name too long (<=128)".into())); }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if email.chars().count() > 255 { return Err(errors::ModelError::Validation("email too long (<=255)".into())); }
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(errors::ModelError::Validation("invalid email".into())),
    }
}

pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Insert, or overwrite every column when `id` is already stored.
/// A missing `id` lets the store assign one.
pub async fn save<C: ConnectionTrait>(db: &C, id: Option<i64>, name: &str, email: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_email(email)?;
    if let Some(id) = id {
        if let Some(found) = Entity::find_by_id(id).one(db).await? {
            let mut am: ActiveModel = found.into();
            am.name = Set(name.to_string());
            am.email = Set(email.to_string());
            return Ok(am.update(db).await?);
        }
    }
    let am = ActiveModel {
        id: match id { Some(id) => Set(id), None => NotSet },
        name: Set(name.to_string()),
        email: Set(email.to_string()),
    };
    let created = am.insert(db).await?;
    if id.is_some() {
        db::sync_id_sequence(db, TABLE).await?;
    }
    Ok(created)
}

/// Returns whether a row was removed.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
