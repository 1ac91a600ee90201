//! Create `producto` table with an optional FK to `usuario`.
//! Removing a user detaches its products instead of deleting them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Producto::Table)
                    .if_not_exists()
                    .col(big_integer(Producto::Id).auto_increment().primary_key())
                    .col(string_len(Producto::Name, 128).not_null())
                    .col(double(Producto::Price).not_null())
                    .col(
                        ColumnDef::new(Producto::UsuarioId)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_producto_usuario")
                            .from(Producto::Table, Producto::UsuarioId)
                            .to(Usuario::Table, Usuario::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // list-by-owner lookups
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_producto_usuario_id")
                    .table(Producto::Table)
                    .col(Producto::UsuarioId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Producto::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Producto { Table, Id, Name, Price, UsuarioId }

#[derive(DeriveIden)]
enum Usuario { Table, Id }
