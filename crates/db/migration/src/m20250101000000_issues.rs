use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Issues::Table)
                    .col(pk_id_col(manager, Issues::Id))
                    .col(ColumnDef::new(Issues::Uuid).uuid().not_null())
                    .col(ColumnDef::new(Issues::Project).string().not_null())
                    .col(ColumnDef::new(Issues::IssueTitle).text().not_null())
                    .col(ColumnDef::new(Issues::IssueText).text().not_null())
                    .col(ColumnDef::new(Issues::CreatedBy).string().not_null())
                    .col(text_with_empty_default(Issues::AssignedTo))
                    .col(text_with_empty_default(Issues::StatusText))
                    .col(
                        ColumnDef::new(Issues::Open)
                            .boolean()
                            .not_null()
                            .default(Expr::val(true)),
                    )
                    .col(timestamp_col(Issues::CreatedOn))
                    .col(timestamp_col(Issues::UpdatedOn))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_issues_uuid")
                    .table(Issues::Table)
                    .col(Issues::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_issues_project_created_on")
                    .table(Issues::Table)
                    .col(Issues::Project)
                    .col(Issues::CreatedOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Issues::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn text_with_empty_default<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .text()
        .not_null()
        .default(Expr::val(""))
        .to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum Issues {
    Table,
    Id,
    Uuid,
    Project,
    IssueTitle,
    IssueText,
    CreatedBy,
    AssignedTo,
    StatusText,
    Open,
    CreatedOn,
    UpdatedOn,
}
