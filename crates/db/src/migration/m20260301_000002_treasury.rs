//! Currencies and the treasury movement journal.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_reference_data::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Currencies {
    Table,
    Id,
    Name,
    Code,
    Balance,
    State,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum TreasuryMovements {
    Table,
    Id,
    CurrencyId,
    Sequence,
    OpenBalance,
    Credit,
    Debit,
    FinalBalance,
    Statement,
    UserId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Currencies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Currencies::Name).string().not_null())
                    .col(ColumnDef::new(Currencies::Code).string_len(8).not_null())
                    .col(
                        ColumnDef::new(Currencies::Balance)
                            .decimal_len(19, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Currencies::State)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Currencies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Currencies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-currencies-code")
                    .table(Currencies::Table)
                    .col(Currencies::Code)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // JOURNAL (append-only)
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TreasuryMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TreasuryMovements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TreasuryMovements::CurrencyId).uuid().not_null())
                    .col(
                        ColumnDef::new(TreasuryMovements::Sequence)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TreasuryMovements::OpenBalance)
                            .decimal_len(19, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TreasuryMovements::Credit)
                            .decimal_len(19, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TreasuryMovements::Debit)
                            .decimal_len(19, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TreasuryMovements::FinalBalance)
                            .decimal_len(19, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TreasuryMovements::Statement).text().not_null())
                    .col(ColumnDef::new(TreasuryMovements::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(TreasuryMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-treasury_movements-currency_id")
                            .from(TreasuryMovements::Table, TreasuryMovements::CurrencyId)
                            .to(Currencies::Table, Currencies::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-treasury_movements-user_id")
                            .from(TreasuryMovements::Table, TreasuryMovements::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-treasury_movements-currency_sequence")
                    .table(TreasuryMovements::Table)
                    .col(TreasuryMovements::CurrencyId)
                    .col(TreasuryMovements::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-treasury_movements-created_at")
                    .table(TreasuryMovements::Table)
                    .col(TreasuryMovements::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TreasuryMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await
    }
}
