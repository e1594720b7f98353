//! Debts and their payments.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_reference_data::Users;
use super::m20260301_000002_treasury::{Currencies, TreasuryMovements};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Debts {
    Table,
    Id,
    DebtType,
    DebtorName,
    DebtorPhone,
    CurrencyId,
    Amount,
    PaidAmount,
    RemainingAmount,
    Status,
    Description,
    UserId,
    State,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DebtPayments {
    Table,
    Id,
    DebtId,
    Amount,
    PaymentType,
    MovementId,
    Description,
    UserId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Debts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Debts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Debts::DebtType).string_len(16).not_null())
                    .col(ColumnDef::new(Debts::DebtorName).string().not_null())
                    .col(ColumnDef::new(Debts::DebtorPhone).string_len(32).null())
                    .col(ColumnDef::new(Debts::CurrencyId).uuid().not_null())
                    .col(ColumnDef::new(Debts::Amount).decimal_len(19, 4).not_null())
                    .col(ColumnDef::new(Debts::PaidAmount).decimal_len(19, 4).not_null())
                    .col(
                        ColumnDef::new(Debts::RemainingAmount)
                            .decimal_len(19, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Debts::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Debts::Description).text().null())
                    .col(ColumnDef::new(Debts::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Debts::State)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Debts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Debts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debts-currency_id")
                            .from(Debts::Table, Debts::CurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debts-user_id")
                            .from(Debts::Table, Debts::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-debts-status")
                    .table(Debts::Table)
                    .col(Debts::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DebtPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DebtPayments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DebtPayments::DebtId).uuid().not_null())
                    .col(
                        ColumnDef::new(DebtPayments::Amount)
                            .decimal_len(19, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DebtPayments::PaymentType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DebtPayments::MovementId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DebtPayments::Description).text().null())
                    .col(ColumnDef::new(DebtPayments::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(DebtPayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debt_payments-debt_id")
                            .from(DebtPayments::Table, DebtPayments::DebtId)
                            .to(Debts::Table, Debts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debt_payments-movement_id")
                            .from(DebtPayments::Table, DebtPayments::MovementId)
                            .to(TreasuryMovements::Table, TreasuryMovements::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DebtPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Debts::Table).to_owned())
            .await
    }
}
