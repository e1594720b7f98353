//! Buys, sales and their bill counters.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_reference_data::{Customers, Users};
use super::m20260301_000002_treasury::Currencies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum BillSequences {
    Table,
    Series,
    LastValue,
}

/// Column set shared by `buys` and `sales`.
#[derive(Iden)]
enum Trade {
    Id,
    BillNumber,
    CustomerId,
    CurrencyId,
    Value,
    Price,
    TotalPrice,
    PaymentCurrencyId,
    UserId,
    State,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum Buys {
    Table,
}

#[derive(Iden, Clone, Copy)]
enum Sales {
    Table,
}

fn trade_table(table: impl IntoIden + Copy + 'static, prefix: &str) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(Trade::Id).uuid().not_null().primary_key())
        .col(
            ColumnDef::new(Trade::BillNumber)
                .big_integer()
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Trade::CustomerId).uuid().not_null())
        .col(ColumnDef::new(Trade::CurrencyId).uuid().not_null())
        .col(ColumnDef::new(Trade::Value).decimal_len(19, 4).not_null())
        .col(ColumnDef::new(Trade::Price).decimal_len(19, 4).not_null())
        .col(ColumnDef::new(Trade::TotalPrice).decimal_len(19, 4).not_null())
        .col(ColumnDef::new(Trade::PaymentCurrencyId).uuid().not_null())
        .col(ColumnDef::new(Trade::UserId).uuid().not_null())
        .col(
            ColumnDef::new(Trade::State)
                .string_len(16)
                .not_null()
                .default("active"),
        )
        .col(
            ColumnDef::new(Trade::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk-{prefix}-customer_id"))
                .from(table, Trade::CustomerId)
                .to(Customers::Table, Customers::Id),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk-{prefix}-currency_id"))
                .from(table, Trade::CurrencyId)
                .to(Currencies::Table, Currencies::Id),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk-{prefix}-payment_currency_id"))
                .from(table, Trade::PaymentCurrencyId)
                .to(Currencies::Table, Currencies::Id),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk-{prefix}-user_id"))
                .from(table, Trade::UserId)
                .to(Users::Table, Users::Id),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BillSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BillSequences::Series)
                            .string_len(16)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BillSequences::LastValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(BillSequences::Table)
            .columns([BillSequences::Series, BillSequences::LastValue])
            .values(["BUY".into(), 0i64.into()])
            .map_err(|e| DbErr::Migration(e.to_string()))?
            .values(["SALE".into(), 0i64.into()])
            .map_err(|e| DbErr::Migration(e.to_string()))?
            .to_owned();
        manager.exec_stmt(seed).await?;

        manager.create_table(trade_table(Buys::Table, "buys")).await?;
        manager.create_table(trade_table(Sales::Table, "sales")).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Buys::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BillSequences::Table).to_owned())
            .await
    }
}
