//! `SeaORM` Entity for debt_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "debt_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub debt_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub movement_id: Uuid,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::debts::Entity",
        from = "Column::DebtId",
        to = "super::debts::Column::Id"
    )]
    Debts,
    #[sea_orm(
        belongs_to = "super::treasury_movements::Entity",
        from = "Column::MovementId",
        to = "super::treasury_movements::Column::Id"
    )]
    TreasuryMovements,
}

impl Related<super::debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debts.def()
    }
}

impl Related<super::treasury_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TreasuryMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
