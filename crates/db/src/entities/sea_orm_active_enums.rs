//! `SeaORM` active enums backed by string columns.
//!
//! Stored as plain strings; adding a variant needs no `ALTER TYPE`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use sarraf_core::debt;
use sarraf_shared::types;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtType {
    #[sea_orm(string_value = "TAKEN")]
    Taken,
    #[sea_orm(string_value = "GIVEN")]
    Given,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "PARTIAL")]
    Partial,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "RECEIVED")]
    Received,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "RECEIVED")]
    Received,
}

// ============================================================================
// Conversions to and from domain types
// ============================================================================

impl From<types::RecordState> for RecordState {
    fn from(state: types::RecordState) -> Self {
        match state {
            types::RecordState::Active => Self::Active,
            types::RecordState::Deleted => Self::Deleted,
        }
    }
}

impl From<RecordState> for types::RecordState {
    fn from(state: RecordState) -> Self {
        match state {
            RecordState::Active => Self::Active,
            RecordState::Deleted => Self::Deleted,
        }
    }
}

impl From<debt::DebtType> for DebtType {
    fn from(debt_type: debt::DebtType) -> Self {
        match debt_type {
            debt::DebtType::Taken => Self::Taken,
            debt::DebtType::Given => Self::Given,
        }
    }
}

impl From<DebtType> for debt::DebtType {
    fn from(debt_type: DebtType) -> Self {
        match debt_type {
            DebtType::Taken => Self::Taken,
            DebtType::Given => Self::Given,
        }
    }
}

impl From<debt::DebtStatus> for DebtStatus {
    fn from(status: debt::DebtStatus) -> Self {
        match status {
            debt::DebtStatus::Active => Self::Active,
            debt::DebtStatus::Partial => Self::Partial,
            debt::DebtStatus::Paid => Self::Paid,
            debt::DebtStatus::Received => Self::Received,
        }
    }
}

impl From<DebtStatus> for debt::DebtStatus {
    fn from(status: DebtStatus) -> Self {
        match status {
            DebtStatus::Active => Self::Active,
            DebtStatus::Partial => Self::Partial,
            DebtStatus::Paid => Self::Paid,
            DebtStatus::Received => Self::Received,
        }
    }
}

impl From<debt::PaymentType> for PaymentType {
    fn from(payment_type: debt::PaymentType) -> Self {
        match payment_type {
            debt::PaymentType::Paid => Self::Paid,
            debt::PaymentType::Received => Self::Received,
        }
    }
}
