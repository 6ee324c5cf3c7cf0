//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use trustfund_core::ledger::TransactionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "trust_transaction_type")]
pub enum TrustTransactionType {
    #[sea_orm(string_value = "inflow")]
    Inflow,
    #[sea_orm(string_value = "outflow")]
    Outflow,
}

impl From<TransactionKind> for TrustTransactionType {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Inflow => Self::Inflow,
            TransactionKind::Outflow => Self::Outflow,
        }
    }
}

impl From<TrustTransactionType> for TransactionKind {
    fn from(kind: TrustTransactionType) -> Self {
        match kind {
            TrustTransactionType::Inflow => Self::Inflow,
            TrustTransactionType::Outflow => Self::Outflow,
        }
    }
}
