//! Repository implementations for data access.

pub mod directory;
pub mod ledger;

pub use directory::PgDirectory;
pub use ledger::PgLedgerStore;

use sea_orm::DbErr;
use trustfund_core::ledger::LedgerError;

/// Maps a database error into a ledger storage failure, logging it.
pub(crate) fn storage_error(err: DbErr) -> LedgerError {
    tracing::error!(error = %err, "Database operation failed");
    LedgerError::Storage(err.to_string())
}
