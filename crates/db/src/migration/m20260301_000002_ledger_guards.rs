//! Ledger guard triggers.
//!
//! Makes the transaction log append-only and trusts undeletable at the
//! database level, independent of application code.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(GUARDS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_GUARDS_SQL).await?;
        Ok(())
    }
}

const GUARDS_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_trust_transaction_mutation
-- Trust transactions are immutable once recorded
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_trust_transaction_mutation()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Trust transactions are immutable: % rejected', TG_OP;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_trust_tx_immutable
BEFORE UPDATE OR DELETE ON trust_transactions
FOR EACH ROW
EXECUTE FUNCTION prevent_trust_transaction_mutation();

CREATE TRIGGER trg_trust_tx_no_truncate
BEFORE TRUNCATE ON trust_transactions
FOR EACH STATEMENT
EXECUTE FUNCTION prevent_trust_transaction_mutation();

-- ============================================================
-- FUNCTION: prevent_trust_deletion
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_trust_deletion()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Trusts cannot be deleted';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_trust_no_delete
BEFORE DELETE ON trusts
FOR EACH ROW
EXECUTE FUNCTION prevent_trust_deletion();
";

const DROP_GUARDS_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_trust_no_delete ON trusts;
DROP TRIGGER IF EXISTS trg_trust_tx_no_truncate ON trust_transactions;
DROP TRIGGER IF EXISTS trg_trust_tx_immutable ON trust_transactions;
DROP FUNCTION IF EXISTS prevent_trust_deletion();
DROP FUNCTION IF EXISTS prevent_trust_transaction_mutation();
";
