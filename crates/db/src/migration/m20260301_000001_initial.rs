//! Initial database migration.
//!
//! Creates the directory tables (courses, students, academic years) and the
//! trust ledger tables with their constraints and indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: DIRECTORY
        // ============================================================
        db.execute_unprepared(COURSES_SQL).await?;
        db.execute_unprepared(STUDENTS_SQL).await?;
        db.execute_unprepared(ACADEMIC_YEARS_SQL).await?;

        // ============================================================
        // PART 3: TRUST LEDGER
        // ============================================================
        db.execute_unprepared(TRUSTS_SQL).await?;
        db.execute_unprepared(TRUST_TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE trust_transaction_type AS ENUM ('inflow', 'outflow');
";

const COURSES_SQL: &str = r"
CREATE TABLE courses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(200) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_course_name_not_blank CHECK (length(trim(name)) > 0)
);

CREATE INDEX idx_courses_name ON courses(name);
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(200) NOT NULL,
    roll_number VARCHAR(50) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Search-and-select matches on name or roll number
CREATE INDEX idx_students_full_name ON students(lower(full_name));
";

const ACADEMIC_YEARS_SQL: &str = r"
CREATE TABLE academic_years (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE RESTRICT,
    course_id UUID NOT NULL REFERENCES courses(id) ON DELETE RESTRICT,
    session VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_academic_year_student_session UNIQUE (student_id, session)
);

CREATE INDEX idx_academic_years_course ON academic_years(course_id);
";

const TRUSTS_SQL: &str = r"
CREATE TABLE trusts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(200) NOT NULL,
    balance NUMERIC(14, 2) NOT NULL DEFAULT 0,
    details TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_trust_balance_non_negative CHECK (balance >= 0),
    CONSTRAINT chk_trust_name_not_blank CHECK (length(trim(name)) > 0)
);

CREATE INDEX idx_trusts_name ON trusts(name);
";

const TRUST_TRANSACTIONS_SQL: &str = r"
CREATE TABLE trust_transactions (
    id UUID PRIMARY KEY,
    trust_id UUID NOT NULL REFERENCES trusts(id) ON DELETE RESTRICT,
    transaction_type trust_transaction_type NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    balance_after NUMERIC(14, 2) NOT NULL,
    notes TEXT,
    student_id UUID REFERENCES students(id) ON DELETE RESTRICT,
    academic_year_id UUID REFERENCES academic_years(id) ON DELETE RESTRICT,
    course_id UUID REFERENCES courses(id) ON DELETE RESTRICT,
    academic_year_session VARCHAR(20),
    fees_type VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_trust_tx_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_trust_tx_balance_non_negative CHECK (balance_after >= 0),
    -- Outflows carry a full student assignment, inflows carry none
    CONSTRAINT chk_trust_tx_shape CHECK (
        (transaction_type = 'outflow'
            AND student_id IS NOT NULL
            AND academic_year_id IS NOT NULL
            AND fees_type IS NOT NULL)
        OR
        (transaction_type = 'inflow'
            AND student_id IS NULL
            AND academic_year_id IS NULL
            AND course_id IS NULL
            AND academic_year_session IS NULL
            AND fees_type IS NULL)
    )
);

-- List views: newest first, per trust or globally
CREATE INDEX idx_trust_tx_trust_created ON trust_transactions(trust_id, created_at DESC, id DESC);
CREATE INDEX idx_trust_tx_created ON trust_transactions(created_at DESC, id DESC);

-- Course summaries only look at outflows
CREATE INDEX idx_trust_tx_course ON trust_transactions(course_id, created_at DESC)
    WHERE transaction_type = 'outflow';
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS trust_transactions CASCADE;
DROP TABLE IF EXISTS trusts CASCADE;
DROP TABLE IF EXISTS academic_years CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TABLE IF EXISTS courses CASCADE;
DROP TYPE IF EXISTS trust_transaction_type;
";
