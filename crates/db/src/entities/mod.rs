//! `SeaORM` entities.

pub mod academic_years;
pub mod courses;
pub mod sea_orm_active_enums;
pub mod students;
pub mod trust_transactions;
pub mod trusts;
