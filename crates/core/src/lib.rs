//! Core trust ledger logic for Trustfund.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; storage
//! backends plug in through the [`ledger::LedgerStore`] and
//! [`directory::Directory`] traits.
//!
//! # Modules
//!
//! - `ledger` - Trust balances, inflow/outflow enforcement and recording
//! - `directory` - Read-only student, course and enrollment lookups
//! - `reports` - Filtering and aggregation over the transaction log
//! - `clock` - Server-side time source for recorded transactions

pub mod clock;
pub mod directory;
pub mod ledger;
pub mod reports;
