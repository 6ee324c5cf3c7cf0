//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{
    MAX_AMOUNT, MONEY_SCALE, fits_money_scale, format_money, round_money, sum_money,
    within_money_limit,
};
pub use pagination::{PageMeta, PageRequest, PageResponse};
