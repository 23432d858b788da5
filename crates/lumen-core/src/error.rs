//! Error types for the Lumen engines.
use thiserror::Error;

use crate::types::TierId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TierError {
    #[error("invalid tier {tier}: {reason}")] InvalidTier { tier: TierId, reason: String },
    #[error("tier table is empty")] EmptyTable,
    #[error("tier table must start at 0 downloads, first tier {tier} starts at {min}")] NonZeroStart { tier: TierId, min: u64 },
    #[error("gap between {prev} (ends at {prev_max}) and {next} (starts at {next_min})")] Gap { prev: TierId, prev_max: u64, next: TierId, next_min: u64 },
    #[error("overlap between {prev} (ends at {prev_max}) and {next} (starts at {next_min})")] Overlap { prev: TierId, prev_max: u64, next: TierId, next_min: u64 },
    #[error("unbounded tier {0} is not the last tier")] UnboundedNotLast(TierId),
    #[error("last tier {0} must be unbounded")] BoundedLast(TierId),
    #[error("duplicate tier: {0}")] DuplicateTier(TierId),
    #[error("unknown tier: {0}")] UnknownTier(String),
    #[error("download for contributor {event} replayed against {account}")] ForeignEvent { event: String, account: String },
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscountError {
    #[error("invalid discount: {bps} bps is outside 0..=10000")] InvalidDiscount { bps: u64 },
    #[error("invalid discount percent: {0}")] InvalidDiscountPercent(String),
    #[error("unknown plan: {0}")] UnknownPlan(String),
    #[error("duplicate plan: {0}")] DuplicatePlan(String),
    #[error("unknown billing cycle: {0}")] UnknownCycle(String),
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("empty amount")] Empty,
    #[error("invalid amount: {0}")] InvalidAmount(String),
    #[error("more than two fraction digits: {0}")] TooPrecise(String),
    #[error("amount overflow: {0}")] Overflow(String),
}
