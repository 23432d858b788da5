//! # lumen-tiers: Contributor tier and royalty engine.
//!
//! All currency arithmetic is integer-only with banker's rounding.
//!
//! - **Tier resolution**: a lifetime download count maps to the tier whose
//!   inclusive range contains it, plus the next tier up.
//! - **Royalties**: flat per-download amounts take precedence over a
//!   revenue-share percentage of the asset price.
//! - **Table validation**: tier tables must partition `[0, ∞)` with no gaps
//!   or overlaps before they are used.
//! - **Ledger replay**: a batch of downloads is priced at the tier in force
//!   at each download, promoting the contributor as the count grows.

pub mod engine;
pub mod ledger;
pub mod validate;

pub use engine::TierEngine;
pub use ledger::{LedgerEntry, RoyaltyLedger, RoyaltyStatement, TierChange};
pub use validate::validate_tier_table;
