//! Trait interfaces between the Lumen crates.
//!
//! - [`TierSchedule`]: tier placement and royalty math (lumen-tiers implements)
//! - [`PriceCalculator`]: signup discount pricing (lumen-billing implements)
//!
//! Implementations hold no mutable state. Tier tables, account counters and
//! clocks are always passed in by the caller.

use chrono::{DateTime, Utc};

use crate::error::{DiscountError, TierError};
use crate::money::Money;
use crate::types::{ContributorTier, TierPlacement, TierProgress};

/// Contributor tier resolution and royalty computation.
pub trait TierSchedule: Send + Sync {
    /// Find the tier whose range contains `lifetime_downloads`, plus the one after it.
    ///
    /// `table` must be ordered ascending by `min_lifetime_downloads`. An
    /// unmatched count yields `current: None, next: table.first()`.
    fn resolve_tier(&self, table: &[ContributorTier], lifetime_downloads: u64) -> TierPlacement;

    /// Royalty owed for one qualifying download of an asset priced `asset_price`.
    fn compute_royalty(
        &self,
        tier: &ContributorTier,
        asset_price: Money,
    ) -> Result<Money, TierError>;

    /// Downloads remaining and fractional progress towards `next`.
    fn compute_progress(
        &self,
        current: &ContributorTier,
        next: Option<&ContributorTier>,
        lifetime_downloads: u64,
    ) -> TierProgress;

    /// Resolve the tier in force at `lifetime_downloads` and price one download.
    ///
    /// Returns `Ok(None)` when the count is unranked.
    fn royalty_for_download(
        &self,
        table: &[ContributorTier],
        lifetime_downloads: u64,
        asset_price: Money,
    ) -> Result<Option<(ContributorTier, Money)>, TierError> {
        match self.resolve_tier(table, lifetime_downloads).current {
            Some(tier) => {
                let royalty = self.compute_royalty(&tier, asset_price)?;
                Ok(Some((tier, royalty)))
            }
            None => Ok(None),
        }
    }
}

/// First-period signup discount pricing.
pub trait PriceCalculator: Send + Sync {
    /// Whether an account created at `created_at` still qualifies at `now`.
    fn is_eligible_for_signup_discount(&self, created_at: DateTime<Utc>, now: DateTime<Utc>)
    -> bool;

    /// `original_price` reduced by `discount_bps` when `eligible`.
    fn compute_discounted_price(
        &self,
        original_price: Money,
        discount_bps: u64,
        eligible: bool,
    ) -> Result<Money, DiscountError>;

    /// Eligibility check and discount in one step.
    fn signup_price(
        &self,
        original_price: Money,
        discount_bps: u64,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Money, DiscountError> {
        let eligible = self.is_eligible_for_signup_discount(created_at, now);
        self.compute_discounted_price(original_price, discount_bps, eligible)
    }
}
