//! Tier engine implementing the [`TierSchedule`] trait.
//!
//! Stateless: the tier table and download counts are supplied per call, so a
//! single engine can be shared across any number of request handlers.

use lumen_core::error::TierError;
use lumen_core::money::Money;
use lumen_core::rounding::mul_bps_half_even;
use lumen_core::traits::TierSchedule;
use lumen_core::types::{ContributorTier, RoyaltyScheme, TierPlacement, TierProgress};
use tracing::{debug, warn};

/// The production tier calculator.
#[derive(Debug, Clone, Default)]
pub struct TierEngine;

impl TierEngine {
    /// Create a new TierEngine.
    pub fn new() -> Self {
        Self
    }
}

impl TierSchedule for TierEngine {
    fn resolve_tier(&self, table: &[ContributorTier], lifetime_downloads: u64) -> TierPlacement {
        match table.iter().position(|t| t.contains(lifetime_downloads)) {
            Some(index) => {
                let current = &table[index];
                debug!(
                    downloads = lifetime_downloads,
                    tier = %current.id,
                    "resolved contributor tier"
                );
                TierPlacement {
                    current: Some(current.clone()),
                    next: table.get(index + 1).cloned(),
                }
            }
            None => {
                warn!(
                    downloads = lifetime_downloads,
                    tiers = table.len(),
                    "download count matches no tier; contributor is unranked"
                );
                TierPlacement {
                    current: None,
                    next: table.first().cloned(),
                }
            }
        }
    }

    fn compute_royalty(
        &self,
        tier: &ContributorTier,
        asset_price: Money,
    ) -> Result<Money, TierError> {
        match tier.royalty_scheme()? {
            RoyaltyScheme::Flat(amount) => Ok(amount),
            RoyaltyScheme::RevenueShare { bps } => mul_bps_half_even(asset_price.cents(), bps)
                .map(Money::from_cents)
                .ok_or(TierError::ArithmeticOverflow),
        }
    }

    fn compute_progress(
        &self,
        _current: &ContributorTier,
        next: Option<&ContributorTier>,
        lifetime_downloads: u64,
    ) -> TierProgress {
        let Some(next) = next else {
            return TierProgress {
                to_next: 0,
                percent: 1.0,
            };
        };

        let threshold = next.min_lifetime_downloads;
        let to_next = threshold.saturating_sub(lifetime_downloads);
        let percent = if threshold > 0 {
            (lifetime_downloads as f64 / threshold as f64).clamp(0.0, 1.0)
        } else {
            1.0
        };

        TierProgress { to_next, percent }
    }
}
