//! Tier table validation.
//!
//! A usable table partitions `[0, ∞)`: it starts at 0, each tier begins one
//! past the previous tier's maximum, and only the last tier is unbounded.

use std::collections::HashSet;

use lumen_core::constants::BPS_PRECISION;
use lumen_core::error::TierError;
use lumen_core::types::ContributorTier;

/// Check that `table` is ordered, gap-free, overlap-free and fully priced.
pub fn validate_tier_table(table: &[ContributorTier]) -> Result<(), TierError> {
    let first = table.first().ok_or(TierError::EmptyTable)?;
    if first.min_lifetime_downloads != 0 {
        return Err(TierError::NonZeroStart {
            tier: first.id,
            min: first.min_lifetime_downloads,
        });
    }

    let mut seen = HashSet::with_capacity(table.len());
    for tier in table {
        if !seen.insert(tier.id) {
            return Err(TierError::DuplicateTier(tier.id));
        }
        validate_tier(tier)?;
    }

    for pair in table.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let prev_max = prev
            .max_lifetime_downloads
            .ok_or(TierError::UnboundedNotLast(prev.id))?;
        // A tier ending at u64::MAX leaves no room for a successor.
        let expected = prev_max.checked_add(1).ok_or(TierError::Overlap {
            prev: prev.id,
            prev_max,
            next: next.id,
            next_min: next.min_lifetime_downloads,
        })?;

        if next.min_lifetime_downloads > expected {
            return Err(TierError::Gap {
                prev: prev.id,
                prev_max,
                next: next.id,
                next_min: next.min_lifetime_downloads,
            });
        }
        if next.min_lifetime_downloads < expected {
            return Err(TierError::Overlap {
                prev: prev.id,
                prev_max,
                next: next.id,
                next_min: next.min_lifetime_downloads,
            });
        }
    }

    // `first` exists, so `last` does too.
    if let Some(last) = table.last() {
        if last.max_lifetime_downloads.is_some() {
            return Err(TierError::BoundedLast(last.id));
        }
    }

    Ok(())
}

fn validate_tier(tier: &ContributorTier) -> Result<(), TierError> {
    if let Some(max) = tier.max_lifetime_downloads {
        if max < tier.min_lifetime_downloads {
            return Err(TierError::InvalidTier {
                tier: tier.id,
                reason: format!("max {max} is below min {}", tier.min_lifetime_downloads),
            });
        }
    }
    if let Some(bps) = tier.revenue_share_bps {
        if bps > BPS_PRECISION {
            return Err(TierError::InvalidTier {
                tier: tier.id,
                reason: format!("revenue share {bps} bps exceeds {BPS_PRECISION}"),
            });
        }
    }
    tier.royalty_scheme().map(|_| ())
}
