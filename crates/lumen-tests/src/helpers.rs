//! Shared test helpers for integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use lumen_core::money::Money;
use lumen_core::types::{ContributorTier, DownloadEvent, TierId};

/// The three-tier table used in the documented pricing scenarios:
/// bronze 0–100 at 40%, silver 101–500 at 45%, gold 501+ at 50%.
pub fn scenario_table() -> Vec<ContributorTier> {
    vec![
        ContributorTier::revenue_share(TierId::Bronze, 0, Some(100), 4_000),
        ContributorTier::revenue_share(TierId::Silver, 101, Some(500), 4_500),
        ContributorTier::revenue_share(TierId::Gold, 501, None, 5_000),
    ]
}

/// Build a contiguous table from tier widths; the last tier is unbounded.
///
/// `widths[i]` is the number of download counts covered by tier `i`
/// (must be non-zero). `shares` supplies one rate per tier.
pub fn contiguous_table(widths: &[u64], shares: &[u64]) -> Vec<ContributorTier> {
    let mut table = Vec::with_capacity(widths.len() + 1);
    let mut min = 0u64;
    for (i, width) in widths.iter().enumerate() {
        let max = min + width - 1;
        table.push(ContributorTier::revenue_share(TierId::ALL[i], min, Some(max), shares[i]));
        min = max + 1;
    }
    let last = widths.len();
    table.push(ContributorTier::revenue_share(TierId::ALL[last], min, None, shares[last]));
    table
}

/// Fixed reference instant for time-based tests.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
}

/// A completed, paying download `minutes` after [`epoch`].
pub fn download(contributor: &str, asset: &str, price_cents: u64, minutes: i64) -> DownloadEvent {
    DownloadEvent::completed(
        asset,
        contributor,
        Money::from_cents(price_cents),
        epoch() + Duration::minutes(minutes),
    )
}
