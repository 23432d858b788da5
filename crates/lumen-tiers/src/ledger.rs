//! Royalty ledger replay.
//!
//! Prices a batch of download events for one contributor in timestamp order.
//! Each qualifying download is charged at the tier in force *before* it is
//! counted, then the lifetime count advances by one. Previews, incomplete
//! downloads and non-paying downloads neither earn nor count.

use chrono::{DateTime, Utc};
use lumen_core::error::TierError;
use lumen_core::money::Money;
use lumen_core::traits::TierSchedule;
use lumen_core::types::{ContributorAccount, ContributorTier, DownloadEvent, TierId};
use serde::Serialize;
use tracing::{debug, info, warn};

/// One priced download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub asset_id: String,
    pub timestamp: DateTime<Utc>,
    /// Tier at the time of download; `None` if the contributor was unranked.
    pub tier: Option<TierId>,
    pub asset_price: Money,
    pub royalty: Money,
    /// Lifetime count after this download was recorded.
    pub lifetime_downloads: u64,
}

/// A promotion (or a move into/out of the unranked state) during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierChange {
    /// Lifetime count at which the new tier took effect.
    pub at_downloads: u64,
    pub from: Option<TierId>,
    pub to: Option<TierId>,
}

/// Outcome of replaying a batch against a contributor account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoyaltyStatement {
    pub contributor_id: String,
    pub starting_downloads: u64,
    pub ending_downloads: u64,
    pub entries: Vec<LedgerEntry>,
    pub skipped: usize,
    pub total: Money,
    pub tier_changes: Vec<TierChange>,
}

impl RoyaltyStatement {
    /// The contributor's account snapshot after the replay.
    pub fn closing_account(&self) -> ContributorAccount {
        ContributorAccount::new(self.contributor_id.clone(), self.ending_downloads)
    }
}

/// Replays downloads against a tier table using a [`TierSchedule`].
pub struct RoyaltyLedger<'a, S: TierSchedule + ?Sized> {
    schedule: &'a S,
    table: &'a [ContributorTier],
}

impl<'a, S: TierSchedule + ?Sized> RoyaltyLedger<'a, S> {
    pub fn new(schedule: &'a S, table: &'a [ContributorTier]) -> Self {
        Self { schedule, table }
    }

    /// Price `events` for `account`, returning the statement and closing count.
    ///
    /// Events are ordered by timestamp (stable for equal timestamps). Every
    /// event must belong to `account`.
    pub fn replay(
        &self,
        account: &ContributorAccount,
        events: &[DownloadEvent],
    ) -> Result<RoyaltyStatement, TierError> {
        if let Some(foreign) = events.iter().find(|e| e.contributor_id != account.id) {
            return Err(TierError::ForeignEvent {
                event: foreign.contributor_id.clone(),
                account: account.id.clone(),
            });
        }

        let mut ordered: Vec<&DownloadEvent> = events.iter().collect();
        ordered.sort_by_key(|e| e.timestamp);

        let mut downloads = account.lifetime_download_count;
        let mut current = self.schedule.resolve_tier(self.table, downloads).current;
        let mut entries = Vec::new();
        let mut tier_changes = Vec::new();
        let mut skipped = 0usize;
        let mut total = Money::ZERO;

        for event in ordered {
            if !event.qualifies_for_royalty() {
                debug!(asset = %event.asset_id, "skipping non-qualifying download");
                skipped += 1;
                continue;
            }

            let royalty = match &current {
                Some(tier) => self.schedule.compute_royalty(tier, event.asset_price)?,
                None => {
                    warn!(
                        contributor = %account.id,
                        downloads,
                        "unranked contributor download earns no royalty"
                    );
                    Money::ZERO
                }
            };

            downloads = downloads.checked_add(1).ok_or(TierError::ArithmeticOverflow)?;
            total = total.checked_add(royalty).ok_or(TierError::ArithmeticOverflow)?;

            entries.push(LedgerEntry {
                asset_id: event.asset_id.clone(),
                timestamp: event.timestamp,
                tier: current.as_ref().map(|t| t.id),
                asset_price: event.asset_price,
                royalty,
                lifetime_downloads: downloads,
            });

            let stays = current.as_ref().is_some_and(|t| t.contains(downloads));
            if !stays {
                let next = self.schedule.resolve_tier(self.table, downloads).current;
                let from = current.as_ref().map(|t| t.id);
                let to = next.as_ref().map(|t| t.id);
                if from != to {
                    info!(
                        contributor = %account.id,
                        downloads,
                        from = ?from,
                        to = ?to,
                        "contributor tier changed"
                    );
                    tier_changes.push(TierChange {
                        at_downloads: downloads,
                        from,
                        to,
                    });
                }
                current = next;
            }
        }

        Ok(RoyaltyStatement {
            contributor_id: account.id.clone(),
            starting_downloads: account.lifetime_download_count,
            ending_downloads: downloads,
            entries,
            skipped,
            total,
            tier_changes,
        })
    }
}
