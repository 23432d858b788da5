//! Domain types: tiers, accounts, download events, plans and quotes.
//!
//! Every derived value (current tier, royalty owed, discount eligibility) is
//! computed from these inputs by the engines; nothing here caches results.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::BPS_PRECISION;
use crate::error::{DiscountError, TierError};
use crate::money::Money;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Contributor reward tier identifier, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierId {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl TierId {
    pub const ALL: [TierId; 4] = [Self::Bronze, Self::Silver, Self::Gold, Self::Platinum];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierId {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TierError::UnknownTier(s.to_string()))
    }
}

/// How a tier pays its contributors for one qualifying download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoyaltyScheme {
    /// Fixed amount per download, independent of asset price.
    Flat(Money),
    /// Share of the asset price, in basis points.
    RevenueShare { bps: u64 },
}

/// One bracket of the contributor tier table.
///
/// Bounds are inclusive; `max_lifetime_downloads == None` is unbounded.
/// When both royalty fields are set the flat amount wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorTier {
    pub id: TierId,
    pub min_lifetime_downloads: u64,
    pub max_lifetime_downloads: Option<u64>,
    pub revenue_share_bps: Option<u64>,
    pub earnings_per_download: Option<Money>,
    /// Display-only copy.
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl ContributorTier {
    /// A percentage-of-price tier.
    pub fn revenue_share(id: TierId, min: u64, max: Option<u64>, share_bps: u64) -> Self {
        Self {
            id,
            min_lifetime_downloads: min,
            max_lifetime_downloads: max,
            revenue_share_bps: Some(share_bps),
            earnings_per_download: None,
            benefits: Vec::new(),
        }
    }

    /// A fixed-amount-per-download tier.
    pub fn flat_rate(id: TierId, min: u64, max: Option<u64>, per_download: Money) -> Self {
        Self {
            id,
            min_lifetime_downloads: min,
            max_lifetime_downloads: max,
            revenue_share_bps: None,
            earnings_per_download: Some(per_download),
            benefits: Vec::new(),
        }
    }

    pub fn with_benefits<I, S>(mut self, benefits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.benefits = benefits.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `lifetime_downloads` falls inside `[min, max]`.
    pub fn contains(&self, lifetime_downloads: u64) -> bool {
        lifetime_downloads >= self.min_lifetime_downloads
            && self
                .max_lifetime_downloads
                .is_none_or(|max| lifetime_downloads <= max)
    }

    /// The royalty scheme this tier pays under.
    ///
    /// Flat rate takes precedence. Fails when neither field is usable.
    pub fn royalty_scheme(&self) -> Result<RoyaltyScheme, TierError> {
        if let Some(amount) = self.earnings_per_download {
            return Ok(RoyaltyScheme::Flat(amount));
        }
        match self.revenue_share_bps {
            Some(bps) if bps <= BPS_PRECISION => Ok(RoyaltyScheme::RevenueShare { bps }),
            Some(bps) => Err(TierError::InvalidTier {
                tier: self.id,
                reason: format!("revenue share {bps} bps exceeds {BPS_PRECISION}"),
            }),
            None => Err(TierError::InvalidTier {
                tier: self.id,
                reason: "neither earnings_per_download nor revenue_share is set".to_string(),
            }),
        }
    }
}

/// Result of resolving a download count against a tier table.
///
/// `current == None` means "not yet ranked"; `next` is then the first tier
/// of the table (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierPlacement {
    pub current: Option<ContributorTier>,
    pub next: Option<ContributorTier>,
}

impl TierPlacement {
    pub fn is_ranked(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_id(&self) -> Option<TierId> {
        self.current.as_ref().map(|t| t.id)
    }
}

/// Distance from the current tier to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierProgress {
    /// Downloads still needed to reach the next tier; 0 at the top tier.
    pub to_next: u64,
    /// Fraction of the way to the next tier's threshold, in `[0, 1]`.
    pub percent: f64,
}

// ---------------------------------------------------------------------------
// Accounts and downloads
// ---------------------------------------------------------------------------

/// Snapshot of a contributor's persisted counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorAccount {
    pub id: String,
    pub lifetime_download_count: u64,
}

impl ContributorAccount {
    pub fn new(id: impl Into<String>, lifetime_download_count: u64) -> Self {
        Self {
            id: id.into(),
            lifetime_download_count,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A download of a contributor's asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEvent {
    pub asset_id: String,
    pub contributor_id: String,
    pub asset_price: Money,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub completed: bool,
    #[serde(default)]
    pub preview: bool,
    #[serde(default = "default_true")]
    pub paying_subscriber: bool,
}

impl DownloadEvent {
    /// A completed, non-preview download by a paying subscriber.
    pub fn completed(
        asset_id: impl Into<String>,
        contributor_id: impl Into<String>,
        asset_price: Money,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            contributor_id: contributor_id.into(),
            asset_price,
            timestamp,
            completed: true,
            preview: false,
            paying_subscriber: true,
        }
    }

    /// Royalty accrues (and the lifetime count advances) only for completed,
    /// non-preview downloads by a paying subscriber.
    pub fn qualifies_for_royalty(&self) -> bool {
        self.completed && !self.preview && self.paying_subscriber
    }
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => f.write_str("monthly"),
            Self::Yearly => f.write_str("yearly"),
        }
    }
}

impl FromStr for BillingCycle {
    type Err = DiscountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            _ => Err(DiscountError::UnknownCycle(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub original_price_monthly: Money,
    pub original_price_yearly: Money,
    pub first_month_discount_bps: u64,
    /// `None` means unlimited or negotiated.
    pub monthly_downloads: Option<u32>,
}

impl SubscriptionPlan {
    pub fn price_for(&self, cycle: BillingCycle) -> Money {
        match cycle {
            BillingCycle::Monthly => self.original_price_monthly,
            BillingCycle::Yearly => self.original_price_yearly,
        }
    }
}

/// A priced plan as shown on the pricing page at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub plan_id: String,
    pub cycle: BillingCycle,
    pub original_price: Money,
    pub final_price: Money,
    pub discount_applied: bool,
    pub discount_bps: u64,
    pub discount_expires_at: Option<DateTime<Utc>>,
    /// Twelve monthly payments minus the yearly price, for yearly quotes.
    pub yearly_savings: Option<Money>,
    pub monthly_downloads: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn tier_id_parse_and_display() {
        assert_eq!("silver".parse::<TierId>().unwrap(), TierId::Silver);
        assert_eq!(" GOLD ".parse::<TierId>().unwrap(), TierId::Gold);
        assert_eq!(TierId::Platinum.to_string(), "platinum");
        assert!(matches!("level6-ai".parse::<TierId>(), Err(TierError::UnknownTier(_))));
    }

    #[test]
    fn tier_ids_are_ordered() {
        assert!(TierId::Bronze < TierId::Silver);
        assert!(TierId::Gold < TierId::Platinum);
    }

    #[test]
    fn contains_is_inclusive() {
        let t = ContributorTier::revenue_share(TierId::Silver, 101, Some(500), 4_500);
        assert!(!t.contains(100));
        assert!(t.contains(101));
        assert!(t.contains(500));
        assert!(!t.contains(501));
    }

    #[test]
    fn unbounded_contains_everything_above_min() {
        let t = ContributorTier::revenue_share(TierId::Gold, 501, None, 5_000);
        assert!(t.contains(501));
        assert!(t.contains(u64::MAX));
        assert!(!t.contains(500));
    }

    #[test]
    fn flat_rate_takes_precedence() {
        let mut t = ContributorTier::flat_rate(TierId::Bronze, 0, None, Money::from_cents(25));
        t.revenue_share_bps = Some(4_000);
        assert_eq!(t.royalty_scheme().unwrap(), RoyaltyScheme::Flat(Money::from_cents(25)));
    }

    #[test]
    fn missing_royalty_fields_is_invalid() {
        let mut t = ContributorTier::revenue_share(TierId::Bronze, 0, None, 4_000);
        t.revenue_share_bps = None;
        assert!(matches!(
            t.royalty_scheme(),
            Err(TierError::InvalidTier { tier: TierId::Bronze, .. })
        ));
    }

    #[test]
    fn share_above_hundred_percent_is_invalid() {
        let t = ContributorTier::revenue_share(TierId::Gold, 0, None, 10_001);
        assert!(t.royalty_scheme().is_err());
        let t = ContributorTier::revenue_share(TierId::Gold, 0, None, 10_000);
        assert!(t.royalty_scheme().is_ok());
    }

    #[test]
    fn download_qualification() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let ev = DownloadEvent::completed("a1", "c1", Money::from_dollars(10), ts);
        assert!(ev.qualifies_for_royalty());
        assert!(!DownloadEvent { preview: true, ..ev.clone() }.qualifies_for_royalty());
        assert!(!DownloadEvent { completed: false, ..ev.clone() }.qualifies_for_royalty());
        assert!(!DownloadEvent { paying_subscriber: false, ..ev }.qualifies_for_royalty());
    }

    #[test]
    fn download_event_flags_default_from_json() {
        let json = r#"{
            "asset_id": "a1",
            "contributor_id": "c1",
            "asset_price": 1000,
            "timestamp": "2025-03-01T12:00:00Z"
        }"#;
        let ev: DownloadEvent = serde_json::from_str(json).unwrap();
        assert!(ev.completed);
        assert!(!ev.preview);
        assert!(ev.paying_subscriber);
        assert_eq!(ev.asset_price, Money::from_dollars(10));
    }

    #[test]
    fn billing_cycle_parse() {
        assert_eq!("Monthly".parse::<BillingCycle>().unwrap(), BillingCycle::Monthly);
        assert_eq!("annual".parse::<BillingCycle>().unwrap(), BillingCycle::Yearly);
        assert!(matches!(
            "weekly".parse::<BillingCycle>(),
            Err(DiscountError::UnknownCycle(_))
        ));
    }

    #[test]
    fn plan_price_for_cycle() {
        let plan = &crate::constants::default_plans()[0];
        assert_eq!(plan.price_for(BillingCycle::Monthly), Money::from_dollars(15));
        assert_eq!(plan.price_for(BillingCycle::Yearly), Money::from_dollars(144));
    }
}
