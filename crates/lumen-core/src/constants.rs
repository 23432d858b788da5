//! Engine constants. All monetary values in cents (1 USD = 100 cents).
//! Percentages are carried in basis points (1% = 100 bps).

use crate::money::Money;
use crate::types::{ContributorTier, SubscriptionPlan, TierId};

pub const CENTS_PER_DOLLAR: u64 = 100;

/// Basis-point denominator: 10 000 bps = 100%.
pub const BPS_PRECISION: u64 = 10_000;

/// Length of the first-period discount window after signup, in hours.
pub const SIGNUP_DISCOUNT_WINDOW_HOURS: i64 = 48;

/// Length of the first-period discount window after signup, in seconds.
pub const SIGNUP_DISCOUNT_WINDOW_SECS: i64 = SIGNUP_DISCOUNT_WINDOW_HOURS * 60 * 60;

/// Months billed by a yearly plan, used to compute yearly savings.
pub const MONTHS_PER_YEAR: u64 = 12;

/// The canonical four-tier contributor table.
///
/// | Tier     | Lifetime downloads | Revenue share |
/// |----------|--------------------|---------------|
/// | bronze   | 0–100              | 40%           |
/// | silver   | 101–500            | 45%           |
/// | gold     | 501–2000           | 50%           |
/// | platinum | 2001+              | 60%           |
///
/// # Examples
///
/// ```
/// use lumen_core::constants::default_tier_table;
/// use lumen_core::types::TierId;
///
/// let table = default_tier_table();
/// assert_eq!(table.len(), 4);
/// assert_eq!(table[0].id, TierId::Bronze);
/// assert_eq!(table[3].max_lifetime_downloads, None);
/// ```
pub fn default_tier_table() -> Vec<ContributorTier> {
    vec![
        ContributorTier::revenue_share(TierId::Bronze, 0, Some(100), 4_000).with_benefits([
            "Standard asset review queue",
            "Monthly earnings report",
        ]),
        ContributorTier::revenue_share(TierId::Silver, 101, Some(500), 4_500).with_benefits([
            "Priority asset review",
            "Contributor badge on profile",
        ]),
        ContributorTier::revenue_share(TierId::Gold, 501, Some(2_000), 5_000).with_benefits([
            "Featured placement in search",
            "Early access to new categories",
        ]),
        ContributorTier::revenue_share(TierId::Platinum, 2_001, None, 6_000).with_benefits([
            "Dedicated account manager",
            "Homepage spotlight rotation",
        ]),
    ]
}

/// The default subscription catalog.
///
/// # Examples
///
/// ```
/// use lumen_core::constants::default_plans;
/// use lumen_core::Money;
///
/// let plans = default_plans();
/// assert_eq!(plans[0].id, "starter");
/// assert_eq!(plans[0].original_price_monthly, Money::from_dollars(15));
/// ```
pub fn default_plans() -> Vec<SubscriptionPlan> {
    vec![
        SubscriptionPlan {
            id: "starter".to_string(),
            name: "Starter".to_string(),
            original_price_monthly: Money::from_dollars(15),
            original_price_yearly: Money::from_dollars(144),
            first_month_discount_bps: 3_300,
            monthly_downloads: Some(10),
        },
        SubscriptionPlan {
            id: "pro".to_string(),
            name: "Pro".to_string(),
            original_price_monthly: Money::from_dollars(29),
            original_price_yearly: Money::from_dollars(288),
            first_month_discount_bps: 3_300,
            monthly_downloads: Some(50),
        },
        SubscriptionPlan {
            id: "enterprise".to_string(),
            name: "Enterprise".to_string(),
            original_price_monthly: Money::from_dollars(99),
            original_price_yearly: Money::from_dollars(948),
            first_month_discount_bps: 0,
            // Unlimited / negotiated per contract.
            monthly_downloads: None,
        },
    ]
}
