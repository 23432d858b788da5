//! Discount engine implementing the [`PriceCalculator`] trait.
//!
//! The engine never reads a clock: `now` is always supplied by the caller,
//! so the charge path can recompute eligibility server-side at charge time.

use chrono::{DateTime, Duration, Utc};
use lumen_core::constants::{BPS_PRECISION, MONTHS_PER_YEAR, SIGNUP_DISCOUNT_WINDOW_SECS};
use lumen_core::error::DiscountError;
use lumen_core::money::Money;
use lumen_core::rounding::mul_bps_half_even;
use lumen_core::traits::PriceCalculator;
use lumen_core::types::{BillingCycle, PriceQuote, SubscriptionPlan};
use tracing::debug;

/// The production signup-discount calculator.
#[derive(Debug, Clone)]
pub struct DiscountEngine {
    window: Duration,
}

impl Default for DiscountEngine {
    fn default() -> Self {
        Self {
            window: Duration::seconds(SIGNUP_DISCOUNT_WINDOW_SECS),
        }
    }
}

impl DiscountEngine {
    /// Engine with the standard 48-hour window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom eligibility window.
    pub fn with_window(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Last instant at which an account created at `created_at` is still eligible.
    pub fn discount_deadline(&self, created_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        created_at.checked_add_signed(self.window)
    }

    /// Time left in the signup window, or `None` once it has passed.
    ///
    /// Never exceeds the window length, even when `created_at` is ahead of `now`.
    pub fn discount_time_remaining(
        &self,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        if !self.is_eligible_for_signup_discount(created_at, now) {
            return None;
        }
        let elapsed = now.signed_duration_since(created_at);
        let remaining = self
            .window
            .checked_sub(&elapsed)
            .map_or(self.window, |r| r.min(self.window));
        Some(remaining)
    }

    /// Price `plan` for `cycle` as seen by an account created at `created_at`.
    ///
    /// The signup discount applies to the first month of a monthly plan only.
    /// Yearly quotes report savings against twelve monthly payments.
    pub fn quote(
        &self,
        plan: &SubscriptionPlan,
        cycle: BillingCycle,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<PriceQuote, DiscountError> {
        let original_price = plan.price_for(cycle);
        let bps = plan.first_month_discount_bps;

        let quote = match cycle {
            BillingCycle::Monthly => {
                let eligible = bps > 0 && self.is_eligible_for_signup_discount(created_at, now);
                let final_price = self.compute_discounted_price(original_price, bps, eligible)?;
                PriceQuote {
                    plan_id: plan.id.clone(),
                    cycle,
                    original_price,
                    final_price,
                    discount_applied: eligible,
                    discount_bps: if eligible { bps } else { 0 },
                    discount_expires_at: if eligible {
                        self.discount_deadline(created_at)
                    } else {
                        None
                    },
                    yearly_savings: None,
                    monthly_downloads: plan.monthly_downloads,
                }
            }
            BillingCycle::Yearly => {
                let final_price = self.compute_discounted_price(original_price, bps, false)?;
                let twelve_months = plan
                    .original_price_monthly
                    .checked_mul(MONTHS_PER_YEAR)
                    .ok_or(DiscountError::ArithmeticOverflow)?;
                PriceQuote {
                    plan_id: plan.id.clone(),
                    cycle,
                    original_price,
                    final_price,
                    discount_applied: false,
                    discount_bps: 0,
                    discount_expires_at: None,
                    yearly_savings: Some(twelve_months.saturating_sub(original_price)),
                    monthly_downloads: plan.monthly_downloads,
                }
            }
        };

        debug!(
            plan = %quote.plan_id,
            cycle = %quote.cycle,
            original = %quote.original_price,
            final_price = %quote.final_price,
            discounted = quote.discount_applied,
            "priced plan"
        );
        Ok(quote)
    }
}

impl PriceCalculator for DiscountEngine {
    fn is_eligible_for_signup_discount(
        &self,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        // Inclusive; a created_at in the future gives a negative age and stays eligible.
        now.signed_duration_since(created_at) <= self.window
    }

    fn compute_discounted_price(
        &self,
        original_price: Money,
        discount_bps: u64,
        eligible: bool,
    ) -> Result<Money, DiscountError> {
        if discount_bps > BPS_PRECISION {
            return Err(DiscountError::InvalidDiscount { bps: discount_bps });
        }
        if !eligible {
            return Ok(original_price);
        }
        mul_bps_half_even(original_price.cents(), BPS_PRECISION - discount_bps)
            .map(Money::from_cents)
            .ok_or(DiscountError::ArithmeticOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lumen_core::constants::default_plans;
    use proptest::prelude::*;

    fn engine() -> DiscountEngine {
        DiscountEngine::new()
    }

    fn signup() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 8, 30, 0).unwrap()
    }

    fn starter() -> SubscriptionPlan {
        default_plans().remove(0)
    }

    // --- is_eligible_for_signup_discount ---

    #[test]
    fn eligible_at_signup() {
        assert!(engine().is_eligible_for_signup_discount(signup(), signup()));
    }

    #[test]
    fn eligible_at_exact_window_end() {
        let now = signup() + Duration::hours(48);
        assert!(engine().is_eligible_for_signup_discount(signup(), now));
    }

    #[test]
    fn ineligible_one_second_after_window() {
        let now = signup() + Duration::hours(48) + Duration::seconds(1);
        assert!(!engine().is_eligible_for_signup_discount(signup(), now));
    }

    #[test]
    fn future_signup_is_eligible() {
        let now = signup() - Duration::days(3);
        assert!(engine().is_eligible_for_signup_discount(signup(), now));
    }

    #[test]
    fn custom_window() {
        let e = DiscountEngine::with_window(Duration::hours(24));
        assert!(e.is_eligible_for_signup_discount(signup(), signup() + Duration::hours(24)));
        assert!(!e.is_eligible_for_signup_discount(signup(), signup() + Duration::hours(25)));
    }

    // --- compute_discounted_price ---

    #[test]
    fn fifteen_dollars_at_33_percent() {
        let p = engine()
            .compute_discounted_price(Money::from_dollars(15), 3_300, true)
            .unwrap();
        assert_eq!(p, Money::from_cents(1005));
    }

    #[test]
    fn ineligible_pays_full_price() {
        let p = engine()
            .compute_discounted_price(Money::from_dollars(15), 3_300, false)
            .unwrap();
        assert_eq!(p, Money::from_dollars(15));
    }

    #[test]
    fn full_discount_is_free() {
        let p = engine()
            .compute_discounted_price(Money::from_dollars(15), BPS_PRECISION, true)
            .unwrap();
        assert_eq!(p, Money::ZERO);
    }

    #[test]
    fn discount_rounds_half_even() {
        // $0.05 at 50% off = 2.5 cents -> 2 cents
        let p = engine()
            .compute_discounted_price(Money::from_cents(5), 5_000, true)
            .unwrap();
        assert_eq!(p, Money::from_cents(2));
    }

    #[test]
    fn discount_above_hundred_percent_rejected() {
        for eligible in [true, false] {
            assert_eq!(
                engine().compute_discounted_price(Money::from_dollars(15), 10_001, eligible),
                Err(DiscountError::InvalidDiscount { bps: 10_001 })
            );
        }
    }

    #[test]
    fn signup_price_default_impl() {
        let e = engine();
        let inside = e
            .signup_price(Money::from_dollars(15), 3_300, signup(), signup() + Duration::hours(1))
            .unwrap();
        let outside = e
            .signup_price(Money::from_dollars(15), 3_300, signup(), signup() + Duration::days(3))
            .unwrap();
        assert_eq!(inside, Money::from_cents(1005));
        assert_eq!(outside, Money::from_dollars(15));
    }

    // --- discount_time_remaining ---

    #[test]
    fn remaining_counts_down() {
        let now = signup() + Duration::hours(47);
        assert_eq!(
            engine().discount_time_remaining(signup(), now),
            Some(Duration::hours(1))
        );
    }

    #[test]
    fn remaining_zero_at_boundary() {
        let now = signup() + Duration::hours(48);
        assert_eq!(engine().discount_time_remaining(signup(), now), Some(Duration::zero()));
    }

    #[test]
    fn remaining_none_after_window() {
        let now = signup() + Duration::hours(49);
        assert_eq!(engine().discount_time_remaining(signup(), now), None);
    }

    #[test]
    fn remaining_capped_for_future_signup() {
        let now = signup() - Duration::hours(5);
        assert_eq!(
            engine().discount_time_remaining(signup(), now),
            Some(Duration::hours(48))
        );
    }

    // --- quote ---

    #[test]
    fn monthly_quote_inside_window() {
        let q = engine()
            .quote(&starter(), BillingCycle::Monthly, signup(), signup() + Duration::hours(2))
            .unwrap();
        assert!(q.discount_applied);
        assert_eq!(q.original_price, Money::from_dollars(15));
        assert_eq!(q.final_price, Money::from_cents(1005));
        assert_eq!(q.discount_bps, 3_300);
        assert_eq!(q.discount_expires_at, Some(signup() + Duration::hours(48)));
        assert_eq!(q.monthly_downloads, Some(10));
    }

    #[test]
    fn monthly_quote_after_window() {
        let q = engine()
            .quote(&starter(), BillingCycle::Monthly, signup(), signup() + Duration::days(5))
            .unwrap();
        assert!(!q.discount_applied);
        assert_eq!(q.final_price, q.original_price);
        assert_eq!(q.discount_bps, 0);
        assert_eq!(q.discount_expires_at, None);
    }

    #[test]
    fn zero_discount_plan_never_marks_discount() {
        let enterprise = default_plans().remove(2);
        let q = engine()
            .quote(&enterprise, BillingCycle::Monthly, signup(), signup())
            .unwrap();
        assert!(!q.discount_applied);
        assert_eq!(q.final_price, Money::from_dollars(99));
        assert_eq!(q.monthly_downloads, None);
    }

    #[test]
    fn yearly_quote_reports_savings_without_discount() {
        let q = engine()
            .quote(&starter(), BillingCycle::Yearly, signup(), signup())
            .unwrap();
        assert!(!q.discount_applied);
        assert_eq!(q.final_price, Money::from_dollars(144));
        // 12 * $15 - $144
        assert_eq!(q.yearly_savings, Some(Money::from_dollars(36)));
    }

    #[test]
    fn yearly_savings_never_negative() {
        let plan = SubscriptionPlan {
            original_price_yearly: Money::from_dollars(500),
            ..starter()
        };
        let q = engine().quote(&plan, BillingCycle::Yearly, signup(), signup()).unwrap();
        assert_eq!(q.yearly_savings, Some(Money::ZERO));
    }

    #[test]
    fn quote_rejects_invalid_plan_discount() {
        let plan = SubscriptionPlan {
            first_month_discount_bps: 12_000,
            ..starter()
        };
        for cycle in [BillingCycle::Monthly, BillingCycle::Yearly] {
            assert!(matches!(
                engine().quote(&plan, cycle, signup(), signup()),
                Err(DiscountError::InvalidDiscount { bps: 12_000 })
            ));
        }
    }

    #[test]
    fn engine_is_object_safe() {
        let e = engine();
        let dyn_e: &dyn PriceCalculator = &e;
        assert!(dyn_e.is_eligible_for_signup_discount(signup(), signup()));
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn discounted_never_exceeds_original(cents in 0u64..=u64::MAX, bps in 0u64..=BPS_PRECISION) {
            let p = Money::from_cents(cents);
            prop_assert!(engine().compute_discounted_price(p, bps, true).unwrap() <= p);
        }

        #[test]
        fn nonzero_discount_strictly_reduces(cents in 10_000u64..=100_000_000u64, bps in 1u64..=BPS_PRECISION) {
            let p = Money::from_cents(cents);
            prop_assert!(engine().compute_discounted_price(p, bps, true).unwrap() < p);
        }

        #[test]
        fn zero_discount_is_identity(cents in 0u64..=u64::MAX) {
            let p = Money::from_cents(cents);
            prop_assert_eq!(engine().compute_discounted_price(p, 0, true).unwrap(), p);
        }

        #[test]
        fn ineligible_is_identity(cents in 0u64..=u64::MAX, bps in 0u64..=BPS_PRECISION) {
            let p = Money::from_cents(cents);
            prop_assert_eq!(engine().compute_discounted_price(p, bps, false).unwrap(), p);
        }

        #[test]
        fn eligibility_matches_window(offset_secs in -1_000_000i64..=1_000_000i64) {
            let now = signup() + Duration::seconds(offset_secs);
            let eligible = engine().is_eligible_for_signup_discount(signup(), now);
            prop_assert_eq!(eligible, offset_secs <= SIGNUP_DISCOUNT_WINDOW_SECS);
        }
    }
}
