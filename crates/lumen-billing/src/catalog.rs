//! Subscription plan catalog.

use std::collections::HashSet;

use lumen_core::constants::{default_plans, BPS_PRECISION};
use lumen_core::error::DiscountError;
use lumen_core::types::SubscriptionPlan;

/// The set of plans offered on the pricing page.
///
/// Plan ids are unique (case-insensitively) and every first-month discount
/// is within `0..=BPS_PRECISION`.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<SubscriptionPlan>,
}

impl PlanCatalog {
    /// Validate and wrap `plans`, preserving their display order.
    pub fn new(plans: Vec<SubscriptionPlan>) -> Result<Self, DiscountError> {
        let mut seen = HashSet::with_capacity(plans.len());
        for plan in &plans {
            if !seen.insert(plan.id.to_ascii_lowercase()) {
                return Err(DiscountError::DuplicatePlan(plan.id.clone()));
            }
            if plan.first_month_discount_bps > BPS_PRECISION {
                return Err(DiscountError::InvalidDiscount {
                    bps: plan.first_month_discount_bps,
                });
            }
        }
        Ok(Self { plans })
    }

    /// Case-insensitive lookup.
    pub fn get(&self, id: &str) -> Result<&SubscriptionPlan, DiscountError> {
        let wanted = id.trim();
        self.plans
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DiscountError::UnknownPlan(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionPlan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self {
            plans: default_plans(),
        }
    }
}
