//! # lumen-billing: Subscription pricing.
//!
//! - **Signup discount**: accounts younger than the discount window (48 hours
//!   by default, inclusive) pay a reduced first month.
//! - **Quotes**: a plan priced for a billing cycle at a given instant,
//!   including yearly savings and the discount deadline.
//! - **Catalog**: validated plan lookup by id.

pub mod catalog;
pub mod engine;

pub use catalog::PlanCatalog;
pub use engine::DiscountEngine;
