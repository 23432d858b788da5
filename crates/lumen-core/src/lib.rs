//! # lumen-core
//! Foundation types and traits for contributor rewards and subscription pricing.

pub mod constants;
pub mod error;
pub mod money;
pub mod rounding;
pub mod traits;
pub mod types;

pub use money::Money;
