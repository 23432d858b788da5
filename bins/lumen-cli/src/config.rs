//! CLI configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `LUMEN_*` environment variables (e.g. `LUMEN_SIGNUP_WINDOW_HOURS=72`).
//! An empty `tiers` or `plans` list falls back to the built-in table/catalog.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Duration;
use lumen_billing::{DiscountEngine, PlanCatalog};
use lumen_core::constants::{default_tier_table, SIGNUP_DISCOUNT_WINDOW_HOURS};
use lumen_core::error::{DiscountError, TierError};
use lumen_core::money::Money;
use lumen_core::rounding::percent_to_bps;
use lumen_core::types::{ContributorTier, SubscriptionPlan, TierId};
use lumen_tiers::validate_tier_table;
use serde::Deserialize;
use tracing::{debug, info};

/// File name looked up under the platform config directory.
pub const DEFAULT_CONFIG_FILE: &str = "lumen.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct LumenConfig {
    /// Signup discount window length in hours.
    pub signup_window_hours: i64,
    #[serde(default)]
    pub tiers: Vec<TierConfig>,
    #[serde(default)]
    pub plans: Vec<PlanConfig>,
}

/// One `[[tiers]]` entry. Percentages are human decimals (`45.0`).
#[derive(Debug, Clone, Deserialize)]
pub struct TierConfig {
    pub id: TierId,
    pub min_downloads: u64,
    pub max_downloads: Option<u64>,
    pub revenue_share_percent: Option<f64>,
    pub earnings_per_download_cents: Option<u64>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// One `[[plans]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanConfig {
    pub id: String,
    pub name: String,
    pub price_monthly_cents: u64,
    pub price_yearly_cents: u64,
    #[serde(default)]
    pub first_month_discount_percent: f64,
    pub monthly_downloads: Option<u32>,
}

impl TierConfig {
    fn to_tier(&self) -> Result<ContributorTier, TierError> {
        let revenue_share_bps = match self.revenue_share_percent {
            Some(percent) => Some(percent_to_bps(percent).ok_or_else(|| TierError::InvalidTier {
                tier: self.id,
                reason: format!("revenue share {percent}% is outside 0..=100"),
            })?),
            None => None,
        };
        Ok(ContributorTier {
            id: self.id,
            min_lifetime_downloads: self.min_downloads,
            max_lifetime_downloads: self.max_downloads,
            revenue_share_bps,
            earnings_per_download: self.earnings_per_download_cents.map(Money::from_cents),
            benefits: self.benefits.clone(),
        })
    }
}

impl PlanConfig {
    fn to_plan(&self) -> Result<SubscriptionPlan, DiscountError> {
        let percent = self.first_month_discount_percent;
        let first_month_discount_bps = percent_to_bps(percent)
            .ok_or_else(|| DiscountError::InvalidDiscountPercent(percent.to_string()))?;
        Ok(SubscriptionPlan {
            id: self.id.clone(),
            name: self.name.clone(),
            original_price_monthly: Money::from_cents(self.price_monthly_cents),
            original_price_yearly: Money::from_cents(self.price_yearly_cents),
            first_month_discount_bps,
            monthly_downloads: self.monthly_downloads,
        })
    }
}

impl LumenConfig {
    /// `<config dir>/lumen/lumen.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lumen").join(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration. An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("signup_window_hours", SIGNUP_DISCOUNT_WINDOW_HOURS)
            .context("failed to set configuration defaults")?;

        match path {
            Some(path) => {
                info!("loading config from {}", path.display());
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(default) = Self::default_path() {
                    debug!("checking for config at {}", default.display());
                    builder = builder.add_source(config::File::from(default).required(false));
                }
            }
        }

        builder = builder.add_source(config::Environment::with_prefix("LUMEN").try_parsing(true));

        builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// The validated tier table, or the built-in table when none is configured.
    pub fn tier_table(&self) -> Result<Vec<ContributorTier>, TierError> {
        let table = if self.tiers.is_empty() {
            default_tier_table()
        } else {
            self.tiers
                .iter()
                .map(TierConfig::to_tier)
                .collect::<Result<Vec<_>, _>>()?
        };
        validate_tier_table(&table)?;
        Ok(table)
    }

    /// The validated plan catalog, or the built-in catalog when none is configured.
    pub fn plan_catalog(&self) -> Result<PlanCatalog, DiscountError> {
        if self.plans.is_empty() {
            return Ok(PlanCatalog::default());
        }
        let plans = self
            .plans
            .iter()
            .map(PlanConfig::to_plan)
            .collect::<Result<Vec<_>, _>>()?;
        PlanCatalog::new(plans)
    }

    pub fn discount_engine(&self) -> Result<DiscountEngine> {
        if self.signup_window_hours <= 0 {
            bail!(
                "signup_window_hours must be positive, got {}",
                self.signup_window_hours
            );
        }
        let window = Duration::try_hours(self.signup_window_hours)
            .context("signup_window_hours is too large")?;
        Ok(DiscountEngine::with_window(window))
    }
}
