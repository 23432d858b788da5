//! lumen: command-line front end for contributor tiers, royalties and pricing.
//!
//! Loads the tier table and plan catalog from configuration, then answers
//! one question per invocation. Output is human-readable text, or JSON with
//! `--json`. Logs go to stderr so JSON output stays machine-readable.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use lumen_billing::{DiscountEngine, PlanCatalog};
use lumen_core::money::Money;
use lumen_core::rounding::bps_to_percent;
use lumen_core::traits::TierSchedule;
use lumen_core::types::{
    BillingCycle, ContributorAccount, ContributorTier, DownloadEvent, PriceQuote, RoyaltyScheme,
    TierId, TierProgress,
};
use lumen_tiers::{RoyaltyLedger, TierEngine};
use serde::Serialize;
use tracing::info;

use crate::config::LumenConfig;

/// Lumen pricing and contributor-rewards engine.
#[derive(Parser)]
#[command(name = "lumen", version, about = "Contributor tiers, royalties and subscription pricing")]
struct Cli {
    /// Path to a TOML config file (default: <config dir>/lumen/lumen.toml if present).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json").
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tier and progress for a lifetime download count.
    Tier(TierArgs),
    /// Compute the royalty for one download.
    Royalty(RoyaltyArgs),
    /// Price a subscription plan for an account.
    Quote(QuoteArgs),
    /// Replay a JSON file of download events into a royalty statement.
    Statement(StatementArgs),
    /// List the configured tier table.
    Tiers,
    /// List the configured subscription plans.
    Plans,
}

#[derive(Args)]
struct TierArgs {
    /// Lifetime completed downloads.
    downloads: u64,
}

#[derive(Args)]
struct RoyaltyArgs {
    /// Lifetime completed downloads before this one.
    #[arg(short, long)]
    downloads: u64,

    /// Asset price in dollars (e.g. 10.00).
    #[arg(short, long)]
    price: Money,
}

#[derive(Args)]
struct QuoteArgs {
    /// Plan id (e.g. starter).
    #[arg(short, long)]
    plan: String,

    /// Billing cycle (monthly or yearly).
    #[arg(long, default_value = "monthly")]
    cycle: BillingCycle,

    /// Account creation time (RFC 3339).
    #[arg(long)]
    created_at: DateTime<Utc>,

    /// Evaluation time (RFC 3339, default: now).
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args)]
struct StatementArgs {
    /// JSON file containing an array of download events.
    #[arg(short, long)]
    file: PathBuf,

    /// Contributor id the events belong to.
    #[arg(long)]
    contributor: String,

    /// Lifetime downloads before the first event in the file.
    #[arg(long, default_value_t = 0)]
    starting_downloads: u64,
}

/// Engines and configured tables for one invocation.
struct Engines {
    tiers: TierEngine,
    discounts: DiscountEngine,
    table: Vec<ContributorTier>,
    catalog: PlanCatalog,
}

impl Engines {
    fn from_config(config: &LumenConfig) -> Result<Self> {
        Ok(Self {
            tiers: TierEngine::new(),
            discounts: config.discount_engine()?,
            table: config.tier_table().context("invalid tier table")?,
            catalog: config.plan_catalog().context("invalid plan catalog")?,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    let config = LumenConfig::load(cli.config.as_deref())?;
    let engines = Engines::from_config(&config)?;
    info!(
        tiers = engines.table.len(),
        plans = engines.catalog.len(),
        window_hours = engines.discounts.window().num_hours(),
        "configuration loaded"
    );

    let json = cli.json;
    match cli.command {
        Commands::Tier(args) => cmd_tier(&engines, args, json),
        Commands::Royalty(args) => cmd_royalty(&engines, args, json),
        Commands::Quote(args) => cmd_quote(&engines, args, json),
        Commands::Statement(args) => cmd_statement(&engines, args, json),
        Commands::Tiers => cmd_tiers(&engines, json),
        Commands::Plans => cmd_plans(&engines, json),
    }
}

#[derive(Serialize)]
struct TierReport {
    downloads: u64,
    current: Option<ContributorTier>,
    next: Option<ContributorTier>,
    progress: Option<TierProgress>,
}

fn cmd_tier(engines: &Engines, args: TierArgs, json: bool) -> Result<()> {
    let placement = engines.tiers.resolve_tier(&engines.table, args.downloads);
    let progress = placement
        .current
        .as_ref()
        .map(|current| engines.tiers.compute_progress(current, placement.next.as_ref(), args.downloads));

    let report = TierReport {
        downloads: args.downloads,
        current: placement.current,
        next: placement.next,
        progress,
    };
    if json {
        return print_json(&report);
    }

    println!("downloads: {}", report.downloads);
    match &report.current {
        Some(tier) => println!("tier:      {} ({})", tier.id, describe_scheme(tier)),
        None => println!("tier:      not yet ranked"),
    }
    match (&report.next, &report.progress) {
        (Some(next), Some(progress)) => println!(
            "next:      {} at {} downloads ({} to go, {:.1}%)",
            next.id,
            next.min_lifetime_downloads,
            progress.to_next,
            progress.percent * 100.0
        ),
        (Some(next), None) => println!(
            "next:      {} at {} downloads",
            next.id, next.min_lifetime_downloads
        ),
        (None, _) => println!("next:      top tier reached"),
    }
    Ok(())
}

#[derive(Serialize)]
struct RoyaltyReport {
    downloads: u64,
    tier: Option<TierId>,
    asset_price: Money,
    royalty: Money,
}

fn cmd_royalty(engines: &Engines, args: RoyaltyArgs, json: bool) -> Result<()> {
    let priced = engines
        .tiers
        .royalty_for_download(&engines.table, args.downloads, args.price)
        .context("failed to compute royalty")?;

    let report = RoyaltyReport {
        downloads: args.downloads,
        tier: priced.as_ref().map(|(tier, _)| tier.id),
        asset_price: args.price,
        royalty: priced.map_or(Money::ZERO, |(_, royalty)| royalty),
    };
    if json {
        return print_json(&report);
    }

    match report.tier {
        Some(tier) => println!(
            "{} download at {} downloads ({tier}): royalty {}",
            report.asset_price, report.downloads, report.royalty
        ),
        None => println!(
            "{} download at {} downloads: contributor not yet ranked, no royalty",
            report.asset_price, report.downloads
        ),
    }
    Ok(())
}

#[derive(Serialize)]
struct QuoteReport {
    #[serde(flatten)]
    quote: PriceQuote,
    time_remaining_secs: Option<i64>,
}

fn cmd_quote(engines: &Engines, args: QuoteArgs, json: bool) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);
    let plan = engines.catalog.get(&args.plan)?;
    let quote = engines
        .discounts
        .quote(plan, args.cycle, args.created_at, now)
        .with_context(|| format!("failed to price plan {}", plan.id))?;
    let remaining = if quote.discount_applied {
        engines.discounts.discount_time_remaining(args.created_at, now)
    } else {
        None
    };

    let report = QuoteReport {
        quote,
        time_remaining_secs: remaining.map(|d| d.num_seconds()),
    };
    if json {
        return print_json(&report);
    }

    let q = &report.quote;
    println!("plan:     {} ({})", plan.name, q.cycle);
    if q.discount_applied {
        println!(
            "price:    {} (was {}, {:.2}% off first month)",
            q.final_price,
            q.original_price,
            bps_to_percent(q.discount_bps)
        );
    } else {
        println!("price:    {}", q.final_price);
    }
    if let Some(secs) = report.time_remaining_secs {
        println!("offer:    ends in {}h {:02}m", secs / 3600, (secs % 3600) / 60);
    }
    if let Some(savings) = q.yearly_savings {
        println!("savings:  {savings} vs monthly billing");
    }
    match q.monthly_downloads {
        Some(n) => println!("includes: {n} downloads per month"),
        None => println!("includes: unlimited downloads"),
    }
    Ok(())
}

fn cmd_statement(engines: &Engines, args: StatementArgs, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let events: Vec<DownloadEvent> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse download events in {}", args.file.display()))?;

    let account = ContributorAccount::new(args.contributor, args.starting_downloads);
    let statement = RoyaltyLedger::new(&engines.tiers, &engines.table)
        .replay(&account, &events)
        .context("failed to replay downloads")?;
    if json {
        return print_json(&statement);
    }

    println!("contributor: {}", statement.contributor_id);
    println!(
        "downloads:   {} -> {} ({} skipped)",
        statement.starting_downloads, statement.ending_downloads, statement.skipped
    );
    for entry in &statement.entries {
        let tier = entry.tier.map_or("unranked", |t| t.as_str());
        println!(
            "  {}  {:<20} {:>10} {:<9} {:>10}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.asset_id,
            entry.asset_price.to_string(),
            tier,
            entry.royalty.to_string()
        );
    }
    for change in &statement.tier_changes {
        let name = |t: Option<TierId>| t.map_or("unranked", |t| t.as_str());
        println!(
            "promoted:    {} -> {} at {} downloads",
            name(change.from),
            name(change.to),
            change.at_downloads
        );
    }
    println!("total:       {}", statement.total);
    Ok(())
}

fn cmd_tiers(engines: &Engines, json: bool) -> Result<()> {
    if json {
        return print_json(&engines.table);
    }
    for tier in &engines.table {
        let range = match tier.max_lifetime_downloads {
            Some(max) => format!("{}–{}", tier.min_lifetime_downloads, max),
            None => format!("{}+", tier.min_lifetime_downloads),
        };
        println!("{:<9} {:<12} {}", tier.id, range, describe_scheme(tier));
        for benefit in &tier.benefits {
            println!("          - {benefit}");
        }
    }
    Ok(())
}

fn cmd_plans(engines: &Engines, json: bool) -> Result<()> {
    let plans: Vec<_> = engines.catalog.iter().collect();
    if json {
        return print_json(&plans);
    }
    for plan in plans {
        let downloads = plan
            .monthly_downloads
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
        println!(
            "{:<11} {:>8}/mo {:>9}/yr  first month -{:.0}%  {} downloads/mo",
            plan.id,
            plan.original_price_monthly.to_string(),
            plan.original_price_yearly.to_string(),
            bps_to_percent(plan.first_month_discount_bps),
            downloads
        );
    }
    Ok(())
}

fn describe_scheme(tier: &ContributorTier) -> String {
    match tier.royalty_scheme() {
        Ok(RoyaltyScheme::Flat(amount)) => format!("{amount} per download"),
        Ok(RoyaltyScheme::RevenueShare { bps }) => {
            format!("{:.2}% revenue share", bps_to_percent(bps))
        }
        Err(e) => format!("unpriced: {e}"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
    println!("{out}");
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Both write to stderr.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
