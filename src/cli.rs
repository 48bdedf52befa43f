use crate::bands;
use crate::config::{self, AppConfig};
use crate::models::{Listing, Preferences};
use crate::ranking::{self, RankOptions, Winner};
use crate::scoring::{self, ScoreBreakdown};
use crate::storage::{read_listings, write_ranked};
use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "flat-matcher")]
#[command(about = "Rank HDB resale listings against your preferences")]
pub struct Cli {
    /// Log filter, e.g. `info` or `flat_matcher=debug` (RUST_LOG wins)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every listing in a CSV export and print the best matches
    Rank(RankArgs),
    /// Score a single flat given on the command line, criterion by criterion
    Explain(ExplainArgs),
    /// Put two listings from a CSV export side by side
    Compare(CompareArgs),
    /// List the floor area and price band identifiers
    Bands,
    #[command(subcommand)]
    Settings(SettingsCmd),
}

#[derive(Args, Debug, Default)]
pub struct PrefArgs {
    /// JSON preference file; individual flags override its fields
    #[arg(long)]
    pub prefs: Option<PathBuf>,
    #[arg(long)]
    pub pref_flat_type: Option<String>,
    /// Storey range, e.g. "07 TO 09"
    #[arg(long)]
    pub pref_storey: Option<String>,
    /// Floor area band, e.g. "91-110"
    #[arg(long)]
    pub pref_area: Option<String>,
    #[arg(long)]
    pub pref_model: Option<String>,
    /// Price band, e.g. "400k-500k"
    #[arg(long)]
    pub pref_price: Option<String>,
}

#[derive(Args, Debug)]
pub struct RankArgs {
    #[arg(long)]
    pub listings: Option<PathBuf>,
    #[command(flatten)]
    pub prefs: PrefArgs,
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub min_score: Option<u8>,
    /// Write the ranking as CSV; bare file names land in the export directory
    #[arg(long)]
    pub export: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub prefs: PrefArgs,
    #[arg(long, default_value = "")]
    pub flat_type: String,
    #[arg(long, default_value = "")]
    pub storey_range: String,
    #[arg(long, default_value_t = f64::NAN)]
    pub area: f64,
    #[arg(long, default_value = "")]
    pub model: String,
    #[arg(long, default_value_t = f64::NAN)]
    pub price: f64,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(long)]
    pub listings: Option<PathBuf>,
    pub first: Uuid,
    pub second: Uuid,
    #[command(flatten)]
    pub prefs: PrefArgs,
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCmd {
    Show,
}

pub fn run(cli: Cli, cfg: &AppConfig) -> Result<()> {
    if !cfg.settings.ui.color {
        colored::control::set_override(false);
    }
    match cli.command {
        Commands::Rank(args) => handle_rank(args, cfg),
        Commands::Explain(args) => handle_explain(args, cfg),
        Commands::Compare(args) => handle_compare(args, cfg),
        Commands::Bands => {
            print_bands();
            Ok(())
        }
        Commands::Settings(cmd) => handle_settings(cmd, cfg),
    }
}

impl PrefArgs {
    pub fn resolve(&self) -> Result<Preferences> {
        let base = match &self.prefs {
            Some(path) => config::read_json::<Preferences>(path)?,
            None => Preferences::default(),
        };
        let flags = Preferences {
            flat_type: self.pref_flat_type.clone().unwrap_or_default(),
            storey_range: self.pref_storey.clone().unwrap_or_default(),
            floor_area_sqm: self.pref_area.clone().unwrap_or_default(),
            flat_model: self.pref_model.clone().unwrap_or_default(),
            price_range: self.pref_price.clone().unwrap_or_default(),
        };
        let prefs = base.overlay(&flags);
        warn_unknown_bands(&prefs);
        Ok(prefs)
    }
}

fn warn_unknown_bands(prefs: &Preferences) {
    let area = prefs.floor_area_sqm.trim();
    if !area.is_empty() && bands::resolve_area_band(area).is_none() {
        tracing::warn!(band = area, "unknown floor area band; it will score 0");
    }
    let price = prefs.price_range.trim();
    if !price.is_empty() && bands::resolve_price_band(price).is_none() {
        tracing::warn!(band = price, "unknown price band; it will score 0");
    }
    if prefs.is_empty() {
        tracing::warn!("no preferences set; every listing scores 0");
    }
}

fn handle_rank(args: RankArgs, cfg: &AppConfig) -> Result<()> {
    let prefs = args.prefs.resolve()?;
    let path = args
        .listings
        .unwrap_or_else(|| cfg.settings.paths.listings_csv.clone());
    let listings = read_listings(&path)?;
    let options = RankOptions {
        min_score: args.min_score.unwrap_or(cfg.settings.ranking.min_score),
        limit: Some(args.limit.unwrap_or(cfg.settings.ranking.limit)),
    };
    let ranked = ranking::rank(&listings, &prefs, options);

    if let Some(export) = args.export {
        let dest = export_path(&export, &cfg.settings.paths.export_dir);
        write_ranked(&dest, &ranked)?;
        if !args.json {
            println!("Exported {} listings to {}", ranked.len(), dest.display());
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }
    if ranked.is_empty() {
        println!("No listings matched.");
    }
    let symbol = &cfg.settings.ui.currency_symbol;
    for (i, entry) in ranked.iter().enumerate() {
        let l = entry.listing;
        println!(
            "{:>3}. {} | {} | {} | {} sqm | {} | {} | {} | {}",
            i + 1,
            paint_score(entry.score),
            l.flat_type,
            l.storey_range,
            format_area(l.floor_area_sqm),
            l.flat_model,
            format_money(symbol, l.resale_price),
            l.address(),
            l.id.to_string().dimmed()
        );
    }
    Ok(())
}

fn handle_explain(args: ExplainArgs, cfg: &AppConfig) -> Result<()> {
    let prefs = args.prefs.resolve()?;
    let listing = Listing::new(
        args.flat_type,
        args.storey_range,
        args.area,
        args.model,
        args.price,
    );
    let breakdown = scoring::explain(&listing, &prefs);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }
    print_breakdown(&breakdown, &cfg.settings.ui.currency_symbol);
    Ok(())
}

fn handle_compare(args: CompareArgs, cfg: &AppConfig) -> Result<()> {
    let prefs = args.prefs.resolve()?;
    let path = args
        .listings
        .unwrap_or_else(|| cfg.settings.paths.listings_csv.clone());
    let listings = read_listings(&path)?;
    let find = |id: Uuid| {
        listings
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| anyhow!("Listing {id} not found in {}", path.display()))
    };
    let first = find(args.first)?;
    let second = find(args.second)?;
    let cmp = ranking::compare(first, second, &prefs);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&cmp)?);
        return Ok(());
    }

    let symbol = &cfg.settings.ui.currency_symbol;
    for (label, listing, breakdown) in [
        ("First", first, &cmp.first),
        ("Second", second, &cmp.second),
    ] {
        println!("{} {}", label.bold(), listing.address());
        print_breakdown(breakdown, symbol);
        println!();
    }
    for d in &cmp.deltas {
        let delta = format!("{:+.0}", d.delta * 100.0);
        let delta = if d.delta > 0.0 {
            delta.green()
        } else if d.delta < 0.0 {
            delta.red()
        } else {
            delta.normal()
        };
        println!("  {:<13} {}", d.criterion.label(), delta);
    }
    let verdict = match cmp.winner {
        Winner::First => "First listing is the better match",
        Winner::Second => "Second listing is the better match",
        Winner::Tie => "Both listings match equally well",
    };
    println!("{}", verdict.bold());
    Ok(())
}

fn handle_settings(cmd: SettingsCmd, cfg: &AppConfig) -> Result<()> {
    match cmd {
        SettingsCmd::Show => {
            println!("Config directory: {}", cfg.base_dir.display());
            println!("Settings file: {}", cfg.settings_path().display());
            println!("Listings CSV: {}", cfg.settings.paths.listings_csv.display());
            println!("Export dir: {}", cfg.settings.paths.export_dir.display());
            println!(
                "Ranking: limit {}, min score {}",
                cfg.settings.ranking.limit, cfg.settings.ranking.min_score
            );
            println!("Log level: {}", cfg.settings.logging.level);
        }
    }
    Ok(())
}

fn print_bands() {
    println!("{}", "Floor area (sqm)".bold());
    for label in bands::area_band_labels() {
        println!("  {label}");
    }
    println!("{}", "Price".bold());
    for label in bands::price_band_labels() {
        println!("  {label}");
    }
}

fn print_breakdown(breakdown: &ScoreBreakdown, symbol: &str) {
    println!("Overall compatibility: {}", paint_score(breakdown.score));
    if breakdown.criteria.is_empty() {
        println!("  (no preferences set)");
    }
    for d in &breakdown.criteria {
        let actual = match d.criterion {
            scoring::Criterion::PriceRange => d
                .actual
                .parse::<f64>()
                .map(|p| format_money(symbol, p))
                .unwrap_or_else(|_| d.actual.clone()),
            _ => d.actual.clone(),
        };
        println!(
            "  {:<13} wanted {:<12} got {:<16} {:>3}% x {:.2} = {:>5.1} [{}]",
            d.criterion.label(),
            d.preference,
            actual,
            (d.raw * 100.0).round(),
            d.weight,
            d.contribution,
            d.quality
        );
    }
}

fn paint_score(score: u8) -> ColoredString {
    let text = format!("{score:>3}%");
    if score >= 80 {
        text.green()
    } else if score < 50 {
        text.red()
    } else {
        text.yellow()
    }
}

fn export_path(requested: &Path, export_dir: &Path) -> PathBuf {
    let bare = requested
        .parent()
        .map(|p| p.as_os_str().is_empty())
        .unwrap_or(true);
    if requested.is_relative() && bare {
        export_dir.join(requested)
    } else {
        requested.to_path_buf()
    }
}

fn format_area(area: f64) -> String {
    if area.is_finite() {
        format!("{area:.0}")
    } else {
        "?".into()
    }
}

pub fn format_money(symbol: &str, amount: f64) -> String {
    if !amount.is_finite() {
        return "?".into();
    }
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if whole < 0 { "-" } else { "" };
    format!("{sign}{symbol}{grouped}")
}
