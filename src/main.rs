//! gotLocks command-line tool
//!
//! Score odds, price combos, list eligible games and replay slip drafts
//! against the pick rules.

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use gotlocks::{
    client::{ApiClient, FallbackOdds, HttpOddsSource, LegQuery, PicksClient},
    combo::{combine_odds, combined_decimal, ComboBuilder},
    config::{ComboConfig, Config},
    slip::{PickSubmission, SlipBuilder, SlipRejection},
    tier::TierTable,
    types::{AmericanOdds, Game, Leg, ScoringScope, Slip},
    window::{eligible_window, filter_eligible_games},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gotlocks")]
#[command(about = "Pick-building rules for the gotLocks leaderboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tier and points for an odds value
    Tier {
        #[arg(allow_negative_numbers = true)]
        odds: AmericanOdds,
        /// Only show one table (global or group)
        #[arg(long)]
        scope: Option<ScoringScope>,
    },
    /// Convert decimal odds (e.g. 2.875) to American and show the tier
    Convert {
        decimal: Decimal,
        #[arg(long)]
        scope: Option<ScoringScope>,
    },
    /// Combine legs into combo odds
    Combo {
        #[arg(required = true, allow_negative_numbers = true)]
        odds: Vec<AmericanOdds>,
        #[arg(long)]
        scope: Option<ScoringScope>,
    },
    /// List games eligible for a slip deadline
    Window {
        /// Slip deadline (RFC 3339, e.g. 2026-10-19T19:00:00-04:00)
        #[arg(long)]
        deadline: DateTime<FixedOffset>,
        /// Window length in days after the deadline's date
        #[arg(long)]
        days: Option<u32>,
        /// JSON file with an array of games
        #[arg(long)]
        games: PathBuf,
    },
    /// Replay a slip draft through the pick rules
    Slip {
        /// JSON draft file
        file: PathBuf,
        /// Re-price every leg against the odds backend first
        #[arg(long)]
        live_odds: bool,
        /// Send accepted picks to the backend
        #[arg(long)]
        submit: bool,
    },
}

/// A draft read from disk. A pick with one leg is a single, more is a combo.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlipDraft {
    /// Omit for a profile post
    #[serde(default)]
    slip: Option<Slip>,
    games: Vec<Game>,
    picks: Vec<Vec<Leg>>,
    /// Evaluation time, defaults to the current time
    #[serde(default)]
    now: Option<DateTime<Utc>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Tier { odds, scope } => show_tier(odds, scope),
        Commands::Convert { decimal, scope } => show_tier(AmericanOdds::from_decimal(decimal)?, scope),
        Commands::Combo { odds, scope } => show_combo(&odds, scope),
        Commands::Window {
            deadline,
            days,
            games,
        } => show_window(&config, deadline, days, &games),
        Commands::Slip {
            file,
            live_odds,
            submit,
        } => run_slip(&config, &file, live_odds, submit).await,
    }
}

fn scopes(scope: Option<ScoringScope>) -> Vec<ScoringScope> {
    match scope {
        Some(s) => vec![s],
        None => vec![ScoringScope::Global, ScoringScope::Group],
    }
}

fn show_tier(odds: AmericanOdds, scope: Option<ScoringScope>) -> anyhow::Result<()> {
    println!(
        "Odds {} (decimal {:.3}, implied {:.1}%)",
        odds,
        odds.to_decimal(),
        odds.implied_probability() * Decimal::ONE_HUNDRED
    );
    for scope in scopes(scope) {
        let table = TierTable::for_scope(scope);
        let tier = table.resolve(odds.value());
        println!(
            "  {:<6} tier {:>2}/{:<2}  {:>3} pts",
            format!("{:?}", scope).to_lowercase(),
            tier.level,
            table.max_tier(),
            tier.points
        );
    }
    Ok(())
}

fn show_combo(legs: &[AmericanOdds], scope: Option<ScoringScope>) -> anyhow::Result<()> {
    let decimal = combined_decimal(legs)?.context("no legs")?;
    let combined = combine_odds(legs)?.context("no legs")?;
    println!(
        "{} legs → decimal {:.3}, American {}",
        legs.len(),
        decimal,
        combined
    );
    show_tier(combined, scope)
}

fn show_window(
    config: &Config,
    deadline: DateTime<FixedOffset>,
    days: Option<u32>,
    games_path: &Path,
) -> anyhow::Result<()> {
    let days = days.unwrap_or(config.slips.window_days);
    let games: Vec<Game> = read_json(games_path)?;
    let window = eligible_window(&deadline, days);

    println!(
        "Eligible {} → {} ({} days)",
        window.start,
        window.end,
        window.days()
    );
    let eligible = filter_eligible_games(&games, &deadline, days);
    for game in &eligible {
        println!(
            "  {:<10} {} @ {}  {}",
            game.id,
            game.away_team,
            game.home_team,
            game.commence_time.with_timezone(&deadline.timezone())
        );
    }
    println!("{} of {} games eligible", eligible.len(), games.len());
    Ok(())
}

async fn run_slip(config: &Config, path: &Path, live_odds: bool, submit: bool) -> anyhow::Result<()> {
    let draft: SlipDraft = read_json(path)?;
    let now = draft.now.unwrap_or_else(Utc::now);

    let mut builder = match draft.slip {
        Some(slip) => SlipBuilder::for_slip(slip, config),
        None => SlipBuilder::for_profile(config),
    };
    let scope = builder.destination().scope();

    let api = ApiClient::new(&config.api)?;
    let odds = FallbackOdds::new(HttpOddsSource::new(api.clone()), config.odds.fallback_odds);

    for (i, legs) in draft.picks.into_iter().enumerate() {
        let legs = if live_odds {
            reprice(&odds, legs, &draft.games, scope).await
        } else {
            legs
        };

        match add_pick(&mut builder, &config.combo, legs, &draft.games, now) {
            Ok(pick) => println!(
                "#{} accepted: {:?} {} → tier {} ({} pts)",
                i + 1,
                pick.kind,
                pick.odds,
                pick.tier,
                pick.points
            ),
            Err(rejection) => println!("#{} rejected: {}", i + 1, rejection),
        }
    }

    if let Some(remaining) = builder.remaining() {
        println!("{} picks left on this slip", remaining);
    }
    println!("Potential points: {}", builder.potential_points());

    if submit {
        let client = PicksClient::new(api);
        for pick in builder.picks() {
            match client.submit(pick).await {
                Ok(resp) if resp.success => println!("submitted {}", pick.id),
                Ok(resp) => println!(
                    "backend refused {}: {}",
                    pick.id,
                    resp.message.unwrap_or_default()
                ),
                Err(e) => tracing::error!(pick = %pick.id, "submit failed: {}", e),
            }
        }
    }
    Ok(())
}

fn add_pick<'a>(
    builder: &'a mut SlipBuilder,
    combo_config: &ComboConfig,
    legs: Vec<Leg>,
    games: &[Game],
    now: DateTime<Utc>,
) -> Result<&'a PickSubmission, SlipRejection> {
    let find = |id: &str| {
        games
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| SlipRejection::UnknownGame(id.to_string()))
    };

    if let [leg] = legs.as_slice() {
        let game = find(&leg.game_id)?;
        return builder.add_single(leg.clone(), game, now);
    }

    let mut combo = ComboBuilder::new(combo_config);
    for leg in legs {
        let game = find(&leg.game_id)?;
        combo.try_add(leg, game, now)?;
    }
    builder.add_combo(&combo, games, now)
}

async fn reprice(
    odds: &FallbackOdds<HttpOddsSource>,
    legs: Vec<Leg>,
    games: &[Game],
    scope: ScoringScope,
) -> Vec<Leg> {
    let mut priced = Vec::with_capacity(legs.len());
    for mut leg in legs {
        if let Some(game) = games.iter().find(|g| g.id == leg.game_id) {
            let quote = odds.quote(&LegQuery::new(&leg, game, scope)).await;
            leg.odds = quote.odds;
        }
        priced.push(leg);
    }
    priced
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
