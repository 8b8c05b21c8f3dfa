//! Core types shared across the pick-building pipeline

use crate::error::{PickError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signed American odds (`-150`, `+200`).
///
/// Values strictly between -100 and +100 don't exist in this format and are
/// rejected on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    /// The usual -110 price on both sides of a spread or total
    pub const STANDARD: Self = Self(-110);
    pub const EVEN: Self = Self(100);

    pub fn new(value: i32) -> Result<Self> {
        if value.unsigned_abs() >= 100 {
            Ok(Self(value))
        } else {
            Err(PickError::InvalidOdds(value as i64))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_favorite(self) -> bool {
        self.0 < 0
    }

    /// Decimal (European) odds: total return per unit staked
    pub fn to_decimal(self) -> Decimal {
        let v = Decimal::from(self.0);
        if self.0 > 0 {
            Decimal::ONE + v / Decimal::ONE_HUNDRED
        } else {
            Decimal::ONE + Decimal::ONE_HUNDRED / v.abs()
        }
    }

    /// Decimal odds as an exact fraction `(numerator, denominator)`, in lowest terms
    pub fn decimal_ratio(self) -> (u128, u128) {
        let v = u128::from(self.0.unsigned_abs());
        let (numerator, denominator) = if self.0 > 0 { (v + 100, 100) } else { (v + 100, v) };
        let g = gcd(numerator, denominator);
        (numerator / g, denominator / g)
    }

    /// Convert decimal odds back to American, rounding to the nearest whole
    /// number (half away from zero).
    pub fn from_decimal(decimal: Decimal) -> Result<Self> {
        if decimal <= Decimal::ONE {
            return Err(PickError::InvalidInput(format!(
                "decimal odds must be greater than 1, got {}",
                decimal
            )));
        }
        let numerator = u128::try_from(decimal.mantissa()).map_err(|_| PickError::OddsOverflow)?;
        let denominator = 10u128
            .checked_pow(decimal.scale())
            .ok_or(PickError::OddsOverflow)?;
        Self::from_ratio(numerator, denominator)
    }

    /// Convert exact decimal odds `numerator / denominator` to American.
    ///
    /// Rounds once, to the nearest whole number with halves away from zero.
    pub fn from_ratio(numerator: u128, denominator: u128) -> Result<Self> {
        if denominator == 0 || numerator <= denominator {
            return Err(PickError::InvalidInput(format!(
                "decimal odds must be greater than 1, got {}/{}",
                numerator, denominator
            )));
        }

        // d >= 2 -> +(d - 1) * 100, d < 2 -> -100 / (d - 1)
        let profit = numerator - denominator;
        let (dividend, divisor, favorite) = if profit >= denominator {
            (profit.checked_mul(100), denominator, false)
        } else {
            (denominator.checked_mul(100), profit, true)
        };
        let dividend = dividend.ok_or(PickError::OddsOverflow)?;

        let mut magnitude = dividend / divisor;
        let remainder = dividend % divisor;
        if remainder >= divisor - remainder {
            magnitude += 1;
        }

        let magnitude = i32::try_from(magnitude).map_err(|_| PickError::OddsOverflow)?;
        Self::new(if favorite { -magnitude } else { magnitude })
    }

    /// Break-even probability implied by the price, vig included
    pub fn implied_probability(self) -> Decimal {
        Decimal::ONE / self.to_decimal()
    }
}

/// Greatest common divisor
pub(crate) fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

impl TryFrom<i32> for AmericanOdds {
    type Error = PickError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AmericanOdds> for i32 {
    fn from(odds: AmericanOdds) -> i32 {
        odds.0
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for AmericanOdds {
    type Err = PickError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let value: i32 = digits
            .parse()
            .map_err(|_| PickError::InvalidInput(format!("not an odds value: {:?}", s)))?;
        Self::new(value)
    }
}

/// A scheduled game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
}

impl Game {
    /// Picks on a game close once it starts
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        now >= self.commence_time
    }

    pub fn team(&self, side: Side) -> Option<&str> {
        match side {
            Side::Home => Some(&self.home_team),
            Side::Away => Some(&self.away_team),
            Side::Over | Side::Under => None,
        }
    }
}

/// What a pick is on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Market {
    Moneyline,
    Spread,
    Total,
    PlayerProp { player_id: String, stat: String },
}

impl Market {
    pub fn name(&self) -> &'static str {
        match self {
            Market::Moneyline => "moneyline",
            Market::Spread => "spread",
            Market::Total => "total",
            Market::PlayerProp { .. } => "player_prop",
        }
    }

    /// Team markets are picked Home/Away, line markets Over/Under
    pub fn accepts(&self, side: Side) -> bool {
        match self {
            Market::Moneyline | Market::Spread => side.is_team(),
            Market::Total | Market::PlayerProp { .. } => !side.is_team(),
        }
    }

    pub fn requires_line(&self) -> bool {
        !matches!(self, Market::Moneyline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
    Over,
    Under,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
            Side::Over => Side::Under,
            Side::Under => Side::Over,
        }
    }

    pub fn is_team(self) -> bool {
        matches!(self, Side::Home | Side::Away)
    }
}

/// One pick inside a combo. Immutable once built.
///
/// Deserialization goes through [`Leg::new`], so a leg read from JSON has
/// already had its side and line checked against the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLeg")]
pub struct Leg {
    pub game_id: String,
    pub market: Market,
    pub side: Side,
    /// Spread, total or prop threshold. `None` for moneylines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Decimal>,
    pub odds: AmericanOdds,
}

/// Unchecked wire form of a [`Leg`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeg {
    game_id: String,
    market: Market,
    side: Side,
    #[serde(default)]
    line: Option<Decimal>,
    odds: AmericanOdds,
}

impl TryFrom<RawLeg> for Leg {
    type Error = PickError;

    fn try_from(raw: RawLeg) -> Result<Self> {
        Self::new(raw.game_id, raw.market, raw.side, raw.line, raw.odds)
    }
}

impl Leg {
    /// Build a leg, checking that side and line fit the market.
    pub fn new(
        game_id: impl Into<String>,
        market: Market,
        side: Side,
        line: Option<Decimal>,
        odds: AmericanOdds,
    ) -> Result<Self> {
        if !market.accepts(side) {
            return Err(PickError::InvalidInput(format!(
                "{:?} is not a valid side for a {} pick",
                side,
                market.name()
            )));
        }
        if market.requires_line() && line.is_none() {
            return Err(PickError::InvalidInput(format!(
                "a {} pick needs a line",
                market.name()
            )));
        }
        Ok(Self {
            game_id: game_id.into(),
            market,
            side,
            line,
            odds,
        })
    }

    pub fn moneyline(game_id: impl Into<String>, side: Side, odds: AmericanOdds) -> Result<Self> {
        Self::new(game_id, Market::Moneyline, side, None, odds)
    }

    /// Same game and market, regardless of side or line
    pub fn same_market(&self, other: &Leg) -> bool {
        self.game_id == other.game_id && self.market == other.market
    }
}

/// Difficulty bucket and the points a correct pick is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub level: u8,
    pub points: u32,
}

/// Odds with their resolved tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredPick {
    pub odds: AmericanOdds,
    pub tier: Tier,
}

/// Which leaderboard a pick is scored for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringScope {
    /// Profile posts and the global leaderboard
    #[default]
    Global,
    /// Group slips, capped at a lower max tier
    Group,
}

impl FromStr for ScoringScope {
    type Err = PickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "global" | "profile" => Ok(ScoringScope::Global),
            "group" => Ok(ScoringScope::Group),
            other => Err(PickError::InvalidInput(format!("unknown scope: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingMode {
    /// Correct picks earn their tier points
    #[default]
    Points,
    /// Every correct pick is worth one point
    WinLoss,
}

/// A group-scoped collection window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slip {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub deadline: DateTime<Utc>,
    /// Falls back to `[slips] pick_limit` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_limit: Option<u32>,
    #[serde(default)]
    pub grading_mode: GradingMode,
    /// Falls back to `[slips] window_days` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,
}

impl Slip {
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }
}
