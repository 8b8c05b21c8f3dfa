//! Combo ("parlay") construction
//!
//! Legs are checked one at a time before they join a combo. A leg that
//! breaks a rule comes back as a [`LegRejection`] carrying the message shown
//! to the user; nothing here panics on user input.
//!
//! Combined odds are the product of each leg's decimal odds, converted back
//! to American and scored on the same tier tables as single picks.

#[cfg(test)]
mod tests;

use crate::config::ComboConfig;
use crate::error::{PickError, Result};
use crate::tier::TierTable;
use crate::types::{gcd, AmericanOdds, Game, Leg, Market, ScoredPick, ScoringScope};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

/// Why a leg can't join a combo. `Display` is the user-facing reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LegRejection {
    #[error("This game is locked.")]
    GameLocked,

    #[error("Combos are limited to {0} legs.")]
    TooManyLegs(usize),

    #[error("This pick is already in your combo.")]
    Duplicate,

    #[error("You can't take both sides of the same market.")]
    BothSides,

    #[error("You already have a pick on this market.")]
    MarketTaken,

    #[error("Moneyline and spread on opposite teams contradict each other.")]
    OpposingTeams,

    #[error("That leg belongs to a different game.")]
    WrongGame,
}

impl LegRejection {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Check `candidate` against the legs already in a combo.
///
/// Rules are applied in a fixed order and the first failure wins.
pub fn validate_leg(
    existing: &[Leg],
    candidate: &Leg,
    game: &Game,
    now: DateTime<Utc>,
    max_legs: usize,
) -> std::result::Result<(), LegRejection> {
    if candidate.game_id != game.id {
        return Err(LegRejection::WrongGame);
    }
    if game.is_locked(now) {
        return Err(LegRejection::GameLocked);
    }
    if existing.len() >= max_legs {
        return Err(LegRejection::TooManyLegs(max_legs));
    }

    if let Some(leg) = existing.iter().find(|l| l.same_market(candidate)) {
        return Err(if leg.side == candidate.side && leg.line == candidate.line {
            LegRejection::Duplicate
        } else if leg.side == candidate.side.opposite() {
            LegRejection::BothSides
        } else {
            LegRejection::MarketTaken
        });
    }

    let opposing = existing.iter().any(|leg| {
        leg.game_id == candidate.game_id
            && is_team_market(&leg.market)
            && is_team_market(&candidate.market)
            && leg.side == candidate.side.opposite()
    });
    if opposing {
        return Err(LegRejection::OpposingTeams);
    }

    Ok(())
}

fn is_team_market(market: &Market) -> bool {
    matches!(market, Market::Moneyline | Market::Spread)
}

/// Multiply legs' decimal odds and express the result in American odds.
///
/// Returns `Ok(None)` when there are no legs. The product is kept as an exact
/// fraction and rounded once at the end, so leg order never changes the
/// result.
pub fn combine_odds(legs: &[AmericanOdds]) -> Result<Option<AmericanOdds>> {
    let Some((numerator, denominator)) = combined_ratio(legs)? else {
        return Ok(None);
    };
    AmericanOdds::from_ratio(numerator, denominator).map(Some)
}

/// Product of the legs' decimal odds, `None` for an empty slice
pub fn combined_decimal(legs: &[AmericanOdds]) -> Result<Option<Decimal>> {
    let Some((numerator, denominator)) = combined_ratio(legs)? else {
        return Ok(None);
    };
    let numerator = Decimal::from_u128(numerator).ok_or(PickError::OddsOverflow)?;
    let denominator = Decimal::from_u128(denominator).ok_or(PickError::OddsOverflow)?;
    numerator
        .checked_div(denominator)
        .map(Some)
        .ok_or(PickError::OddsOverflow)
}

/// Exact product of decimal odds as `(numerator, denominator)` in lowest terms
fn combined_ratio(legs: &[AmericanOdds]) -> Result<Option<(u128, u128)>> {
    if legs.is_empty() {
        return Ok(None);
    }
    legs.iter()
        .try_fold((1u128, 1u128), |(num, den), odds| {
            let (n, d) = odds.decimal_ratio();
            // Cross-reduce first so the running fraction stays in lowest terms
            let g1 = gcd(n, den);
            let g2 = gcd(d, num);
            let num = (num / g2).checked_mul(n / g1)?;
            let den = (den / g1).checked_mul(d / g2)?;
            Some((num, den))
        })
        .map(Some)
        .ok_or(PickError::OddsOverflow)
}

/// A combo under construction
#[derive(Debug, Clone)]
pub struct ComboBuilder {
    legs: Vec<Leg>,
    min_legs: usize,
    max_legs: usize,
}

impl ComboBuilder {
    pub fn new(config: &ComboConfig) -> Self {
        Self {
            legs: Vec::new(),
            min_legs: config.min_legs,
            max_legs: config.max_legs,
        }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Enough legs to submit as a combo
    pub fn is_complete(&self) -> bool {
        self.legs.len() >= self.min_legs
    }

    /// Validate and append a leg
    pub fn try_add(
        &mut self,
        leg: Leg,
        game: &Game,
        now: DateTime<Utc>,
    ) -> std::result::Result<(), LegRejection> {
        if let Err(rejection) = validate_leg(&self.legs, &leg, game, now, self.max_legs) {
            debug!(game = %leg.game_id, market = leg.market.name(), %rejection, "leg rejected");
            return Err(rejection);
        }
        self.legs.push(leg);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Leg> {
        (index < self.legs.len()).then(|| self.legs.remove(index))
    }

    pub fn combined_odds(&self) -> Result<Option<AmericanOdds>> {
        let odds: Vec<AmericanOdds> = self.legs.iter().map(|l| l.odds).collect();
        combine_odds(&odds)
    }

    /// Combined odds and tier for `scope`, `None` while the combo is empty
    pub fn score(&self, scope: ScoringScope) -> Result<Option<ScoredPick>> {
        let table = TierTable::for_scope(scope);
        Ok(self.combined_odds()?.map(|odds| table.score(odds)))
    }
}
