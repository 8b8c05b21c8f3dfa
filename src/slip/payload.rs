//! Wire format for picks sent to the backend

use super::Destination;
use crate::types::{AmericanOdds, Game, Leg, Market, ScoredPick, ScoringScope, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickKind {
    Single,
    Combo,
}

/// One leg as the backend expects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegPayload {
    pub game_id: String,
    pub market: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<String>,
    pub side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Decimal>,
    pub odds: AmericanOdds,
}

impl LegPayload {
    pub fn new(leg: &Leg, game: &Game) -> Self {
        let (player_id, stat) = match &leg.market {
            Market::PlayerProp { player_id, stat } => (Some(player_id.clone()), Some(stat.clone())),
            _ => (None, None),
        };
        Self {
            game_id: leg.game_id.clone(),
            market: leg.market.name().to_string(),
            team: game.team(leg.side).map(str::to_string),
            player_id,
            stat,
            side: leg.side,
            threshold: leg.line,
            odds: leg.odds,
        }
    }
}

/// A scored pick ready to POST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickSubmission {
    pub id: Uuid,
    pub scope: ScoringScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub kind: PickKind,
    pub odds: AmericanOdds,
    pub tier: u8,
    pub points: u32,
    pub legs: Vec<LegPayload>,
    pub created_at: DateTime<Utc>,
}

impl PickSubmission {
    pub(super) fn single(
        id: Uuid,
        destination: &Destination,
        leg: &Leg,
        game: &Game,
        scored: ScoredPick,
        now: DateTime<Utc>,
    ) -> Self {
        Self::build(
            id,
            destination,
            PickKind::Single,
            vec![LegPayload::new(leg, game)],
            scored,
            now,
        )
    }

    pub(super) fn combo(
        id: Uuid,
        destination: &Destination,
        legs: &[Leg],
        games: &[&Game],
        scored: ScoredPick,
        now: DateTime<Utc>,
    ) -> Self {
        let legs = legs
            .iter()
            .zip(games)
            .map(|(leg, game)| LegPayload::new(leg, game))
            .collect();
        Self::build(id, destination, PickKind::Combo, legs, scored, now)
    }

    fn build(
        id: Uuid,
        destination: &Destination,
        kind: PickKind,
        legs: Vec<LegPayload>,
        scored: ScoredPick,
        now: DateTime<Utc>,
    ) -> Self {
        let (slip_id, group_id) = match destination {
            Destination::Slip(slip) => (Some(slip.id.clone()), Some(slip.group_id.clone())),
            Destination::Profile => (None, None),
        };
        Self {
            id,
            scope: destination.scope(),
            slip_id,
            group_id,
            kind,
            odds: scored.odds,
            tier: scored.tier.level,
            points: scored.tier.points,
            legs,
            created_at: now,
        }
    }
}
