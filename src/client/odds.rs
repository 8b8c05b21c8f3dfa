//! Live odds lookup with a local fallback

use super::ApiClient;
use crate::error::{PickError, Result};
use crate::types::{AmericanOdds, Game, Leg, Market, ScoringScope, Side};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What the odds backend needs to price one leg
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegQuery {
    pub scope: ScoringScope,
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
}

impl LegQuery {
    pub fn new(leg: &Leg, game: &Game, scope: ScoringScope) -> Self {
        let (player_id, stat) = match &leg.market {
            Market::PlayerProp { player_id, stat } => (Some(player_id.clone()), Some(stat.clone())),
            _ => (None, None),
        };
        Self {
            scope,
            game_id: leg.game_id.clone(),
            market: leg.market.name().to_string(),
            team: game.team(leg.side).map(str::to_string),
            player_id,
            stat,
            side: leg.side,
            threshold: leg.line,
        }
    }
}

/// Anything that can price a leg
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsSource: Send + Sync {
    async fn quote(&self, query: &LegQuery) -> Result<AmericanOdds>;
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    odds: Option<AmericanOdds>,
    #[serde(default)]
    message: Option<String>,
}

/// Prices legs through the backend's `odds/validate` endpoint
#[derive(Clone)]
pub struct HttpOddsSource {
    api: ApiClient,
}

impl HttpOddsSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OddsSource for HttpOddsSource {
    async fn quote(&self, query: &LegQuery) -> Result<AmericanOdds> {
        let resp: ValidateResponse = self.api.post_json("odds/validate", query).await?;
        resp.odds.ok_or_else(|| {
            PickError::OddsUnavailable(
                resp.message
                    .unwrap_or_else(|| format!("no price for {} on {}", query.market, query.game_id)),
            )
        })
    }
}

/// A price and whether it came from the live feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub odds: AmericanOdds,
    pub live: bool,
}

/// Wraps a source so a lookup always yields a price
pub struct FallbackOdds<S> {
    inner: S,
    fallback: AmericanOdds,
}

impl<S: OddsSource> FallbackOdds<S> {
    pub fn new(inner: S, fallback: AmericanOdds) -> Self {
        Self { inner, fallback }
    }

    pub async fn quote(&self, query: &LegQuery) -> Quote {
        match self.inner.quote(query).await {
            Ok(odds) => Quote { odds, live: true },
            Err(e) => {
                warn!(
                    game = %query.game_id,
                    market = %query.market,
                    fallback = %self.fallback,
                    "odds unavailable, using fallback: {}",
                    e
                );
                Quote {
                    odds: self.fallback,
                    live: false,
                }
            }
        }
    }
}
