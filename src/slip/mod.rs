//! Pick submission rules for group slips and profile posts
//!
//! [`SlipBuilder`] applies the checks a user hits while filling a slip
//! (deadline, pick limit, locked games, eligible dates) and turns accepted
//! picks into [`PickSubmission`] payloads for the backend.

mod payload;

pub use payload::{LegPayload, PickKind, PickSubmission};

use crate::combo::{validate_leg, ComboBuilder, LegRejection};
use crate::config::{ComboConfig, Config, SlipConfig};
use crate::tier::TierTable;
use crate::types::{AmericanOdds, Game, GradingMode, Leg, ScoredPick, ScoringScope, Slip};
use crate::window::{eligible_window, DateWindow};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Why a pick can't go on a slip. `Display` is the user-facing reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlipRejection {
    #[error("This slip is closed.")]
    SlipClosed,

    #[error("Pick limit reached ({0} picks per slip).")]
    PickLimitReached(u32),

    #[error("This game is locked.")]
    GameLocked,

    #[error("This game isn't eligible for this slip.")]
    OutsideWindow,

    #[error("Game {0} isn't available.")]
    UnknownGame(String),

    #[error("Combos need at least {0} legs.")]
    IncompleteCombo(usize),

    #[error("Combined odds are out of range.")]
    OddsOutOfRange,

    #[error(transparent)]
    Leg(#[from] LegRejection),
}

impl SlipRejection {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Where picks are headed
#[derive(Debug, Clone)]
pub enum Destination {
    Slip(Slip),
    /// A personal post scored on the global leaderboard
    Profile,
}

impl Destination {
    pub fn scope(&self) -> ScoringScope {
        match self {
            Destination::Slip(_) => ScoringScope::Group,
            Destination::Profile => ScoringScope::Global,
        }
    }
}

/// Collects picks for one destination
#[derive(Debug, Clone)]
pub struct SlipBuilder {
    destination: Destination,
    combo: ComboConfig,
    /// Pick limit and window in force, the slip's own values over `[slips]`
    limits: SlipConfig,
    picks: Vec<PickSubmission>,
}

impl SlipBuilder {
    pub fn for_slip(slip: Slip, config: &Config) -> Self {
        let limits = SlipConfig {
            window_days: slip.window_days.unwrap_or(config.slips.window_days),
            pick_limit: slip.pick_limit.unwrap_or(config.slips.pick_limit),
        };
        Self {
            destination: Destination::Slip(slip),
            combo: config.combo.clone(),
            limits,
            picks: Vec::new(),
        }
    }

    pub fn for_profile(config: &Config) -> Self {
        Self {
            destination: Destination::Profile,
            combo: config.combo.clone(),
            limits: config.slips.clone(),
            picks: Vec::new(),
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn picks(&self) -> &[PickSubmission] {
        &self.picks
    }

    pub fn into_picks(self) -> Vec<PickSubmission> {
        self.picks
    }

    /// Eligible dates, `None` for profile posts
    pub fn window(&self) -> Option<DateWindow> {
        match &self.destination {
            Destination::Slip(slip) => Some(eligible_window(&slip.deadline, self.limits.window_days)),
            Destination::Profile => None,
        }
    }

    /// Picks still allowed, `None` when unlimited
    pub fn remaining(&self) -> Option<u32> {
        match &self.destination {
            Destination::Slip(_) => {
                let used = u32::try_from(self.picks.len()).unwrap_or(u32::MAX);
                Some(self.limits.pick_limit.saturating_sub(used))
            }
            Destination::Profile => None,
        }
    }

    /// Add a single pick
    pub fn add_single(
        &mut self,
        leg: Leg,
        game: &Game,
        now: DateTime<Utc>,
    ) -> Result<&PickSubmission, SlipRejection> {
        self.check_open(now)?;
        self.check_game(game, now)?;
        if leg.game_id != game.id {
            return Err(LegRejection::WrongGame.into());
        }

        let scored = self.scored(leg.odds);
        let pick = PickSubmission::single(self.new_id(), &self.destination, &leg, game, scored, now);
        Ok(self.push(pick))
    }

    /// Add a finished combo. `games` must contain every leg's game.
    ///
    /// Legs are re-validated from scratch: a game may have locked since the
    /// leg was picked.
    pub fn add_combo(
        &mut self,
        combo: &ComboBuilder,
        games: &[Game],
        now: DateTime<Utc>,
    ) -> Result<&PickSubmission, SlipRejection> {
        self.check_open(now)?;
        if !combo.is_complete() || combo.len() < self.combo.min_legs {
            return Err(SlipRejection::IncompleteCombo(self.combo.min_legs));
        }

        let mut accepted: Vec<Leg> = Vec::with_capacity(combo.len());
        let mut leg_games: Vec<&Game> = Vec::with_capacity(combo.len());
        for leg in combo.legs() {
            let game = games
                .iter()
                .find(|g| g.id == leg.game_id)
                .ok_or_else(|| SlipRejection::UnknownGame(leg.game_id.clone()))?;
            self.check_game(game, now)?;
            validate_leg(&accepted, leg, game, now, self.combo.max_legs)?;
            accepted.push(leg.clone());
            leg_games.push(game);
        }

        let odds = combo
            .combined_odds()
            .ok()
            .flatten()
            .ok_or(SlipRejection::OddsOutOfRange)?;
        let scored = self.scored(odds);
        let pick = PickSubmission::combo(
            self.new_id(),
            &self.destination,
            &accepted,
            &leg_games,
            scored,
            now,
        );
        Ok(self.push(pick))
    }

    /// Drop a pick, freeing its slot
    pub fn remove(&mut self, id: Uuid) -> Option<PickSubmission> {
        let idx = self.picks.iter().position(|p| p.id == id)?;
        Some(self.picks.remove(idx))
    }

    /// Total points on the board if every pick hits
    pub fn potential_points(&self) -> u32 {
        self.picks.iter().map(|p| p.points).sum()
    }

    fn check_open(&self, now: DateTime<Utc>) -> Result<(), SlipRejection> {
        if let Destination::Slip(slip) = &self.destination {
            if slip.is_closed(now) {
                return Err(SlipRejection::SlipClosed);
            }
            if self.picks.len() >= self.limits.pick_limit as usize {
                return Err(SlipRejection::PickLimitReached(self.limits.pick_limit));
            }
        }
        Ok(())
    }

    fn check_game(&self, game: &Game, now: DateTime<Utc>) -> Result<(), SlipRejection> {
        if game.is_locked(now) {
            return Err(SlipRejection::GameLocked);
        }
        if let Destination::Slip(slip) = &self.destination {
            let window = eligible_window(&slip.deadline, self.limits.window_days);
            if !window.contains(game.commence_time.date_naive()) {
                debug!(game = %game.id, slip = %slip.id, "game outside slip window");
                return Err(SlipRejection::OutsideWindow);
            }
        }
        Ok(())
    }

    /// Score on the destination's table; win/loss slips flatten every pick to one point
    fn scored(&self, odds: AmericanOdds) -> ScoredPick {
        let mut scored = TierTable::for_scope(self.destination.scope()).score(odds);
        if let Destination::Slip(slip) = &self.destination {
            if slip.grading_mode == GradingMode::WinLoss {
                scored.tier.points = 1;
            }
        }
        scored
    }

    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn push(&mut self, pick: PickSubmission) -> &PickSubmission {
        info!(
            pick = %pick.id,
            kind = ?pick.kind,
            odds = %pick.odds,
            tier = pick.tier,
            points = pick.points,
            "pick added"
        );
        self.picks.push(pick);
        &self.picks[self.picks.len() - 1]
    }
}
