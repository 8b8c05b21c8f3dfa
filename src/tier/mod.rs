//! Odds-to-tier resolution
//!
//! Maps American odds to a difficulty tier and the points a correct pick
//! earns. Two tables exist: the global table used for profile posts and the
//! global leaderboard, and a group table capped at a lower max tier.
//!
//! Each table is a sorted array of half-open brackets `[min_odds, max_odds)`.
//! The first bracket starts below `i32::MIN` and the last ends above
//! `i32::MAX`, so every odds value resolves to exactly one tier.


use crate::types::{AmericanOdds, ScoredPick, ScoringScope, Tier};

/// One row of a tier table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OddsBracket {
    /// Inclusive lower bound
    pub min_odds: i64,
    /// Exclusive upper bound
    pub max_odds: i64,
    pub tier: u8,
    pub points: u32,
}

impl OddsBracket {
    const fn new(min_odds: i64, max_odds: i64, tier: u8, points: u32) -> Self {
        Self {
            min_odds,
            max_odds,
            tier,
            points,
        }
    }

    pub fn contains(&self, odds: i64) -> bool {
        odds >= self.min_odds && odds < self.max_odds
    }
}

const LOWEST: i64 = i64::MIN;
const HIGHEST: i64 = i64::MAX;

const GLOBAL_BRACKETS: [OddsBracket; 14] = [
    OddsBracket::new(LOWEST, -1000, 1, 1),
    OddsBracket::new(-1000, -500, 2, 2),
    OddsBracket::new(-500, -250, 3, 3),
    OddsBracket::new(-250, 0, 4, 5),
    OddsBracket::new(0, 150, 5, 8),
    OddsBracket::new(150, 200, 6, 10),
    OddsBracket::new(200, 300, 7, 13),
    OddsBracket::new(300, 400, 8, 16),
    OddsBracket::new(400, 500, 9, 20),
    OddsBracket::new(500, 750, 10, 25),
    OddsBracket::new(750, 1000, 11, 30),
    OddsBracket::new(1000, 1500, 12, 40),
    OddsBracket::new(1500, 2500, 13, 50),
    OddsBracket::new(2500, HIGHEST, 14, 75),
];

const GROUP_BRACKETS: [OddsBracket; 6] = [
    OddsBracket::new(LOWEST, -250, 1, 1),
    OddsBracket::new(-250, 0, 2, 2),
    OddsBracket::new(0, 200, 3, 3),
    OddsBracket::new(200, 400, 4, 4),
    OddsBracket::new(400, 700, 5, 5),
    OddsBracket::new(700, HIGHEST, 6, 6),
];

/// A sorted, contiguous bracket table
#[derive(Debug, Clone, Copy)]
pub struct TierTable {
    brackets: &'static [OddsBracket],
}

impl TierTable {
    pub const GLOBAL: TierTable = TierTable {
        brackets: &GLOBAL_BRACKETS,
    };

    pub const GROUP: TierTable = TierTable {
        brackets: &GROUP_BRACKETS,
    };

    pub fn for_scope(scope: ScoringScope) -> Self {
        match scope {
            ScoringScope::Global => Self::GLOBAL,
            ScoringScope::Group => Self::GROUP,
        }
    }

    pub fn brackets(&self) -> &'static [OddsBracket] {
        self.brackets
    }

    /// Highest tier this table can award
    pub fn max_tier(&self) -> u8 {
        self.brackets.last().map(|b| b.tier).unwrap_or(0)
    }

    /// Resolve any integer odds value to its tier.
    ///
    /// Boundary values belong to the bracket they open: `0` is in `[0, 150)`,
    /// `-250` in `[-250, 0)`.
    pub fn resolve(&self, odds: i32) -> Tier {
        let odds = i64::from(odds);
        // Index of the first bracket whose upper bound is past `odds`
        let idx = self.brackets.partition_point(|b| b.max_odds <= odds);
        let bracket = &self.brackets[idx.min(self.brackets.len() - 1)];
        debug_assert!(bracket.contains(odds));
        Tier {
            level: bracket.tier,
            points: bracket.points,
        }
    }

    pub fn score(&self, odds: AmericanOdds) -> ScoredPick {
        ScoredPick {
            odds,
            tier: self.resolve(odds.value()),
        }
    }
}

/// Resolve odds to a tier on the table for `scope`
pub fn resolve_tier(odds: i32, scope: ScoringScope) -> Tier {
    TierTable::for_scope(scope).resolve(odds)
}

/// Score validated odds on the table for `scope`
pub fn score(odds: AmericanOdds, scope: ScoringScope) -> ScoredPick {
    TierTable::for_scope(scope).score(odds)
}
