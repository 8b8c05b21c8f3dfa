//! gotLocks pick-building core
//!
//! Rules behind building picks for the gotLocks prediction leaderboard:
//! odds tiers, combo ("parlay") legs and slip limits, plus a thin client for
//! the backend that stores and grades picks.
//!
//! ## Architecture
//!
//! ```text
//! Leg ─► combo (validate, combine odds) ─► tier (odds → tier/points)
//!                                              │
//!                 window (eligible dates) ─► slip (limits, payload) ─► client ─► backend
//! ```

pub mod client;
pub mod combo;
pub mod config;
pub mod error;
pub mod slip;
pub mod tier;
pub mod types;
pub mod window;
