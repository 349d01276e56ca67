//! Candidate matching and ranking engine for the dating feature.
//!
//! Two operations, both taking tenant scope and actor identity explicitly:
//! [`MatchingEngine::find_candidates`] filters and scores a supplied profile
//! pool, and [`MatchingEngine::record_decision`] runs the accept/reject
//! state machine, creating at most one match per unordered pair even under
//! concurrent decisions from both sides.
//!
//! Storage, time, and distance are injected through the traits in [`store`],
//! [`clock`], and [`geo`]; [`store::memory::MemoryStore`] backs tests and
//! embedders, `duet-postgres` backs production.

pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod matching;
pub mod models;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ScoringConfig;
pub use error::{EngineError, EngineResult, StoreError};
pub use geo::{Distance, Haversine};
pub use matching::{DecisionRecord, MatchingEngine, PairState, ScoredCandidate};
pub use models::{
    Decision, DecisionOutcome, Gender, GeoPoint, Match, MatchStatus, NewDecision, NewMatch,
    PairKey, Profile, Seeking,
};
