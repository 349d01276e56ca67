use std::collections::HashSet;

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Decision, GeoPoint, Match, NewDecision, NewMatch, PairKey, Profile};

pub mod memory;

/// Read access to profiles. The engine never writes profiles; ownership
/// stays with the surrounding application.
pub trait ProfileStore: Send + Sync {
    fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Candidate pool around an origin. Implementations may over-fetch (a
    /// bounding box is fine); the engine re-checks exact distance per
    /// candidate.
    fn pool_within(
        &self,
        tenant_id: Uuid,
        origin: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Profile>, StoreError>;
}

/// Decisions are keyed by (tenant, actor, target). Upsert semantics: a
/// same-outcome write is a no-op that returns the existing row unchanged; a
/// different outcome overwrites it.
pub trait DecisionStore: Send + Sync {
    fn upsert(&self, decision: NewDecision) -> Result<Decision, StoreError>;

    fn find(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Decision>, StoreError>;

    /// Which of `candidate_ids` the actor has already decided on, in one
    /// round trip.
    fn decided_targets(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        candidate_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, StoreError>;
}

/// Matches are keyed by the canonical pair; at most one row per pair, ever.
pub trait MatchStore: Send + Sync {
    /// Insert a match for the pair, or return the existing row if one
    /// already exists (including when a concurrent insert wins the race).
    /// The bool is true only for the caller whose insert landed.
    fn create(&self, m: NewMatch) -> Result<(Match, bool), StoreError>;

    fn find_by_pair(&self, tenant_id: Uuid, pair: PairKey) -> Result<Option<Match>, StoreError>;

    /// Hook for the external expiry policy; the engine itself never calls
    /// this. Returns the updated row, or None if no match exists.
    fn mark_expired(&self, tenant_id: Uuid, pair: PairKey) -> Result<Option<Match>, StoreError>;
}
