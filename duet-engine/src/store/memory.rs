use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use uuid::Uuid;

use crate::error::StoreError;
use crate::geo::{Distance, Haversine};
use crate::models::{
    Decision, GeoPoint, Match, MatchStatus, NewDecision, NewMatch, PairKey, Profile,
};
use crate::store::{DecisionStore, MatchStore, ProfileStore};

/// In-memory store backing all three store traits. One mutex guards all
/// tables, so uniqueness checks and inserts are atomic with respect to each
/// other; the conflict-return-existing semantics match the Postgres adapter.
///
/// Cloning shares the underlying state, so tests can hand the same store to
/// the engine and keep a handle for seeding and assertions.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    /// (tenant, profile id)
    profiles: HashMap<(Uuid, Uuid), Profile>,
    /// (tenant, actor, target)
    decisions: HashMap<(Uuid, Uuid, Uuid), Decision>,
    /// (tenant, canonical pair)
    matches: HashMap<(Uuid, PairKey), Match>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let mut t = self.lock()?;
        t.profiles.insert((profile.tenant_id, profile.id), profile);
        Ok(())
    }

    pub fn match_count(&self, tenant_id: Uuid) -> Result<usize, StoreError> {
        let t = self.lock()?;
        Ok(t.matches.keys().filter(|(tid, _)| *tid == tenant_id).count())
    }

    pub fn decision_count(&self, tenant_id: Uuid) -> Result<usize, StoreError> {
        let t = self.lock()?;
        Ok(t.decisions.keys().filter(|(tid, _, _)| *tid == tenant_id).count())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::unavailable(anyhow!("store lock poisoned")))
    }
}

impl ProfileStore for MemoryStore {
    fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let t = self.lock()?;
        Ok(t.profiles.get(&(tenant_id, id)).cloned())
    }

    fn pool_within(
        &self,
        tenant_id: Uuid,
        origin: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Profile>, StoreError> {
        let t = self.lock()?;
        let mut pool: Vec<Profile> = t
            .profiles
            .values()
            .filter(|p| p.tenant_id == tenant_id)
            .filter(|p| Haversine.between_km(origin, p.location) <= radius_km)
            .cloned()
            .collect();
        // Stable order keeps test runs reproducible regardless of map iteration.
        pool.sort_by_key(|p| p.id);
        Ok(pool)
    }
}

impl DecisionStore for MemoryStore {
    fn upsert(&self, decision: NewDecision) -> Result<Decision, StoreError> {
        let mut t = self.lock()?;
        let key = (decision.tenant_id, decision.actor_id, decision.target_id);
        if let Some(existing) = t.decisions.get_mut(&key) {
            if existing.outcome == decision.outcome {
                // Same outcome: true no-op, original timestamp survives.
                return Ok(existing.clone());
            }
            existing.outcome = decision.outcome;
            existing.decided_at = decision.decided_at;
            return Ok(existing.clone());
        }
        let row = Decision {
            tenant_id: decision.tenant_id,
            actor_id: decision.actor_id,
            target_id: decision.target_id,
            outcome: decision.outcome,
            decided_at: decision.decided_at,
        };
        t.decisions.insert(key, row.clone());
        Ok(row)
    }

    fn find(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Decision>, StoreError> {
        let t = self.lock()?;
        Ok(t.decisions.get(&(tenant_id, actor_id, target_id)).cloned())
    }

    fn decided_targets(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        candidate_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, StoreError> {
        let t = self.lock()?;
        Ok(candidate_ids
            .iter()
            .filter(|cid| t.decisions.contains_key(&(tenant_id, actor_id, **cid)))
            .copied()
            .collect())
    }
}

impl MatchStore for MemoryStore {
    fn create(&self, m: NewMatch) -> Result<(Match, bool), StoreError> {
        let mut t = self.lock()?;
        let key = (m.tenant_id, m.pair);
        if let Some(existing) = t.matches.get(&key) {
            return Ok((existing.clone(), false));
        }
        let row = Match {
            id: Uuid::new_v4(),
            tenant_id: m.tenant_id,
            profile_a_id: m.pair.a,
            profile_b_id: m.pair.b,
            status: MatchStatus::Matched,
            matched_at: m.matched_at,
        };
        t.matches.insert(key, row.clone());
        Ok((row, true))
    }

    fn find_by_pair(&self, tenant_id: Uuid, pair: PairKey) -> Result<Option<Match>, StoreError> {
        let t = self.lock()?;
        Ok(t.matches.get(&(tenant_id, pair)).cloned())
    }

    fn mark_expired(&self, tenant_id: Uuid, pair: PairKey) -> Result<Option<Match>, StoreError> {
        let mut t = self.lock()?;
        Ok(t.matches.get_mut(&(tenant_id, pair)).map(|m| {
            m.status = MatchStatus::Expired;
            m.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::DecisionOutcome;

    fn new_decision(tenant: Uuid, actor: Uuid, target: Uuid, outcome: DecisionOutcome) -> NewDecision {
        NewDecision {
            tenant_id: tenant,
            actor_id: actor,
            target_id: target,
            outcome,
            decided_at: Utc::now(),
        }
    }

    #[test]
    fn upsert_same_outcome_keeps_original_row() {
        let store = MemoryStore::new();
        let (tenant, a, b) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let first = store
            .upsert(new_decision(tenant, a, b, DecisionOutcome::Accepted))
            .unwrap();
        let second = store
            .upsert(new_decision(tenant, a, b, DecisionOutcome::Accepted))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.decision_count(tenant).unwrap(), 1);
    }

    #[test]
    fn upsert_changed_mind_overwrites() {
        let store = MemoryStore::new();
        let (tenant, a, b) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        store
            .upsert(new_decision(tenant, a, b, DecisionOutcome::Rejected))
            .unwrap();
        let updated = store
            .upsert(new_decision(tenant, a, b, DecisionOutcome::Accepted))
            .unwrap();

        assert_eq!(updated.outcome, DecisionOutcome::Accepted);
        assert_eq!(store.decision_count(tenant).unwrap(), 1);
    }

    #[test]
    fn create_match_returns_existing_on_second_call() {
        let store = MemoryStore::new();
        let tenant = Uuid::new_v4();
        let pair = PairKey::new(Uuid::new_v4(), Uuid::new_v4());
        let m = NewMatch { tenant_id: tenant, pair, matched_at: Utc::now() };

        let (first, created_first) = store.create(m.clone()).unwrap();
        let (second, created_second) = store.create(m).unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first.id, second.id);
        assert_eq!(first.status, MatchStatus::Matched);
        assert_eq!(store.match_count(tenant).unwrap(), 1);
    }

    #[test]
    fn mark_expired_flips_status_without_deleting() {
        let store = MemoryStore::new();
        let tenant = Uuid::new_v4();
        let pair = PairKey::new(Uuid::new_v4(), Uuid::new_v4());
        store
            .create(NewMatch { tenant_id: tenant, pair, matched_at: Utc::now() })
            .unwrap();

        let expired = store.mark_expired(tenant, pair).unwrap().unwrap();
        assert_eq!(expired.status, MatchStatus::Expired);
        assert_eq!(store.match_count(tenant).unwrap(), 1);
        assert!(store.mark_expired(tenant, PairKey::new(Uuid::new_v4(), Uuid::new_v4())).unwrap().is_none());
    }

    #[test]
    fn decided_targets_filters_to_requested_ids() {
        let store = MemoryStore::new();
        let (tenant, actor) = (Uuid::new_v4(), Uuid::new_v4());
        let (b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        store.upsert(new_decision(tenant, actor, b, DecisionOutcome::Accepted)).unwrap();
        store.upsert(new_decision(tenant, actor, c, DecisionOutcome::Rejected)).unwrap();

        let decided = store.decided_targets(tenant, actor, &[b, d]).unwrap();
        assert!(decided.contains(&b));
        assert!(!decided.contains(&c));
        assert!(!decided.contains(&d));
    }
}
