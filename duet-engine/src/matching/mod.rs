use std::cmp::Ordering;

use metrics::counter;
use serde::Serialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::ScoringConfig;
use crate::error::{EngineError, EngineResult};
use crate::geo::Distance;
use crate::models::{
    Decision, DecisionOutcome, Match, NewDecision, NewMatch, PairKey, Profile,
};
use crate::store::{DecisionStore, MatchStore, ProfileStore};

pub mod scoring;
pub mod state;

pub use state::PairState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub score: f64,
}

/// What `record_decision` returns. `match_created` is true only for the call
/// whose insert actually landed; re-detection returns the existing match
/// with the flag unset, so every observer sees the same match id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub decision: Decision,
    pub match_created: bool,
    pub matched: Option<Match>,
}

/// Stateless engine over injected collaborators. Safe to share across
/// worker threads; all state lives in the stores.
pub struct MatchingEngine<P, D, M, C, G> {
    profiles: P,
    decisions: D,
    matches: M,
    clock: C,
    distance: G,
    config: ScoringConfig,
}

impl<P, D, M, C, G> MatchingEngine<P, D, M, C, G>
where
    P: ProfileStore,
    D: DecisionStore,
    M: MatchStore,
    C: Clock,
    G: Distance,
{
    pub fn new(
        profiles: P,
        decisions: D,
        matches: M,
        clock: C,
        distance: G,
        config: ScoringConfig,
    ) -> Self {
        Self { profiles, decisions, matches, clock, distance, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Filter and rank a supplied candidate pool for the actor. Pure over
    /// its inputs plus the injected clock and distance function; an
    /// incomplete actor profile yields an empty list rather than an error.
    ///
    /// Order: descending score, ties by ascending candidate id, truncated
    /// to `limit` (config default when None). Identical inputs always
    /// produce the identical list.
    pub fn find_candidates(
        &self,
        tenant_id: Uuid,
        actor: &Profile,
        pool: &[Profile],
        limit: Option<usize>,
    ) -> EngineResult<Vec<ScoredCandidate>> {
        if !actor.is_complete() {
            tracing::debug!(actor = %actor.id, "incomplete profile, empty candidate list");
            return Ok(Vec::new());
        }

        let candidate_ids: Vec<Uuid> = pool.iter().map(|p| p.id).collect();
        let decided = self
            .decisions
            .decided_targets(tenant_id, actor.id, &candidate_ids)?;
        let now = self.clock.now();

        let mut ranked: Vec<ScoredCandidate> = pool
            .iter()
            .filter(|c| c.tenant_id == tenant_id)
            .filter_map(|c| {
                let km = self.distance.between_km(actor.location, c.location);
                if !scoring::is_eligible(actor, c, km, &decided, now, &self.config) {
                    return None;
                }
                Some(ScoredCandidate {
                    score: scoring::score(actor, c, km, now, &self.config),
                    profile: c.clone(),
                })
            })
            .collect();

        ranked.sort_by(|x, y| {
            y.score
                .partial_cmp(&x.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| x.profile.id.cmp(&y.profile.id))
        });
        ranked.truncate(limit.unwrap_or(self.config.default_limit));

        tracing::debug!(
            actor = %actor.id,
            pool = pool.len(),
            returned = ranked.len(),
            "candidates ranked"
        );
        Ok(ranked)
    }

    /// Load the actor and a radius pool from the profile store, then rank.
    /// Unknown actors get an empty list, same as incomplete ones.
    pub fn find_candidates_for(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        limit: Option<usize>,
    ) -> EngineResult<Vec<ScoredCandidate>> {
        let Some(actor) = self.profiles.find(tenant_id, actor_id)? else {
            return Ok(Vec::new());
        };
        if !actor.is_complete() {
            return Ok(Vec::new());
        }
        let pool = self
            .profiles
            .pool_within(tenant_id, actor.location, actor.search_radius_km)?;
        self.find_candidates(tenant_id, &actor, &pool, limit)
    }

    /// Record an accept/reject and, on mutual acceptance, create the match
    /// for the canonical pair exactly once.
    ///
    /// The decision upsert is durable on its own: if the match path fails
    /// afterwards, retrying this call re-detects mutuality from decision
    /// data and converges on the same match.
    pub fn record_decision(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
        outcome: DecisionOutcome,
    ) -> EngineResult<DecisionRecord> {
        if actor_id == target_id {
            return Err(EngineError::SelfDecision);
        }
        self.profiles
            .find(tenant_id, actor_id)?
            .ok_or(EngineError::ProfileNotFound { id: actor_id })?;
        self.profiles
            .find(tenant_id, target_id)?
            .ok_or(EngineError::ProfileNotFound { id: target_id })?;

        let decision = self.decisions.upsert(NewDecision {
            tenant_id,
            actor_id,
            target_id,
            outcome,
            decided_at: self.clock.now(),
        })?;

        // Rejection never creates a match, even against a standing accept.
        if outcome == DecisionOutcome::Rejected {
            return Ok(DecisionRecord { decision, match_created: false, matched: None });
        }

        let reverse = self.decisions.find(tenant_id, target_id, actor_id)?;
        let pair_state =
            PairState::from_decisions(Some(outcome), reverse.map(|r| r.outcome));
        if pair_state != PairState::Matched {
            return Ok(DecisionRecord { decision, match_created: false, matched: None });
        }

        let (matched, created) = self.matches.create(NewMatch {
            tenant_id,
            pair: PairKey::new(actor_id, target_id),
            matched_at: self.clock.now(),
        })?;

        if created {
            counter!("duet_matches_created_total").increment(1);
            tracing::info!(
                tenant = %tenant_id,
                match_id = %matched.id,
                profile_a = %matched.profile_a_id,
                profile_b = %matched.profile_b_id,
                "mutual accept, match created"
            );
        }

        Ok(DecisionRecord { decision, match_created: created, matched: Some(matched) })
    }
}
