use std::collections::HashSet;

use anyhow::anyhow;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use duet_engine::store::{DecisionStore, MatchStore, ProfileStore};
use duet_engine::{
    Decision, Distance, GeoPoint, Haversine, Match, MatchStatus, NewDecision, NewMatch, PairKey,
    Profile, StoreError,
};
use uuid::Uuid;

use crate::models::{DecisionRow, MatchRow, NewMatchRow, ProfileRow};
use crate::schema::{dating_profiles, decisions, matches};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Postgres-backed implementation of all three store traits. Uniqueness of
/// decisions and matches rests on the table keys: decisions are keyed by
/// (tenant, actor, target), matches carry a unique index on
/// (tenant, profile_a, profile_b).
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn connect(database_url: &str, max_size: u32) -> anyhow::Result<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder().max_size(max_size).build(manager)?;
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
        self.pool.get().map_err(StoreError::unavailable)
    }
}

fn db_err(e: diesel::result::Error) -> StoreError {
    StoreError::unavailable(e)
}

impl ProfileStore for PgStore {
    fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let mut conn = self.conn()?;
        let row = dating_profiles::table
            .filter(dating_profiles::tenant_id.eq(tenant_id))
            .filter(dating_profiles::id.eq(id))
            .first::<ProfileRow>(&mut conn)
            .optional()
            .map_err(db_err)?;
        row.map(Profile::try_from).transpose()
    }

    fn pool_within(
        &self,
        tenant_id: Uuid,
        origin: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Profile>, StoreError> {
        // Coarse bounding box in SQL, exact haversine in Rust. One degree of
        // latitude is ~111 km; longitude shrinks with cos(latitude).
        let lat_delta = radius_km / 111.0;
        let lng_delta = radius_km / (111.0 * origin.latitude.to_radians().cos().abs().max(0.01));

        let mut conn = self.conn()?;
        let rows = dating_profiles::table
            .filter(dating_profiles::tenant_id.eq(tenant_id))
            .filter(dating_profiles::is_active.eq(true))
            .filter(
                dating_profiles::latitude
                    .between(origin.latitude - lat_delta, origin.latitude + lat_delta),
            )
            .filter(
                dating_profiles::longitude
                    .between(origin.longitude - lng_delta, origin.longitude + lng_delta),
            )
            .order(dating_profiles::id.asc())
            .load::<ProfileRow>(&mut conn)
            .map_err(db_err)?;

        let mut pool = Vec::with_capacity(rows.len());
        for row in rows {
            let profile = Profile::try_from(row)?;
            if Haversine.between_km(origin, profile.location) <= radius_km {
                pool.push(profile);
            }
        }
        Ok(pool)
    }
}

impl DecisionStore for PgStore {
    fn upsert(&self, decision: NewDecision) -> Result<Decision, StoreError> {
        // Same-outcome writes are no-ops that keep the original timestamp,
        // so repeated calls return identical rows.
        if let Some(existing) = DecisionStore::find(
            self,
            decision.tenant_id,
            decision.actor_id,
            decision.target_id,
        )? {
            if existing.outcome == decision.outcome {
                return Ok(existing);
            }
        }

        let row = DecisionRow::from(decision);
        let mut conn = self.conn()?;
        let upserted = diesel::insert_into(decisions::table)
            .values(&row)
            .on_conflict((
                decisions::tenant_id,
                decisions::actor_id,
                decisions::target_id,
            ))
            .do_update()
            .set((
                decisions::outcome.eq(&row.outcome),
                decisions::decided_at.eq(row.decided_at),
            ))
            .get_result::<DecisionRow>(&mut conn)
            .map_err(db_err)?;
        upserted.try_into()
    }

    fn find(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<Decision>, StoreError> {
        let mut conn = self.conn()?;
        let row = decisions::table
            .find((tenant_id, actor_id, target_id))
            .first::<DecisionRow>(&mut conn)
            .optional()
            .map_err(db_err)?;
        row.map(Decision::try_from).transpose()
    }

    fn decided_targets(
        &self,
        tenant_id: Uuid,
        actor_id: Uuid,
        candidate_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, StoreError> {
        if candidate_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.conn()?;
        let ids = decisions::table
            .filter(decisions::tenant_id.eq(tenant_id))
            .filter(decisions::actor_id.eq(actor_id))
            .filter(decisions::target_id.eq_any(candidate_ids))
            .select(decisions::target_id)
            .load::<Uuid>(&mut conn)
            .map_err(db_err)?;
        Ok(ids.into_iter().collect())
    }
}

impl MatchStore for PgStore {
    fn create(&self, m: NewMatch) -> Result<(Match, bool), StoreError> {
        let row = NewMatchRow {
            tenant_id: m.tenant_id,
            profile_a_id: m.pair.a,
            profile_b_id: m.pair.b,
            status: MatchStatus::Matched.as_str().to_string(),
            matched_at: m.matched_at,
        };

        let mut conn = self.conn()?;
        let inserted = diesel::insert_into(matches::table)
            .values(&row)
            .on_conflict((
                matches::tenant_id,
                matches::profile_a_id,
                matches::profile_b_id,
            ))
            .do_nothing()
            .get_result::<MatchRow>(&mut conn)
            .optional()
            .map_err(db_err)?;

        if let Some(winner) = inserted {
            return Ok((winner.try_into()?, true));
        }

        // Lost the insert race: the winning row exists, return it.
        tracing::debug!(
            tenant = %m.tenant_id,
            profile_a = %m.pair.a,
            profile_b = %m.pair.b,
            "match insert conflicted, returning existing row"
        );
        drop(conn);
        let winner = self
            .find_by_pair(m.tenant_id, m.pair)?
            .ok_or_else(|| StoreError::unavailable(anyhow!("match row missing after conflict")))?;
        Ok((winner, false))
    }

    fn find_by_pair(&self, tenant_id: Uuid, pair: PairKey) -> Result<Option<Match>, StoreError> {
        let mut conn = self.conn()?;
        let row = matches::table
            .filter(matches::tenant_id.eq(tenant_id))
            .filter(matches::profile_a_id.eq(pair.a))
            .filter(matches::profile_b_id.eq(pair.b))
            .first::<MatchRow>(&mut conn)
            .optional()
            .map_err(db_err)?;
        row.map(Match::try_from).transpose()
    }

    fn mark_expired(&self, tenant_id: Uuid, pair: PairKey) -> Result<Option<Match>, StoreError> {
        let mut conn = self.conn()?;
        let row = diesel::update(
            matches::table
                .filter(matches::tenant_id.eq(tenant_id))
                .filter(matches::profile_a_id.eq(pair.a))
                .filter(matches::profile_b_id.eq(pair.b)),
        )
        .set(matches::status.eq(MatchStatus::Expired.as_str()))
        .get_result::<MatchRow>(&mut conn)
        .optional()
        .map_err(db_err)?;
        row.map(Match::try_from).transpose()
    }
}
