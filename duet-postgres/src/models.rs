use std::collections::HashSet;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use duet_engine::{
    Decision, GeoPoint, Match, NewDecision, Profile, StoreError,
};
use uuid::Uuid;

use crate::schema::{dating_profiles, decisions, matches};

// --- Profile ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = dating_profiles)]
pub struct ProfileRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub seeking: String,
    pub latitude: f64,
    pub longitude: f64,
    pub search_radius_km: f64,
    pub interests: serde_json::Value,
    pub bio: Option<String>,
    pub is_active: bool,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let gender = row
            .gender
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(StoreError::Corrupt)?;
        let seeking = row.seeking.parse().map_err(StoreError::Corrupt)?;
        let interests: HashSet<String> = serde_json::from_value(row.interests)
            .map_err(|e| StoreError::Corrupt(format!("interests: {e}")))?;
        Ok(Profile {
            id: row.id,
            tenant_id: row.tenant_id,
            age: row.age,
            gender,
            seeking,
            location: GeoPoint { latitude: row.latitude, longitude: row.longitude },
            search_radius_km: row.search_radius_km,
            interests,
            bio: row.bio,
            is_active: row.is_active,
            last_active_at: row.last_active_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// --- Decision ---

#[derive(Debug, Queryable, Insertable, Clone)]
#[diesel(table_name = decisions)]
pub struct DecisionRow {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub outcome: String,
    pub decided_at: DateTime<Utc>,
}

impl From<NewDecision> for DecisionRow {
    fn from(d: NewDecision) -> Self {
        Self {
            tenant_id: d.tenant_id,
            actor_id: d.actor_id,
            target_id: d.target_id,
            outcome: d.outcome.as_str().to_string(),
            decided_at: d.decided_at,
        }
    }
}

impl TryFrom<DecisionRow> for Decision {
    type Error = StoreError;

    fn try_from(row: DecisionRow) -> Result<Self, Self::Error> {
        Ok(Decision {
            tenant_id: row.tenant_id,
            actor_id: row.actor_id,
            target_id: row.target_id,
            outcome: row.outcome.parse().map_err(StoreError::Corrupt)?,
            decided_at: row.decided_at,
        })
    }
}

// --- Match ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = matches)]
pub struct MatchRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub profile_a_id: Uuid,
    pub profile_b_id: Uuid,
    pub status: String,
    pub matched_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatchRow {
    pub tenant_id: Uuid,
    pub profile_a_id: Uuid,
    pub profile_b_id: Uuid,
    pub status: String,
    pub matched_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for Match {
    type Error = StoreError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        Ok(Match {
            id: row.id,
            tenant_id: row.tenant_id,
            profile_a_id: row.profile_a_id,
            profile_b_id: row.profile_b_id,
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            matched_at: row.matched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use duet_engine::{DecisionOutcome, Gender, MatchStatus, Seeking};

    use super::*;

    #[test]
    fn profile_row_maps_to_domain() {
        let now = Utc::now();
        let row = ProfileRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            age: Some(30),
            gender: Some("woman".into()),
            seeking: "everyone".into(),
            latitude: 48.8566,
            longitude: 2.3522,
            search_radius_km: 50.0,
            interests: serde_json::json!(["hiking", "music"]),
            bio: None,
            is_active: true,
            last_active_at: now,
            created_at: now,
            updated_at: now,
        };

        let profile = Profile::try_from(row).unwrap();
        assert_eq!(profile.gender, Some(Gender::Woman));
        assert_eq!(profile.seeking, Seeking::Everyone);
        assert!(profile.interests.contains("hiking"));
        assert!(profile.is_complete());
    }

    #[test]
    fn unknown_gender_is_a_corrupt_row() {
        let now = Utc::now();
        let row = ProfileRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            age: Some(30),
            gender: Some("martian".into()),
            seeking: "everyone".into(),
            latitude: 0.0,
            longitude: 0.0,
            search_radius_km: 50.0,
            interests: serde_json::json!([]),
            bio: None,
            is_active: true,
            last_active_at: now,
            created_at: now,
            updated_at: now,
        };

        assert!(matches!(Profile::try_from(row), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn decision_round_trips_through_row() {
        let d = NewDecision {
            tenant_id: Uuid::new_v4(),
            actor_id: Uuid::new_v4(),
            target_id: Uuid::new_v4(),
            outcome: DecisionOutcome::Rejected,
            decided_at: Utc::now(),
        };
        let row = DecisionRow::from(d.clone());
        assert_eq!(row.outcome, "rejected");

        let back = Decision::try_from(row).unwrap();
        assert_eq!(back.outcome, DecisionOutcome::Rejected);
        assert_eq!(back.actor_id, d.actor_id);
    }

    #[test]
    fn match_row_status_parses() {
        let row = MatchRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            profile_a_id: Uuid::new_v4(),
            profile_b_id: Uuid::new_v4(),
            status: "matched".into(),
            matched_at: Utc::now(),
        };
        assert_eq!(Match::try_from(row).unwrap().status, MatchStatus::Matched);
    }
}
