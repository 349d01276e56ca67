use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Profile ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Man,
    Woman,
    NonBinary,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Man => "man",
            Self::Woman => "woman",
            Self::NonBinary => "non_binary",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "man" => Ok(Self::Man),
            "woman" => Ok(Self::Woman),
            "non_binary" => Ok(Self::NonBinary),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// Who a profile wants to see in its candidate feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seeking {
    Men,
    Women,
    Everyone,
}

impl Seeking {
    pub fn accepts(self, gender: Gender) -> bool {
        match self {
            Self::Men => gender == Gender::Man,
            Self::Women => gender == Gender::Woman,
            Self::Everyone => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Everyone => "everyone",
        }
    }
}

impl FromStr for Seeking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "everyone" => Ok(Self::Everyone),
            other => Err(format!("unknown seeking value: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub seeking: Seeking,
    pub location: GeoPoint,
    pub search_radius_km: f64,
    pub interests: HashSet<String>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Age and gender are required before a profile may appear in anyone's feed.
    pub fn is_complete(&self) -> bool {
        self.age.is_some() && self.gender.is_some()
    }
}

// --- Decision ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Accepted,
    Rejected,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for DecisionOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown decision outcome: {other}")),
        }
    }
}

/// One actor's judgment about one target. At most one row per
/// (tenant, actor, target); a later decision replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub outcome: DecisionOutcome,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDecision {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub outcome: DecisionOutcome,
    pub decided_at: DateTime<Utc>,
}

// --- Match ---

/// Unordered profile pair normalized to (lower, higher) id so it can serve
/// as a unique key regardless of who acted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub a: Uuid,
    pub b: Uuid,
}

impl PairKey {
    pub fn new(x: Uuid, y: Uuid) -> Self {
        let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
        Self { a: lo, b: hi }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Matched,
    Expired,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Expired => "expired",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "matched" => Ok(Self::Matched),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown match status: {other}")),
        }
    }
}

/// A confirmed mutual acceptance. `profile_a_id < profile_b_id` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub profile_a_id: Uuid,
    pub profile_b_id: Uuid,
    pub status: MatchStatus,
    pub matched_at: DateTime<Utc>,
}

impl Match {
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.profile_a_id, self.profile_b_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub tenant_id: Uuid,
    pub pair: PairKey,
    pub matched_at: DateTime<Utc>,
}
