use serde::Deserialize;

/// Scoring weights and eligibility windows. The defaults are starting
/// points, not derived truths; every deployment can override them through
/// the environment (`DUET_ENGINE__DISTANCE_CAP_KM=80` and so on).
#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Candidates closer than this earn `distance_cap_km - distance`; beyond
    /// it the distance term is zero, never negative.
    #[serde(default = "default_distance_cap_km")]
    pub distance_cap_km: f64,
    /// Points per shared interest.
    #[serde(default = "default_interest_weight")]
    pub interest_weight: f64,
    /// Age gaps wider than this contribute nothing.
    #[serde(default = "default_age_cap")]
    pub age_cap: i32,
    /// Flat bonus for candidates active within the recency window.
    #[serde(default = "default_recency_bonus")]
    pub recency_bonus: f64,
    /// How recently a candidate must have been active to be eligible (and to
    /// earn the recency bonus).
    #[serde(default = "default_recency_window_secs")]
    pub recency_window_secs: i64,
    /// Page size when the caller does not pass one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_distance_cap_km() -> f64 { 50.0 }
fn default_interest_weight() -> f64 { 10.0 }
fn default_age_cap() -> i32 { 20 }
fn default_recency_bonus() -> f64 { 15.0 }
fn default_recency_window_secs() -> i64 { 604_800 } // 7 days
fn default_limit() -> usize { 20 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            distance_cap_km: default_distance_cap_km(),
            interest_weight: default_interest_weight(),
            age_cap: default_age_cap(),
            recency_bonus: default_recency_bonus(),
            recency_window_secs: default_recency_window_secs(),
            default_limit: default_limit(),
        }
    }
}

impl ScoringConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("DUET_ENGINE").separator("__"))
            .build()?;
        Ok(config.try_deserialize().unwrap_or_default())
    }
}
