use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::ScoringConfig;
use crate::models::Profile;

/// Both sides must want to see each other. Symmetric by construction:
/// swapping actor and candidate gives the same answer.
pub fn mutually_compatible(actor: &Profile, candidate: &Profile) -> bool {
    match (actor.gender, candidate.gender) {
        (Some(a), Some(c)) => actor.seeking.accepts(c) && candidate.seeking.accepts(a),
        _ => false,
    }
}

pub fn within_recency_window(
    candidate: &Profile,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> bool {
    now.signed_duration_since(candidate.last_active_at)
        <= Duration::seconds(config.recency_window_secs)
}

/// All filters must hold for a candidate to survive. Distance is computed
/// once by the caller and passed in.
pub fn is_eligible(
    actor: &Profile,
    candidate: &Profile,
    distance_km: f64,
    decided: &HashSet<Uuid>,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> bool {
    candidate.id != actor.id
        && candidate.is_complete()
        && mutually_compatible(actor, candidate)
        && !decided.contains(&candidate.id)
        && distance_km <= actor.search_radius_km
        && candidate.is_active
        && within_recency_window(candidate, now, config)
}

/// Sum of four non-negative terms. A candidate past the distance cap or the
/// age cap contributes zero on that term, never a negative value.
pub fn score(
    actor: &Profile,
    candidate: &Profile,
    distance_km: f64,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> f64 {
    distance_term(distance_km, config)
        + interest_term(actor, candidate, config)
        + age_term(actor, candidate, config)
        + recency_term(candidate, now, config)
}

fn distance_term(distance_km: f64, config: &ScoringConfig) -> f64 {
    (config.distance_cap_km - distance_km).max(0.0)
}

fn interest_term(actor: &Profile, candidate: &Profile, config: &ScoringConfig) -> f64 {
    let shared = actor.interests.intersection(&candidate.interests).count();
    shared as f64 * config.interest_weight
}

fn age_term(actor: &Profile, candidate: &Profile, config: &ScoringConfig) -> f64 {
    match (actor.age, candidate.age) {
        (Some(a), Some(c)) => f64::from((config.age_cap - (a - c).abs()).max(0)),
        _ => 0.0,
    }
}

fn recency_term(candidate: &Profile, now: DateTime<Utc>, config: &ScoringConfig) -> f64 {
    if within_recency_window(candidate, now, config) {
        config.recency_bonus
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Gender, GeoPoint, Seeking};

    fn profile(age: i32, gender: Gender, seeking: Seeking, interests: &[&str]) -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            age: Some(age),
            gender: Some(gender),
            seeking,
            location: GeoPoint { latitude: 0.0, longitude: 0.0 },
            search_radius_km: 50.0,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            bio: None,
            is_active: true,
            last_active_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn compatibility_requires_both_directions() {
        let a = profile(30, Gender::Man, Seeking::Women, &[]);
        let mut b = profile(28, Gender::Woman, Seeking::Men, &[]);
        assert!(mutually_compatible(&a, &b));

        b.seeking = Seeking::Women;
        assert!(!mutually_compatible(&a, &b), "one-directional interest is not enough");
    }

    #[test]
    fn incomplete_candidate_is_never_compatible() {
        let a = profile(30, Gender::Man, Seeking::Everyone, &[]);
        let mut b = profile(28, Gender::Woman, Seeking::Everyone, &[]);
        b.gender = None;
        assert!(!mutually_compatible(&a, &b));
    }

    #[test]
    fn distance_term_caps_at_zero() {
        let cfg = ScoringConfig::default();
        assert_eq!(distance_term(5.0, &cfg), 45.0);
        assert_eq!(distance_term(50.0, &cfg), 0.0);
        assert_eq!(distance_term(60.0, &cfg), 0.0);
    }

    #[test]
    fn interest_term_counts_shared_only() {
        let cfg = ScoringConfig::default();
        let a = profile(30, Gender::Man, Seeking::Women, &["hiking", "music"]);
        let b = profile(30, Gender::Woman, Seeking::Men, &["hiking", "travel"]);
        assert_eq!(interest_term(&a, &b, &cfg), 10.0);

        let c = profile(30, Gender::Woman, Seeking::Men, &["chess"]);
        assert_eq!(interest_term(&a, &c, &cfg), 0.0);
    }

    #[test]
    fn age_term_caps_at_zero() {
        let cfg = ScoringConfig::default();
        let a = profile(30, Gender::Man, Seeking::Women, &[]);
        let near = profile(33, Gender::Woman, Seeking::Men, &[]);
        let far = profile(55, Gender::Woman, Seeking::Men, &[]);
        assert_eq!(age_term(&a, &near, &cfg), 17.0);
        assert_eq!(age_term(&a, &far, &cfg), 0.0);
    }

    #[test]
    fn recency_bonus_only_within_window() {
        let cfg = ScoringConfig::default();
        let now = Utc::now();
        let mut b = profile(30, Gender::Woman, Seeking::Men, &[]);

        b.last_active_at = now - chrono::Duration::hours(1);
        assert_eq!(recency_term(&b, now, &cfg), 15.0);

        b.last_active_at = now - chrono::Duration::days(8);
        assert_eq!(recency_term(&b, now, &cfg), 0.0);
    }

    #[test]
    fn eligibility_rejects_decided_inactive_and_out_of_range() {
        let cfg = ScoringConfig::default();
        let now = Utc::now();
        let a = profile(30, Gender::Man, Seeking::Women, &[]);
        let b = profile(28, Gender::Woman, Seeking::Men, &[]);
        let none = HashSet::new();

        assert!(is_eligible(&a, &b, 5.0, &none, now, &cfg));
        assert!(!is_eligible(&a, &a, 0.0, &none, now, &cfg), "self is never a candidate");
        assert!(!is_eligible(&a, &b, 60.0, &none, now, &cfg), "outside actor radius");

        let decided: HashSet<Uuid> = [b.id].into_iter().collect();
        assert!(!is_eligible(&a, &b, 5.0, &decided, now, &cfg), "already decided");

        let mut inactive = b.clone();
        inactive.is_active = false;
        assert!(!is_eligible(&a, &inactive, 5.0, &none, now, &cfg));

        let mut stale = b.clone();
        stale.last_active_at = now - chrono::Duration::days(10);
        assert!(!is_eligible(&a, &stale, 5.0, &none, now, &cfg));
    }
}
