use crate::models::DecisionOutcome;

/// Where an unordered pair of profiles sits in the decision lifecycle.
/// `Matched` may later be flagged expired by an external policy; that
/// transition lives in the match store, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    NoDecision,
    OneSided,
    Matched,
    Declined,
}

impl PairState {
    /// Derive the state from the two directed decisions of a pair. A single
    /// rejection declines the pair regardless of the other direction.
    pub fn from_decisions(
        forward: Option<DecisionOutcome>,
        reverse: Option<DecisionOutcome>,
    ) -> Self {
        use DecisionOutcome::{Accepted, Rejected};
        match (forward, reverse) {
            (None, None) => Self::NoDecision,
            (Some(Rejected), _) | (_, Some(Rejected)) => Self::Declined,
            (Some(Accepted), Some(Accepted)) => Self::Matched,
            _ => Self::OneSided,
        }
    }
}
