//! The pairwise resolution table.
//!
//! Maps the ordered pair `(user1Action, user2Action)` to a terminal result
//! and the payout each side receives. Payouts are in addition to the fee
//! each side already paid when submitting.

use serde::Serialize;

use crate::constants::{MUTUAL_KISS_PAYOUT, MUTUAL_SLAP_PAYOUT, RUG_PAYOUT};
use crate::types::{Action, InteractionResult, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub result: InteractionResult,
    pub user1_delta: i64,
    pub user2_delta: i64,
    pub opens_chat: bool,
}

impl Outcome {
    /// Payout for the given side.
    pub fn delta_for(&self, side: Side) -> i64 {
        match side {
            Side::User1 => self.user1_delta,
            Side::User2 => self.user2_delta,
        }
    }
}

pub fn resolve(user1: Action, user2: Action) -> Outcome {
    use Action::{Kiss, Slap};

    match (user1, user2) {
        (Kiss, Kiss) => Outcome {
            result: InteractionResult::MutualKiss,
            user1_delta: MUTUAL_KISS_PAYOUT,
            user2_delta: MUTUAL_KISS_PAYOUT,
            opens_chat: true,
        },
        (Slap, Slap) => Outcome {
            result: InteractionResult::MutualSlap,
            user1_delta: MUTUAL_SLAP_PAYOUT,
            user2_delta: MUTUAL_SLAP_PAYOUT,
            opens_chat: false,
        },
        (Kiss, Slap) => Outcome {
            result: InteractionResult::KissSlap,
            user1_delta: 0,
            user2_delta: RUG_PAYOUT,
            opens_chat: false,
        },
        (Slap, Kiss) => Outcome {
            result: InteractionResult::SlapKiss,
            user1_delta: RUG_PAYOUT,
            user2_delta: 0,
            opens_chat: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutual_kiss_opens_chat() {
        let outcome = resolve(Action::Kiss, Action::Kiss);
        assert_eq!(outcome.result, InteractionResult::MutualKiss);
        assert_eq!((outcome.user1_delta, outcome.user2_delta), (10, 10));
        assert!(outcome.opens_chat);
    }

    #[test]
    fn test_mutual_slap() {
        let outcome = resolve(Action::Slap, Action::Slap);
        assert_eq!(outcome.result, InteractionResult::MutualSlap);
        assert_eq!((outcome.user1_delta, outcome.user2_delta), (5, 5));
        assert!(!outcome.opens_chat);
    }

    #[test]
    fn test_rug_pays_the_slapper() {
        let kiss_slap = resolve(Action::Kiss, Action::Slap);
        assert_eq!(kiss_slap.result, InteractionResult::KissSlap);
        assert_eq!(kiss_slap.delta_for(Side::User1), 0);
        assert_eq!(kiss_slap.delta_for(Side::User2), 15);

        let slap_kiss = resolve(Action::Slap, Action::Kiss);
        assert_eq!(slap_kiss.result, InteractionResult::SlapKiss);
        assert_eq!(slap_kiss.delta_for(Side::User1), 15);
        assert_eq!(slap_kiss.delta_for(Side::User2), 0);
        assert!(!slap_kiss.opens_chat);
    }

    #[test]
    fn test_only_mutual_kiss_opens_chat() {
        for a in Action::ALL {
            for b in Action::ALL {
                let outcome = resolve(*a, *b);
                assert_eq!(
                    outcome.opens_chat,
                    outcome.result == InteractionResult::MutualKiss
                );
            }
        }
    }
}
