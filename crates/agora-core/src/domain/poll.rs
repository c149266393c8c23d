//! Best-option vote counting for event polls.

use std::collections::HashMap;

use serde::Serialize;

use super::event::PollOption;

/// The winning option of a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestOption {
    pub option_id: i64,
    pub label: String,
    pub votes: i64,
}

/// Pick the option with the most votes.
///
/// `votes` holds one option id per cast vote. Ties go to the option proposed
/// first (lowest `position`, then lowest id). With no votes at all the
/// earliest option wins with zero votes. Votes for ids not in `options` are
/// ignored.
#[must_use]
pub fn best_option(options: &[PollOption], votes: &[i64]) -> Option<BestOption> {
    let mut counts: HashMap<i64, i64> = HashMap::with_capacity(options.len());
    for option_id in votes {
        *counts.entry(*option_id).or_default() += 1;
    }

    options
        .iter()
        .map(|opt| (opt, counts.get(&opt.id).copied().unwrap_or(0)))
        .min_by(|(a, a_votes), (b, b_votes)| {
            b_votes
                .cmp(a_votes)
                .then(a.position.cmp(&b.position))
                .then(a.id.cmp(&b.id))
        })
        .map(|(opt, votes)| BestOption {
            option_id: opt.id,
            label: opt.label.clone(),
            votes,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::PollKind;

    fn option(id: i64, position: i64, label: &str) -> PollOption {
        PollOption {
            id,
            event_id: 1,
            kind: PollKind::TimeSlot,
            label: label.to_string(),
            proposed_by: 1,
            position,
        }
    }

    #[test]
    fn test_no_options() {
        assert_eq!(best_option(&[], &[1, 2]), None);
    }

    #[test]
    fn test_highest_votes_wins() {
        let options = [option(1, 0, "9am"), option(2, 1, "noon"), option(3, 2, "3pm")];
        let best = best_option(&options, &[2, 3, 2, 1, 2]).unwrap();
        assert_eq!(best.option_id, 2);
        assert_eq!(best.votes, 3);
    }

    #[test]
    fn test_tie_goes_to_earliest_proposal() {
        let options = [option(10, 1, "noon"), option(11, 0, "9am")];
        let best = best_option(&options, &[10, 11]).unwrap();
        assert_eq!(best.label, "9am");
        assert_eq!(best.votes, 1);
    }

    #[test]
    fn test_zero_votes_yields_earliest() {
        let options = [option(4, 2, "late"), option(3, 0, "early"), option(5, 1, "mid")];
        let best = best_option(&options, &[]).unwrap();
        assert_eq!(best.option_id, 3);
        assert_eq!(best.votes, 0);
    }

    #[test]
    fn test_unknown_votes_ignored() {
        let options = [option(1, 0, "a"), option(2, 1, "b")];
        let best = best_option(&options, &[99, 99, 99, 2]).unwrap();
        assert_eq!(best.option_id, 2);
        assert_eq!(best.votes, 1);
    }
}
