//! Leaderboard service - ranks users by approved submissions.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::ApprovedRecord;
use crate::ports::{CoreError, SubmissionRepository};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub user_id: i64,
    pub username: String,
    pub total_approved_submissions: i64,
    pub total_earned_cents: i64,
}

pub struct LeaderboardService {
    submissions: Arc<dyn SubmissionRepository>,
}

impl LeaderboardService {
    pub fn new(submissions: Arc<dyn SubmissionRepository>) -> Self {
        Self { submissions }
    }

    pub async fn top(&self, limit: Option<usize>) -> Result<Vec<LeaderboardEntry>, CoreError> {
        let records = self.submissions.list_approved().await?;
        Ok(rank(&records, limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT)))
    }
}

/// Count approved submissions per user and keep the top `limit`.
///
/// Ordered by approved count desc, then total earned desc, then username asc.
pub fn rank(records: &[ApprovedRecord], limit: usize) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<i64, (String, i64, i64)> = HashMap::new();
    for record in records {
        let entry = totals
            .entry(record.user_id)
            .or_insert_with(|| (record.username.clone(), 0, 0));
        entry.1 += 1;
        entry.2 += record.reward_cents;
    }

    let mut rows: Vec<_> = totals.into_iter().collect();
    rows.sort_by(|(_, (a_name, a_count, a_earned)), (_, (b_name, b_count, b_earned))| {
        b_count
            .cmp(a_count)
            .then(b_earned.cmp(a_earned))
            .then(a_name.cmp(b_name))
    });

    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (user_id, (username, count, earned)))| LeaderboardEntry {
            rank: i + 1,
            user_id,
            username,
            total_approved_submissions: count,
            total_earned_cents: earned,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(user_id: i64, username: &str, reward_cents: i64) -> ApprovedRecord {
        ApprovedRecord {
            user_id,
            username: username.to_string(),
            reward_cents,
        }
    }

    #[test]
    fn test_rank_orders_by_count_then_earned_then_name() {
        let records = vec![
            approved(1, "cedar", 100),
            approved(2, "aspen", 500),
            approved(1, "cedar", 100),
            approved(3, "birch", 50),
            approved(3, "birch", 50),
            approved(4, "alder", 500),
        ];
        let board = rank(&records, 10);
        let names: Vec<_> = board.iter().map(|e| e.username.as_str()).collect();
        // cedar and birch have 2 each; cedar earned more. aspen and alder tie fully.
        assert_eq!(names, ["cedar", "birch", "alder", "aspen"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].total_approved_submissions, 2);
        assert_eq!(board[0].total_earned_cents, 200);
    }

    #[test]
    fn test_rank_respects_limit() {
        let records: Vec<_> = (0..20).map(|i| approved(i, &format!("u{i:02}"), 1)).collect();
        let board = rank(&records, 3);
        assert_eq!(board.len(), 3);
        assert_eq!(board[2].rank, 3);
        assert_eq!(board[0].username, "u00");
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&[], 10).is_empty());
    }
}
