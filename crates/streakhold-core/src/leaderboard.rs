//! Per-household rankings and the monthly archive.
//!
//! The leaderboard is the `leaderboard` section of the persisted
//! document. Ranking maps are `IndexMap`s sorted in place: insertion
//! order is what the stable sort falls back to on point ties, so the
//! serialized order is the display order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Household name -> (username -> points) for one snapshot.
pub type RankingsSnapshot = IndexMap<String, IndexMap<String, u64>>;

/// One archived month: the sorted rankings at reset time plus the single
/// top performer across all households.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// `MM-YYYY` label of the archived month.
    pub month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rankings: Option<RankingsSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_user: Option<String>,
    #[serde(default)]
    pub points: u64,
}

/// Current rankings plus the archive of past months.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    #[serde(default)]
    pub rankings: RankingsSnapshot,
    #[serde(default)]
    pub past_rankings: Vec<ArchiveEntry>,
}

fn sort_descending(rankings: &mut IndexMap<String, u64>) {
    // Stable sort by value only, so equal scores keep their prior order.
    rankings.sort_by(|_, a, _, b| b.cmp(a));
}

impl Leaderboard {
    /// Ensure a (possibly empty) ranking map exists for `household`.
    pub fn ensure_household(&mut self, household: &str) {
        self.rankings.entry(household.to_string()).or_default();
    }

    /// Upsert `username`'s points in `household`'s ranking, then re-sort
    /// that ranking descending by points.
    pub fn update(&mut self, household: &str, username: &str, points: u64) {
        let ranking = self.rankings.entry(household.to_string()).or_default();
        ranking.insert(username.to_string(), points);
        sort_descending(ranking);
    }

    /// Current ranking for `household`, sorted descending by points.
    ///
    /// Unknown or empty households yield an empty map with a logged
    /// warning; this never fails.
    pub fn sorted_rankings(&self, household: &str) -> IndexMap<String, u64> {
        match self.rankings.get(household) {
            Some(ranking) if !ranking.is_empty() => {
                let mut sorted = ranking.clone();
                sort_descending(&mut sorted);
                sorted
            }
            _ => {
                warn!(household, "no rankings found for household");
                IndexMap::new()
            }
        }
    }

    /// Archive the current rankings under `month` and clear them.
    ///
    /// Only non-empty household rankings are snapshotted. The top
    /// performer is the first user found at the maximum point total, in
    /// iteration order over households then users. With no non-empty
    /// rankings this is a no-op: nothing is archived and nothing cleared.
    pub fn reset_monthly(&mut self, month: &str) {
        let mut snapshot = RankingsSnapshot::new();
        for (household, ranking) in &self.rankings {
            if !ranking.is_empty() {
                let mut sorted = ranking.clone();
                sort_descending(&mut sorted);
                snapshot.insert(household.clone(), sorted);
            }
        }
        if snapshot.is_empty() {
            return;
        }

        let mut top_user = None;
        let mut top_points = 0u64;
        for ranking in snapshot.values() {
            for (username, points) in ranking {
                if *points > top_points {
                    top_user = Some(username.clone());
                    top_points = *points;
                }
            }
        }

        self.past_rankings.push(ArchiveEntry {
            month: month.to_string(),
            rankings: Some(snapshot),
            top_user,
            points: top_points,
        });
        self.rankings.clear();
    }

    /// Archive entries that recorded a top performer.
    pub fn top_performers(&self) -> Vec<&ArchiveEntry> {
        self.past_rankings
            .iter()
            .filter(|entry| entry.top_user.is_some())
            .collect()
    }

    /// Archive entries that carry a rankings snapshot.
    pub fn past_rankings(&self) -> Vec<&ArchiveEntry> {
        self.past_rankings
            .iter()
            .filter(|entry| entry.rankings.is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_sorts_descending() {
        let mut board = Leaderboard::default();
        board.update("Home", "alice", 10);
        board.update("Home", "bob", 30);
        board.update("Home", "carol", 20);

        let order: Vec<&str> = board.rankings["Home"].keys().map(String::as_str).collect();
        assert_eq!(order, ["bob", "carol", "alice"]);
    }

    #[test]
    fn update_is_stable_on_ties() {
        let mut board = Leaderboard::default();
        board.update("Home", "alice", 10);
        board.update("Home", "bob", 10);
        board.update("Home", "carol", 10);

        let order: Vec<&str> = board.rankings["Home"].keys().map(String::as_str).collect();
        assert_eq!(order, ["alice", "bob", "carol"]);
    }

    #[test]
    fn sorted_rankings_unknown_household_is_empty() {
        let board = Leaderboard::default();
        assert!(board.sorted_rankings("Nowhere").is_empty());
    }

    #[test]
    fn reset_monthly_archives_and_clears() {
        let mut board = Leaderboard::default();
        board.update("Home", "a", 10);
        board.update("Home", "b", 20);

        board.reset_monthly("03-2025");

        assert!(board.sorted_rankings("Home").is_empty());
        assert_eq!(board.past_rankings.len(), 1);
        let entry = &board.past_rankings[0];
        assert_eq!(entry.month, "03-2025");
        assert_eq!(entry.top_user.as_deref(), Some("b"));
        assert_eq!(entry.points, 20);
        let snapshot = entry.rankings.as_ref().unwrap();
        let order: Vec<&str> = snapshot["Home"].keys().map(String::as_str).collect();
        assert_eq!(order, ["b", "a"]);
    }

    #[test]
    fn reset_monthly_first_household_wins_exact_ties() {
        let mut board = Leaderboard::default();
        board.update("First", "alice", 20);
        board.update("Second", "bob", 20);

        board.reset_monthly("03-2025");
        assert_eq!(board.past_rankings[0].top_user.as_deref(), Some("alice"));
    }

    #[test]
    fn reset_monthly_noop_on_empty_state() {
        let mut board = Leaderboard::default();
        board.ensure_household("Home");

        board.reset_monthly("03-2025");
        assert!(board.past_rankings.is_empty());
        assert!(board.rankings.contains_key("Home"));
    }

    #[test]
    fn all_zero_snapshot_has_no_top_user() {
        let mut board = Leaderboard::default();
        board.update("Home", "alice", 0);

        board.reset_monthly("03-2025");
        assert_eq!(board.past_rankings.len(), 1);
        assert!(board.past_rankings[0].top_user.is_none());
        assert!(board.top_performers().is_empty());
        assert_eq!(board.past_rankings().len(), 1);
    }
}
