//! Households: named member groups and their in-memory leaderboard.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// A named group of users, owned for leaderboard computation only.
///
/// The persistence layer stores membership as a list of usernames; this
/// type exists for in-memory ranking over fully materialized users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub name: String,
    #[serde(default)]
    pub members: Vec<User>,
}

impl Household {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: Vec::new(),
        }
    }

    /// Add a user unless a member with the same username already exists.
    /// Usernames are the identity of persisted users.
    pub fn add_member(&mut self, user: User) {
        if !self.members.iter().any(|m| m.username == user.username) {
            self.members.push(user);
        }
    }

    /// Members ordered by descending points. The sort is stable, so ties
    /// keep their insertion order.
    pub fn leaderboard(&self) -> Vec<&User> {
        let mut ranked: Vec<&User> = self.members.iter().collect();
        ranked.sort_by(|a, b| b.points.cmp(&a.points));
        ranked
    }
}
