//! Ranking service - read-only standings derived from current point totals
//!
//! Ordering is points descending, ties broken by ascending user id.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::models::{level, EntityId, User, UserView};
use crate::store::{EntityStore, Tables};

/// A user with the number of endorsements they have given
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndorserStanding {
    #[serde(flatten)]
    pub user: UserView,
    pub endorsement_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_skills: u64,
    /// Sum of `endorsementCount` over the user's skills
    #[serde(rename = "totalEndorsements")]
    pub total_endorsements_received: u64,
    pub points: u64,
    pub level: u64,
    pub rank: u64,
}

pub struct RankingService {
    store: Arc<EntityStore>,
}

impl RankingService {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// 1-based position of the user in the points ordering
    pub fn rank_of(&self, user_id: EntityId) -> Result<u64> {
        self.store.with_read(|t| rank_in(t, user_id))
    }

    /// Users ordered by endorsements given
    pub fn top_endorsers(&self, limit: usize) -> Result<Vec<EndorserStanding>> {
        self.store.with_read(|t| {
            let mut given: HashMap<EntityId, u64> = HashMap::new();
            for endorsement in t.endorsements.list() {
                *given.entry(endorsement.endorser_id).or_default() += 1;
            }

            let mut standings: Vec<(&User, u64)> = t
                .users
                .list()
                .map(|u| (u, given.get(&u.id).copied().unwrap_or(0)))
                .collect();
            standings.sort_by_key(|(u, count)| (Reverse(*count), u.id));

            Ok(standings
                .into_iter()
                .take(limit)
                .map(|(user, endorsement_count)| EndorserStanding {
                    user: user.into(),
                    endorsement_count,
                })
                .collect())
        })
    }

    /// Users ordered by points
    pub fn top_by_points(&self, limit: usize) -> Result<Vec<UserView>> {
        self.store.with_read(|t| {
            Ok(by_points(t)
                .into_iter()
                .take(limit)
                .map(UserView::from)
                .collect())
        })
    }

    /// Skill, endorsement and rank summary for one user
    pub fn user_stats(&self, user_id: EntityId) -> Result<UserStats> {
        self.store.with_read(|t| {
            let user = t.users.require(user_id)?;
            let (total_skills, total_endorsements_received) = t
                .skills_of(user_id)
                .fold((0u64, 0u64), |(skills, endorsements), s| {
                    (skills + 1, endorsements + s.endorsement_count)
                });

            Ok(UserStats {
                total_skills,
                total_endorsements_received,
                points: user.points,
                level: level(user.points),
                rank: rank_in(t, user_id)?,
            })
        })
    }
}

/// All users, points descending then id ascending
fn by_points(t: &Tables) -> Vec<&User> {
    let mut users: Vec<&User> = t.users.list().collect();
    users.sort_by_key(|u| (Reverse(u.points), u.id));
    users
}

fn rank_in(t: &Tables, user_id: EntityId) -> Result<u64> {
    t.users.require(user_id)?;
    let position = by_points(t)
        .iter()
        .position(|u| u.id == user_id)
        .unwrap_or_default();
    Ok(position as u64 + 1)
}
