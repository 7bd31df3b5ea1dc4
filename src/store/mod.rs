//! Entity Store - in-memory tables for users, skills, endorsements and achievements
//!
//! The store offers CRUD primitives only. Cross-entity invariants
//! (endorsement counts, point totals) are the scoring engine's job; it keeps
//! them by doing all related writes inside a single `with_write` call.
//!
//! ## Locking
//!
//! All four tables sit behind one `RwLock`. Readers share the lock and
//! always see a consistent snapshot; a writer holds it for the whole
//! multi-table mutation.

pub mod table;

use std::sync::RwLock;

use tracing::debug;

use crate::error::{Result, SkillboardError};
use crate::models::{Achievement, Endorsement, EntityId, Skill, User};

pub use table::{Entity, Table};

/// The four entity tables
#[derive(Debug, Default)]
pub struct Tables {
    pub users: Table<User>,
    pub skills: Table<Skill>,
    pub endorsements: Table<Endorsement>,
    pub achievements: Table<Achievement>,
}

/// Point total of one user before and after an award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsAward {
    pub user_id: EntityId,
    pub before: u64,
    pub after: u64,
}

impl PointsAward {
    pub fn level_before(&self) -> u64 {
        crate::models::level(self.before)
    }

    pub fn level_after(&self) -> u64 {
        crate::models::level(self.after)
    }

    pub fn leveled_up(&self) -> bool {
        self.level_after() > self.level_before()
    }
}

impl Tables {
    pub fn find_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.list().find(|u| u.username == username)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .list()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn skills_of(&self, user_id: EntityId) -> impl Iterator<Item = &Skill> + '_ {
        self.skills.list_by(|s| s.user_id, user_id)
    }

    pub fn endorsements_for_skill(
        &self,
        skill_id: EntityId,
    ) -> impl Iterator<Item = &Endorsement> + '_ {
        self.endorsements.list_by(|e| e.skill_id, skill_id)
    }

    /// Endorsements where the user is the endorsee
    pub fn endorsements_received(
        &self,
        user_id: EntityId,
    ) -> impl Iterator<Item = &Endorsement> + '_ {
        self.endorsements.list_by(|e| e.endorsee_id, user_id)
    }

    /// Endorsements where the user is the endorser
    pub fn endorsements_given(
        &self,
        user_id: EntityId,
    ) -> impl Iterator<Item = &Endorsement> + '_ {
        self.endorsements.list_by(|e| e.endorser_id, user_id)
    }

    pub fn achievements_of(&self, user_id: EntityId) -> impl Iterator<Item = &Achievement> + '_ {
        self.achievements.list_by(|a| a.user_id, user_id)
    }

    /// Add `amount` to a user's points, saturating at `u64::MAX`
    pub(crate) fn award_points(&mut self, user_id: EntityId, amount: u64) -> Result<PointsAward> {
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| SkillboardError::not_found(User::KIND, user_id))?;
        let before = user.points;
        user.points = before.saturating_add(amount);
        debug!(user_id, amount, points = user.points, "Points awarded");
        Ok(PointsAward {
            user_id,
            before,
            after: user.points,
        })
    }
}

/// Lock owner for the entity tables
#[derive(Debug, Default)]
pub struct EntityStore {
    tables: RwLock<Tables>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against a consistent snapshot
    pub fn with_read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tables) -> Result<T>,
    {
        let tables = self
            .tables
            .read()
            .map_err(|e| SkillboardError::Internal(format!("Lock poisoned: {}", e)))?;
        f(&tables)
    }

    /// Run a write closure with exclusive access to all tables
    ///
    /// There is no rollback: the closure must finish every check that can
    /// fail before its first write.
    pub fn with_write<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T>,
    {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| SkillboardError::Internal(format!("Lock poisoned: {}", e)))?;
        f(&mut tables)
    }

    /// Row counts per table
    pub fn stats(&self) -> Result<StoreStats> {
        self.with_read(|t| {
            Ok(StoreStats {
                users: t.users.len(),
                skills: t.skills.len(),
                endorsements: t.endorsements.len(),
                achievements: t.achievements.len(),
            })
        })
    }
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub users: usize,
    pub skills: usize,
    pub endorsements: usize,
    pub achievements: usize,
}
