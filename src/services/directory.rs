//! Directory service - lookups and writes that never touch points
//!
//! User registration, profile and skill edits, and the endorsement joins the
//! UI renders. Point and count bookkeeping lives in the scoring engine.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::{FieldError, Result, SkillboardError};
use crate::models::{
    Achievement, Endorsement, EntityId, NewUser, Skill, SkillPatch, User, UserPatch, UserView,
};
use crate::store::{Entity, EntityStore, Tables};

/// An endorsement with the related records attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndorsementDetails {
    #[serde(flatten)]
    pub endorsement: Endorsement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endorser: Option<UserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endorsee: Option<UserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<Skill>,
}

/// Which related records to attach to an endorsement
#[derive(Debug, Clone, Copy)]
struct Attach {
    endorser: bool,
    endorsee: bool,
    skill: bool,
}

pub struct DirectoryService {
    store: Arc<EntityStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a user with zero points; username and email must be unique
    pub fn create_user(&self, input: NewUser) -> Result<UserView> {
        let mut errors = input.validate();
        if !errors.is_empty() {
            return Err(SkillboardError::invalid("Invalid user data", errors));
        }

        let user = self.store.with_write(|t| {
            let username = input.username.trim();
            let email = input.email.trim();
            if t.find_user_by_username(username).is_some() {
                errors.push(FieldError::new("username", "is already taken"));
            }
            if t.find_user_by_email(email).is_some() {
                errors.push(FieldError::new("email", "is already registered"));
            }
            if !errors.is_empty() {
                return Err(SkillboardError::invalid("Invalid user data", errors));
            }

            Ok(t.users.create(|id| User {
                id,
                username: username.to_string(),
                email: email.to_string(),
                name: input.name.trim().to_string(),
                role: input.role.trim().to_string(),
                points: 0,
                avatar: None,
            }))
        })?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user.into())
    }

    pub fn get_user(&self, id: EntityId) -> Result<UserView> {
        self.store
            .with_read(|t| t.users.require(id).map(UserView::from))
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<UserView> {
        self.store.with_read(|t| {
            t.find_user_by_username(username)
                .map(UserView::from)
                .ok_or_else(|| SkillboardError::not_found(User::KIND, username))
        })
    }

    pub fn list_users(&self) -> Result<Vec<UserView>> {
        self.store
            .with_read(|t| Ok(t.users.list().map(UserView::from).collect()))
    }

    /// Shallow-merge profile fields; points are not writable here
    pub fn update_user(&self, id: EntityId, patch: UserPatch) -> Result<UserView> {
        let errors = patch.validate();
        if !errors.is_empty() {
            return Err(SkillboardError::invalid("Invalid user data", errors));
        }
        self.store.with_write(|t| {
            t.users
                .update(id, |user| patch.apply(user))
                .map(UserView::from)
                .ok_or_else(|| SkillboardError::not_found(User::KIND, id))
        })
    }

    // =========================================================================
    // Skills
    // =========================================================================

    pub fn get_skill(&self, id: EntityId) -> Result<Skill> {
        self.store.with_read(|t| t.skills.require(id).cloned())
    }

    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        self.store
            .with_read(|t| Ok(t.skills.list().cloned().collect()))
    }

    pub fn skills_of(&self, user_id: EntityId) -> Result<Vec<Skill>> {
        self.store
            .with_read(|t| Ok(t.skills_of(user_id).cloned().collect()))
    }

    /// Shallow-merge descriptive fields; counts and ownership are not writable
    pub fn update_skill(&self, id: EntityId, patch: SkillPatch) -> Result<Skill> {
        let errors = patch.validate();
        if !errors.is_empty() {
            return Err(SkillboardError::invalid("Invalid skill data", errors));
        }
        self.store.with_write(|t| {
            t.skills
                .update(id, |skill| patch.apply(skill))
                .ok_or_else(|| SkillboardError::not_found(Skill::KIND, id))
        })
    }

    // =========================================================================
    // Endorsements
    // =========================================================================

    /// Endorsements the user received, with endorser and skill attached
    pub fn endorsements_received(&self, user_id: EntityId) -> Result<Vec<EndorsementDetails>> {
        let attach = Attach {
            endorser: true,
            endorsee: false,
            skill: true,
        };
        self.store.with_read(|t| {
            Ok(t.endorsements_received(user_id)
                .map(|e| details(t, e, attach))
                .collect())
        })
    }

    /// Endorsements the user gave, with endorsee and skill attached
    pub fn endorsements_given(&self, user_id: EntityId) -> Result<Vec<EndorsementDetails>> {
        let attach = Attach {
            endorser: false,
            endorsee: true,
            skill: true,
        };
        self.store.with_read(|t| {
            Ok(t.endorsements_given(user_id)
                .map(|e| details(t, e, attach))
                .collect())
        })
    }

    /// Endorsements of one skill, with endorser attached
    pub fn endorsements_for_skill(&self, skill_id: EntityId) -> Result<Vec<EndorsementDetails>> {
        let attach = Attach {
            endorser: true,
            endorsee: false,
            skill: false,
        };
        self.store.with_read(|t| {
            Ok(t.endorsements_for_skill(skill_id)
                .map(|e| details(t, e, attach))
                .collect())
        })
    }

    // =========================================================================
    // Achievements
    // =========================================================================

    pub fn achievements_of(&self, user_id: EntityId) -> Result<Vec<Achievement>> {
        self.store
            .with_read(|t| Ok(t.achievements_of(user_id).cloned().collect()))
    }
}

fn details(t: &Tables, endorsement: &Endorsement, attach: Attach) -> EndorsementDetails {
    EndorsementDetails {
        endorsement: endorsement.clone(),
        endorser: attach
            .endorser
            .then(|| t.users.get(endorsement.endorser_id).map(UserView::from))
            .flatten(),
        endorsee: attach
            .endorsee
            .then(|| t.users.get(endorsement.endorsee_id).map(UserView::from))
            .flatten(),
        skill: attach
            .skill
            .then(|| t.skills.get(endorsement.skill_id).cloned())
            .flatten(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            name: "Test User".into(),
            role: "Engineer".into(),
        }
    }

    #[test]
    fn test_create_user_starts_at_level_one() {
        let directory = DirectoryService::new(Arc::new(EntityStore::new()));
        let user = directory
            .create_user(new_user("ada", "ada@company.com"))
            .unwrap();
        assert_eq!(user.user.id, 1);
        assert_eq!(user.user.points, 0);
        assert_eq!(user.level, 1);
    }

    #[test]
    fn test_duplicate_username_and_email_rejected() {
        let directory = DirectoryService::new(Arc::new(EntityStore::new()));
        directory
            .create_user(new_user("ada", "ada@company.com"))
            .unwrap();

        let err = directory
            .create_user(new_user("ada", "ADA@company.com"))
            .unwrap_err();
        let fields: Vec<&str> = err.details().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "email"]);
        assert_eq!(directory.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_find_by_username() {
        let directory = DirectoryService::new(Arc::new(EntityStore::new()));
        directory
            .create_user(new_user("ada", "ada@company.com"))
            .unwrap();
        assert_eq!(directory.find_user_by_username("ada").unwrap().user.id, 1);
        assert!(directory
            .find_user_by_username("nobody")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_update_user_keeps_points() {
        let directory = DirectoryService::new(Arc::new(EntityStore::new()));
        directory
            .create_user(new_user("ada", "ada@company.com"))
            .unwrap();
        let updated = directory
            .update_user(
                1,
                UserPatch {
                    role: Some("Staff Engineer".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.user.role, "Staff Engineer");
        assert_eq!(updated.user.name, "Test User");
        assert_eq!(updated.user.points, 0);

        assert!(directory
            .update_user(42, UserPatch::default())
            .unwrap_err()
            .is_not_found());
    }
}
