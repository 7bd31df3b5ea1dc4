//! Entity types and request payloads
//!
//! Entities are plain records referenced by integer foreign keys. `level` is
//! never stored: it is derived from `points` whenever a user is rendered.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldError;

/// Identifier shared by all entity types, unique per type
pub type EntityId = u64;

/// Points needed to advance one level
pub const POINTS_PER_LEVEL: u64 = 100;

/// Level derived from a point total: `points / 100 + 1`
pub fn level(points: u64) -> u64 {
    points / POINTS_PER_LEVEL + 1
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub points: u64,
    pub avatar: Option<String>,
}

impl User {
    pub fn level(&self) -> u64 {
        level(self.points)
    }
}

/// A user as rendered to callers, with the derived level attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    pub level: u64,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        let level = user.level();
        Self { user, level }
    }
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        user.clone().into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub const ALL: [Proficiency; 4] = [
        Proficiency::Beginner,
        Proficiency::Intermediate,
        Proficiency::Advanced,
        Proficiency::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::Beginner => "Beginner",
            Proficiency::Intermediate => "Intermediate",
            Proficiency::Advanced => "Advanced",
            Proficiency::Expert => "Expert",
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Proficiency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Proficiency::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "'{}' is not a valid proficiency. Valid values: {:?}",
                    s,
                    Proficiency::ALL.map(|p| p.as_str())
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    pub category: String,
    pub proficiency: Proficiency,
    pub endorsement_count: u64,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endorsement {
    pub id: EntityId,
    pub skill_id: EntityId,
    pub endorser_id: EntityId,
    pub endorsee_id: EntityId,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: EntityId,
    pub user_id: EntityId,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub points: u64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Inputs
// ============================================================================

/// Skill provenance used when the caller gives none
pub const DEFAULT_SKILL_SOURCE: &str = "manual";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl NewUser {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "", "username", &self.username);
        require_text(&mut errors, "", "email", &self.email);
        require_text(&mut errors, "", "name", &self.name);
        require_text(&mut errors, "", "role", &self.role);
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            errors.push(FieldError::new("email", "must be an email address"));
        }
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSkill {
    pub user_id: EntityId,
    pub name: String,
    pub category: String,
    pub proficiency: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl NewSkill {
    /// Validate the fields, addressing errors under `prefix` (e.g. `skills[2].`)
    pub fn validate(&self, prefix: &str) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, prefix, "name", &self.name);
        require_text(&mut errors, prefix, "category", &self.category);
        if let Err(e) = self.proficiency.parse::<Proficiency>() {
            errors.push(FieldError::new(format!("{}proficiency", prefix), e));
        }
        errors
    }
}

/// Body of a bulk skill import
///
/// `skills` is kept untyped so a payload that is not a sequence can be
/// reported as a validation failure rather than a decode error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSkillsRequest {
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub skills: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEndorsement {
    pub skill_id: EntityId,
    pub endorser_id: EntityId,
    pub endorsee_id: EntityId,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAchievement {
    pub user_id: EntityId,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub points: Option<u64>,
}

impl NewAchievement {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_text(&mut errors, "", "type", &self.kind);
        require_text(&mut errors, "", "title", &self.title);
        require_text(&mut errors, "", "description", &self.description);
        errors
    }
}

// ============================================================================
// Patches
// ============================================================================

/// Shallow update of a skill's descriptive fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub proficiency: Option<String>,
    pub source: Option<String>,
}

impl SkillPatch {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            require_text(&mut errors, "", "name", name);
        }
        if let Some(category) = &self.category {
            require_text(&mut errors, "", "category", category);
        }
        if let Some(Err(e)) = self.proficiency.as_deref().map(str::parse::<Proficiency>) {
            errors.push(FieldError::new("proficiency", e));
        }
        errors
    }

    /// Merge into `skill`. Call only after `validate` succeeded.
    pub fn apply(&self, skill: &mut Skill) {
        if let Some(name) = &self.name {
            skill.name = name.trim().to_string();
        }
        if let Some(category) = &self.category {
            skill.category = category.trim().to_string();
        }
        if let Some(Ok(proficiency)) = self.proficiency.as_deref().map(str::parse::<Proficiency>) {
            skill.proficiency = proficiency;
        }
        if let Some(source) = &self.source {
            skill.source = skill_source(Some(source));
        }
    }
}

/// Shallow update of a user's profile fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    /// Absent leaves the avatar alone; `null` or `""` clears it
    #[serde(default, deserialize_with = "present")]
    pub avatar: Option<Option<String>>,
}

impl UserPatch {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            require_text(&mut errors, "", "name", name);
        }
        if let Some(role) = &self.role {
            require_text(&mut errors, "", "role", role);
        }
        errors
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.trim().to_string();
        }
        if let Some(role) = &self.role {
            user.role = role.trim().to_string();
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = avatar
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string);
        }
    }
}

/// Source for a stored skill; blank or missing falls back to `manual`
pub fn skill_source(source: Option<&str>) -> String {
    source
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SKILL_SOURCE)
        .to_string()
}

/// Distinguish a present `null` (`Some(None)`) from an absent field (`None`)
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn require_text(errors: &mut Vec<FieldError>, prefix: &str, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(format!("{}{}", prefix, field), "is required"));
    }
}
