//! Scoring engine - every write that touches points, endorsement counts or levels
//!
//! Each operation validates its input, then performs all related writes
//! inside one `EntityStore::with_write` call. Referential checks run under
//! the same lock, before the first write, so a failed call changes nothing.
//!
//! | Operation           | Points                         |
//! |---------------------|--------------------------------|
//! | add skill           | +10 to the owner               |
//! | bulk add N skills   | +10 x N to the owner, once     |
//! | endorse skill       | +5 endorser, +15 endorsee      |
//! | grant achievement   | +achievement points            |
//! | delete / un-endorse | none reversed                  |

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::config::ScoringConfig;
use crate::error::{FieldError, Result, SkillboardError};
use crate::models::{
    Achievement, BulkSkillsRequest, Endorsement, EntityId, NewAchievement, NewEndorsement,
    NewSkill, Proficiency, Skill, skill_source,
};
use crate::store::{Entity, EntityStore, PointsAward, Tables};

use super::events::{EventBus, ScoringEvent};

pub const SKILL_ADDED_POINTS: u64 = 10;
pub const ENDORSEMENT_GIVEN_POINTS: u64 = 5;
pub const ENDORSEMENT_RECEIVED_POINTS: u64 = 15;

/// Result of deleting a skill
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDeletion {
    pub skill: Skill,
    /// Endorsements cascade-deleted with the skill
    pub removed_endorsements: usize,
}

pub struct ScoringEngine {
    store: Arc<EntityStore>,
    events: Arc<EventBus>,
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(store: Arc<EntityStore>, events: Arc<EventBus>, config: ScoringConfig) -> Self {
        Self {
            store,
            events,
            config,
        }
    }

    // =========================================================================
    // Skills
    // =========================================================================

    /// Create a skill for its owner and award the owner 10 points
    pub fn add_skill(&self, input: NewSkill) -> Result<Skill> {
        let errors = input.validate("");
        if !errors.is_empty() {
            return Err(SkillboardError::invalid("Invalid skill data", errors));
        }

        let (skill, award) = self.store.with_write(|t| {
            t.users.require(input.user_id)?;
            let skill = insert_skill(t, &input);
            let award = t.award_points(input.user_id, SKILL_ADDED_POINTS)?;
            Ok((skill, award))
        })?;

        self.events.emit(ScoringEvent::SkillAdded {
            skill_id: skill.id,
            user_id: skill.user_id,
            name: skill.name.clone(),
        });
        self.emit_award(award, SKILL_ADDED_POINTS);

        Ok(skill)
    }

    /// Create every skill or none, then award `10 * N` points in one update
    pub fn add_skills_bulk(&self, user_id: EntityId, items: Vec<NewSkill>) -> Result<Vec<Skill>> {
        let mut errors = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let prefix = format!("skills[{}].", i);
            errors.extend(item.validate(&prefix));
            if item.user_id != user_id {
                errors.push(FieldError::new(
                    format!("{}userId", prefix),
                    format!("must match the bulk owner {}", user_id),
                ));
            }
        }
        if !errors.is_empty() {
            return Err(SkillboardError::invalid("Invalid skill data", errors));
        }

        let total = SKILL_ADDED_POINTS.saturating_mul(items.len() as u64);
        let (skills, award) = self.store.with_write(|t| {
            t.users.require(user_id)?;
            if items.is_empty() {
                return Ok((Vec::new(), None));
            }
            let skills: Vec<Skill> = items.iter().map(|item| insert_skill(t, item)).collect();
            let award = t.award_points(user_id, total)?;
            Ok((skills, Some(award)))
        })?;

        if let Some(award) = award {
            self.events.emit(ScoringEvent::SkillsBulkAdded {
                user_id,
                count: skills.len(),
                skill_ids: skills.iter().map(|s| s.id).collect(),
            });
            self.emit_award(award, total);
        }

        Ok(skills)
    }

    /// Bulk add from a raw request body
    ///
    /// The owner is the explicit `userId` if given, otherwise the first
    /// item's. A `skills` value that is not a sequence is rejected.
    pub fn add_skills_bulk_payload(&self, request: BulkSkillsRequest) -> Result<Vec<Skill>> {
        let items = parse_bulk_items(request.skills)?;
        let owner = match request.user_id.or_else(|| items.first().map(|s| s.user_id)) {
            Some(owner) => owner,
            // No owner and nothing to add
            None => return Ok(Vec::new()),
        };
        self.add_skills_bulk(owner, items)
    }

    /// Delete a skill and cascade-delete its endorsements
    ///
    /// Points earned from the skill or its endorsements are kept.
    pub fn delete_skill(&self, skill_id: EntityId) -> Result<SkillDeletion> {
        let deletion = self.store.with_write(|t| {
            let skill = t
                .skills
                .take(skill_id)
                .ok_or_else(|| SkillboardError::not_found(Skill::KIND, skill_id))?;
            let removed_endorsements = t.endorsements.delete_where(|e| e.skill_id == skill_id);
            Ok(SkillDeletion {
                skill,
                removed_endorsements,
            })
        })?;

        self.events.emit(ScoringEvent::SkillDeleted {
            skill_id,
            user_id: deletion.skill.user_id,
            removed_endorsements: deletion.removed_endorsements,
        });

        Ok(deletion)
    }

    // =========================================================================
    // Endorsements
    // =========================================================================

    /// Record an endorsement, bump the skill's count and award both users
    pub fn endorse_skill(&self, input: NewEndorsement) -> Result<Endorsement> {
        let comment = input
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let (endorsement, awards) = self.store.with_write(|t| {
            let owner = t.skills.require(input.skill_id)?.user_id;
            t.users.require(input.endorser_id)?;
            t.users.require(input.endorsee_id)?;

            if input.endorsee_id != owner {
                return Err(SkillboardError::invalid_field(
                    "Invalid endorsement data",
                    "endorseeId",
                    format!("skill {} belongs to user {}", input.skill_id, owner),
                ));
            }
            if input.endorser_id == input.endorsee_id && !self.config.allow_self_endorsement {
                return Err(SkillboardError::invalid_field(
                    "Invalid endorsement data",
                    "endorserId",
                    "users may not endorse their own skills",
                ));
            }

            let endorsement = t.endorsements.create(|id| Endorsement {
                id,
                skill_id: input.skill_id,
                endorser_id: input.endorser_id,
                endorsee_id: input.endorsee_id,
                comment,
                created_at: Utc::now(),
            });
            if let Some(skill) = t.skills.get_mut(input.skill_id) {
                skill.endorsement_count += 1;
            }
            let given = t.award_points(input.endorser_id, ENDORSEMENT_GIVEN_POINTS)?;
            let received = t.award_points(input.endorsee_id, ENDORSEMENT_RECEIVED_POINTS)?;
            Ok((endorsement, [given, received]))
        })?;

        self.events.emit(ScoringEvent::EndorsementCreated {
            endorsement_id: endorsement.id,
            skill_id: endorsement.skill_id,
            endorser_id: endorsement.endorser_id,
            endorsee_id: endorsement.endorsee_id,
        });
        let [given, received] = awards;
        self.emit_award(given, ENDORSEMENT_GIVEN_POINTS);
        self.emit_award(received, ENDORSEMENT_RECEIVED_POINTS);

        Ok(endorsement)
    }

    /// Delete an endorsement and decrement its skill's count (floored at 0)
    ///
    /// Points awarded for the endorsement are kept.
    pub fn remove_endorsement(&self, endorsement_id: EntityId) -> Result<Endorsement> {
        let endorsement = self.store.with_write(|t| {
            let endorsement = t
                .endorsements
                .take(endorsement_id)
                .ok_or_else(|| SkillboardError::not_found(Endorsement::KIND, endorsement_id))?;
            match t.skills.get_mut(endorsement.skill_id) {
                Some(skill) => skill.endorsement_count = skill.endorsement_count.saturating_sub(1),
                None => warn!(
                    endorsement_id,
                    skill_id = endorsement.skill_id,
                    "Removed endorsement referenced a missing skill"
                ),
            }
            Ok(endorsement)
        })?;

        self.events.emit(ScoringEvent::EndorsementRemoved {
            endorsement_id,
            skill_id: endorsement.skill_id,
        });

        Ok(endorsement)
    }

    // =========================================================================
    // Achievements
    // =========================================================================

    /// Record an achievement and add its points (default 0) to the user
    pub fn grant_achievement(&self, input: NewAchievement) -> Result<Achievement> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(SkillboardError::invalid("Invalid achievement data", errors));
        }

        let points = input.points.unwrap_or(0);
        let (achievement, award) = self.store.with_write(|t| {
            t.users.require(input.user_id)?;
            let achievement = t.achievements.create(|id| Achievement {
                id,
                user_id: input.user_id,
                kind: input.kind.trim().to_string(),
                title: input.title.trim().to_string(),
                description: input.description.trim().to_string(),
                points,
                created_at: Utc::now(),
            });
            let award = t.award_points(input.user_id, points)?;
            Ok((achievement, award))
        })?;

        self.events.emit(ScoringEvent::AchievementGranted {
            achievement_id: achievement.id,
            user_id: achievement.user_id,
            points,
        });
        self.emit_award(award, points);

        Ok(achievement)
    }

    fn emit_award(&self, award: PointsAward, amount: u64) {
        if amount == 0 {
            return;
        }
        self.events.emit(ScoringEvent::PointsAwarded {
            user_id: award.user_id,
            amount,
            total: award.after,
        });
        if award.leveled_up() {
            self.events.emit(ScoringEvent::LevelUp {
                user_id: award.user_id,
                from: award.level_before(),
                to: award.level_after(),
            });
        }
    }
}

/// Insert a validated skill with a zero endorsement count
fn insert_skill(t: &mut Tables, input: &NewSkill) -> Skill {
    // Validated by the caller
    let proficiency = input
        .proficiency
        .parse::<Proficiency>()
        .unwrap_or(Proficiency::Beginner);
    let source = skill_source(input.source.as_deref());

    t.skills.create(|id| Skill {
        id,
        user_id: input.user_id,
        name: input.name.trim().to_string(),
        category: input.category.trim().to_string(),
        proficiency,
        endorsement_count: 0,
        source,
        created_at: Utc::now(),
    })
}

/// Decode the `skills` value of a bulk request into typed items
fn parse_bulk_items(value: serde_json::Value) -> Result<Vec<NewSkill>> {
    let serde_json::Value::Array(raw) = value else {
        return Err(SkillboardError::invalid_field(
            "Skills must be an array",
            "skills",
            "expected a sequence of skills",
        ));
    };

    let mut items = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();
    for (i, item) in raw.into_iter().enumerate() {
        match serde_json::from_value::<NewSkill>(item) {
            Ok(skill) => items.push(skill),
            Err(e) => errors.push(FieldError::new(format!("skills[{}]", i), e.to_string())),
        }
    }
    if !errors.is_empty() {
        return Err(SkillboardError::invalid("Invalid skill data", errors));
    }
    Ok(items)
}
