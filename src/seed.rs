//! Demo data for a fresh store
//!
//! Seeding goes through the directory and scoring services, so points and
//! endorsement counts are consistent from the first read.

use tracing::info;

use crate::error::Result;
use crate::models::{EntityId, NewEndorsement, NewSkill, NewUser};
use crate::services::Services;

const DEMO_USERS: &[(&str, &str, &str, &str)] = &[
    ("john_doe", "john@company.com", "John Doe", "Software Engineer"),
    ("sarah_johnson", "sarah@company.com", "Sarah Johnson", "Frontend Developer"),
    ("michael_chen", "michael@company.com", "Michael Chen", "Backend Developer"),
    ("emma_wilson", "emma@company.com", "Emma Wilson", "Project Manager"),
    ("david_kumar", "david@company.com", "David Kumar", "DevOps Engineer"),
];

/// (owner index, name, category, proficiency)
const DEMO_SKILLS: &[(usize, &str, &str, &str)] = &[
    (0, "JavaScript", "Technical", "Expert"),
    (0, "React", "Technical", "Advanced"),
    (0, "Node.js", "Technical", "Intermediate"),
    (0, "Leadership", "Soft Skills", "Expert"),
    (0, "Communication", "Soft Skills", "Expert"),
    (0, "Project Management", "Soft Skills", "Advanced"),
    (1, "React", "Technical", "Expert"),
    (1, "Vue.js", "Technical", "Advanced"),
    (1, "UI/UX Design", "Technical", "Advanced"),
    (2, "Node.js", "Technical", "Expert"),
    (2, "Python", "Technical", "Advanced"),
    (2, "AWS", "Technical", "Intermediate"),
    (3, "Agile", "Soft Skills", "Expert"),
    (3, "Scrum", "Soft Skills", "Expert"),
    (3, "Leadership", "Soft Skills", "Expert"),
];

/// (skill index, endorser index, comment)
const DEMO_ENDORSEMENTS: &[(usize, usize, &str)] = &[
    (0, 1, "John's JavaScript expertise is exceptional. He consistently delivers high-quality code."),
    (3, 2, "Great team leader with excellent communication skills."),
    (6, 0, "Sarah's React skills are top-notch. She creates amazing user interfaces."),
    (9, 1, "Michael's backend development skills are impressive."),
];

/// Counts of what was seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub skills: usize,
    pub endorsements: usize,
}

pub fn seed_demo_data(services: &Services) -> Result<SeedSummary> {
    let mut user_ids: Vec<EntityId> = Vec::with_capacity(DEMO_USERS.len());
    for (username, email, name, role) in DEMO_USERS {
        let user = services.directory.create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
        })?;
        user_ids.push(user.user.id);
    }

    let mut skills = Vec::with_capacity(DEMO_SKILLS.len());
    for (owner, name, category, proficiency) in DEMO_SKILLS {
        let skill = services.scoring.add_skill(NewSkill {
            user_id: user_ids[*owner],
            name: name.to_string(),
            category: category.to_string(),
            proficiency: proficiency.to_string(),
            source: None,
        })?;
        skills.push(skill);
    }

    for (skill, endorser, comment) in DEMO_ENDORSEMENTS {
        let skill = &skills[*skill];
        services.scoring.endorse_skill(NewEndorsement {
            skill_id: skill.id,
            endorser_id: user_ids[*endorser],
            endorsee_id: skill.user_id,
            comment: Some(comment.to_string()),
        })?;
    }

    let summary = SeedSummary {
        users: user_ids.len(),
        skills: skills.len(),
        endorsements: DEMO_ENDORSEMENTS.len(),
    };
    let totals = services.store.stats()?;
    info!(
        users = totals.users,
        skills = totals.skills,
        endorsements = totals.endorsements,
        achievements = totals.achievements,
        "Demo data seeded"
    );
    Ok(summary)
}
