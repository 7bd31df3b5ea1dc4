//! HTTP handler tests, driven directly through the axum extractors

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequest, State};
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;

use skillboard::api::leaderboard::{self, LeaderboardQuery};
use skillboard::api::response::{ApiJson, ApiPath, ApiQuery};
use skillboard::api::{achievements, endorsements, skills, users, AppState, SharedState};
use skillboard::config::{LeaderboardConfig, ScoringConfig};
use skillboard::models::{
    BulkSkillsRequest, NewAchievement, NewEndorsement, NewSkill, NewUser, SkillPatch, UserPatch,
};
use skillboard::seed::seed_demo_data;
use skillboard::services::Services;
use skillboard::{create_router, SkillboardError};

fn empty_state() -> SharedState {
    Arc::new(AppState::new(
        Services::in_memory(ScoringConfig::default()),
        LeaderboardConfig::default(),
    ))
}

fn seeded_state() -> SharedState {
    let state = empty_state();
    seed_demo_data(&state.services).unwrap();
    state
}

fn status_of(err: SkillboardError) -> StatusCode {
    err.into_response().status()
}

fn new_skill(user_id: u64, proficiency: &str) -> NewSkill {
    NewSkill {
        user_id,
        name: "Kubernetes".into(),
        category: "Technical".into(),
        proficiency: proficiency.into(),
        source: Some("resume".into()),
    }
}

#[test]
fn test_router_builds() {
    let _router = create_router(empty_state());
}

#[tokio::test]
async fn test_list_and_get_users() {
    let state = seeded_state();

    let all = users::list_users(State(state.clone())).await.unwrap();
    assert_eq!(all.0.len(), 5);

    let john = users::get_user(State(state.clone()), ApiPath(1)).await.unwrap();
    assert_eq!(john.0.user.username, "john_doe");
    assert_eq!(john.0.level, 1);

    let err = users::get_user(State(state.clone()), ApiPath(99)).await.unwrap_err();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_user_and_lookup() {
    let state = empty_state();
    let input = NewUser {
        username: "grace".into(),
        email: "grace@company.com".into(),
        name: "Grace Hopper".into(),
        role: "Admiral".into(),
    };
    let (status, user) = users::create_user(State(state.clone()), ApiJson(input.clone()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user.0.user.points, 0);

    let found = users::get_user_by_username(State(state.clone()), ApiPath("grace".to_string()))
        .await
        .unwrap();
    assert_eq!(found.0.user.id, user.0.user.id);

    let err = users::create_user(State(state.clone()), ApiJson(input))
        .await
        .unwrap_err();
    assert_eq!(status_of(err), StatusCode::BAD_REQUEST);

    let updated = users::update_user(
        State(state.clone()),
        ApiPath(user.0.user.id),
        ApiJson(UserPatch {
            avatar: Some(Some("https://example.com/grace.png".into())),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.0.user.avatar.as_deref(), Some("https://example.com/grace.png"));
}

#[tokio::test]
async fn test_user_stats_endpoint() {
    let state = seeded_state();
    let stats = users::get_user_stats(State(state.clone()), ApiPath(1))
        .await
        .unwrap();
    assert_eq!(stats.0.total_skills, 6);
    assert_eq!(stats.0.total_endorsements_received, 2);
    assert_eq!(stats.0.points, 95);

    let json = serde_json::to_value(stats.0).unwrap();
    assert_eq!(json["totalEndorsements"], 2);
    assert!(json.get("totalEndorsementsReceived").is_none());
    assert!(json.get("rank").is_some());

    let err = users::get_user_stats(State(state), ApiPath(42)).await.unwrap_err();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_skill_awards_points() {
    let state = seeded_state();
    let before = users::get_user(State(state.clone()), ApiPath(5)).await.unwrap().0;

    let (status, skill) = skills::create_skill(State(state.clone()), ApiJson(new_skill(5, "Advanced")))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(skill.0.endorsement_count, 0);
    assert_eq!(skill.0.source, "resume");

    let after = users::get_user(State(state.clone()), ApiPath(5)).await.unwrap().0;
    assert_eq!(after.user.points, before.user.points + 10);

    let mine = skills::list_user_skills(State(state), ApiPath(5)).await.unwrap();
    assert_eq!(mine.0.len(), 1);
}

#[tokio::test]
async fn test_create_skill_rejects_bad_proficiency() {
    let state = seeded_state();
    let err = skills::create_skill(State(state.clone()), ApiJson(new_skill(5, "Ninja")))
        .await
        .unwrap_err();
    assert_eq!(err.details()[0].field, "proficiency");
    assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_endpoint() {
    let state = seeded_state();
    let request = BulkSkillsRequest {
        user_id: None,
        skills: serde_json::json!([
            {"userId": 5, "name": "Terraform", "category": "Technical", "proficiency": "Advanced", "source": "linkedin"},
            {"userId": 5, "name": "Docker", "category": "Technical", "proficiency": "Expert", "source": "linkedin"}
        ]),
    };
    let (status, created) = skills::create_skills_bulk(State(state.clone()), ApiJson(request))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.0.len(), 2);
    let david = users::get_user(State(state.clone()), ApiPath(5)).await.unwrap().0;
    assert_eq!(david.user.points, 20);

    let err = skills::create_skills_bulk(
        State(state),
        ApiJson(BulkSkillsRequest {
            user_id: Some(5),
            skills: serde_json::json!("Terraform"),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_skill() {
    let state = seeded_state();
    let updated = skills::update_skill(
        State(state.clone()),
        ApiPath(3),
        ApiJson(SkillPatch {
            proficiency: Some("Advanced".into()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.0.proficiency.as_str(), "Advanced");
    assert_eq!(updated.0.name, "Node.js");

    let err = skills::update_skill(State(state.clone()), ApiPath(999), ApiJson(SkillPatch::default()))
        .await
        .unwrap_err();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);

    let deleted = skills::delete_skill(State(state.clone()), ApiPath(1)).await.unwrap();
    assert!(deleted.0.success);

    // Skill 1 carried one endorsement; it goes with the skill
    let received = endorsements::list_received(State(state.clone()), ApiPath(1))
        .await
        .unwrap();
    assert_eq!(received.0.len(), 1);

    let err = skills::delete_skill(State(state), ApiPath(1)).await.unwrap_err();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_endorsement_flow() {
    let state = seeded_state();
    let input = NewEndorsement {
        skill_id: 11,
        endorser_id: 4,
        endorsee_id: 3,
        comment: Some("Solid Python".into()),
    };
    let (status, endorsement) = endorsements::create_endorsement(State(state.clone()), ApiJson(input))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let for_skill = endorsements::list_for_skill(State(state.clone()), ApiPath(11))
        .await
        .unwrap();
    assert_eq!(for_skill.0.len(), 1);
    let endorser = for_skill.0[0].endorser.as_ref().unwrap();
    assert_eq!(endorser.user.username, "emma_wilson");
    assert!(for_skill.0[0].skill.is_none());

    let given = endorsements::list_given(State(state.clone()), ApiPath(4)).await.unwrap();
    assert_eq!(given.0.len(), 1);
    assert_eq!(given.0[0].endorsee.as_ref().unwrap().user.id, 3);

    let removed = endorsements::delete_endorsement(State(state.clone()), ApiPath(endorsement.0.id))
        .await
        .unwrap();
    assert!(removed.0.success);

    let err = endorsements::delete_endorsement(State(state.clone()), ApiPath(endorsement.0.id))
        .await
        .unwrap_err();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);

    let err = endorsements::create_endorsement(
        State(state),
        ApiJson(NewEndorsement {
            skill_id: 11,
            endorser_id: 4,
            endorsee_id: 77,
            comment: None,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(status_of(err), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_received_endorsements_attach_endorser_and_skill() {
    let state = seeded_state();
    let received = endorsements::list_received(State(state), ApiPath(1)).await.unwrap();
    assert_eq!(received.0.len(), 2);
    for details in &received.0 {
        assert!(details.endorser.is_some());
        assert_eq!(details.skill.as_ref().unwrap().user_id, 1);
    }

    let json = serde_json::to_value(&received.0[0]).unwrap();
    assert_eq!(json["endorseeId"], 1);
    assert!(json.get("endorsee").is_none());
}

#[tokio::test]
async fn test_achievements_endpoints() {
    let state = seeded_state();
    let input = NewAchievement {
        user_id: 3,
        kind: "milestone".into(),
        title: "t".into(),
        description: "d".into(),
        points: Some(25),
    };
    let before = users::get_user(State(state.clone()), ApiPath(3)).await.unwrap().0;

    let (status, achievement) = achievements::create_achievement(State(state.clone()), ApiJson(input))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(achievement.0.kind, "milestone");

    let after = users::get_user(State(state.clone()), ApiPath(3)).await.unwrap().0;
    assert_eq!(after.user.points, before.user.points + 25);

    let list = achievements::list_user_achievements(State(state), ApiPath(3)).await.unwrap();
    assert_eq!(list.0.len(), 1);
}

#[tokio::test]
async fn test_leaderboards() {
    let state = seeded_state();

    let endorsers = leaderboard::top_endorsers(State(state.clone()), ApiQuery(LeaderboardQuery::default()))
        .await
        .unwrap();
    assert_eq!(endorsers.0.len(), 5);
    // sarah gave two endorsements in the demo data
    assert_eq!(endorsers.0[0].user.user.username, "sarah_johnson");
    assert_eq!(endorsers.0[0].endorsement_count, 2);

    let json = serde_json::to_value(&endorsers.0[0]).unwrap();
    assert_eq!(json["endorsementCount"], 2);
    assert!(json.get("level").is_some());

    let top = leaderboard::top_by_points(State(state), ApiQuery(LeaderboardQuery { limit: Some(2) }))
        .await
        .unwrap();
    assert_eq!(top.0.len(), 2);
    assert!(top.0[0].user.points >= top.0[1].user.points);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/skills")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"userId": "one", "name": "Rust"}"#))
        .unwrap();

    let err = ApiJson::<NewSkill>::from_request(req, &()).await.unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(err.details()[0].field, "body");
    assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
}
