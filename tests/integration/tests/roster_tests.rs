//! Roster and member management
//!
//! Run with: cargo test -p tally-integration-tests --test roster_tests

use tally_core::entities::MemberStatus;
use tally_core::{ChatId, DomainError, ExternalUserId};
use tally_integration_tests::{date, unique_user, TestEnv, GROUP_CHAT};
use tally_service::dto::AdmitMemberRequest;
use tally_service::{GradingSettings, ServiceError};

fn admission(external_id: Option<ExternalUserId>, handle: Option<&str>, name: &str) -> AdmitMemberRequest {
    AdmitMemberRequest {
        external_id,
        handle: handle.map(String::from),
        display_name: name.to_string(),
    }
}

// ============================================================================
// Rosters
// ============================================================================

#[tokio::test]
async fn test_ensure_roster_creates_once_and_refreshes_title() {
    let env = TestEnv::new();
    let rosters = env.rosters();

    let created = rosters.ensure_roster(GROUP_CHAT, Some("Math 7B")).await.unwrap();
    let same = rosters.ensure_roster(GROUP_CHAT, None).await.unwrap();
    assert_eq!(created.id, same.id);
    assert_eq!(same.title.as_deref(), Some("Math 7B"));

    let renamed = rosters.ensure_roster(GROUP_CHAT, Some("Math 8B")).await.unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.title.as_deref(), Some("Math 8B"));
    assert_eq!(rosters.overview().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_lesson_is_unique_per_date() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let rosters = env.rosters();

    let first = rosters.lesson_for(&roster, date(2024, 9, 2)).await.unwrap();
    let again = rosters.lesson_for(&roster, date(2024, 9, 2)).await.unwrap();
    let next = rosters.lesson_for(&roster, date(2024, 9, 3)).await.unwrap();

    assert_eq!(first.id, again.id);
    assert_ne!(first.id, next.id);
}

// ============================================================================
// Admission
// ============================================================================

#[tokio::test]
async fn test_admission_allocates_unique_codes() {
    let env = TestEnv::new();
    let roster = env.roster().await;

    let mut codes = std::collections::HashSet::new();
    for i in 0..50 {
        let member = env.admit(&roster, &format!("Member {i}")).await;
        assert_eq!(member.code.len(), 4);
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(env.store.not_done_count(member.id), Some(0));
        assert!(codes.insert(member.code.clone()));
    }
}

#[tokio::test]
async fn test_crowded_code_space_grows_codes() {
    let settings = GradingSettings {
        code_length: 1,
        ..GradingSettings::default()
    };
    let env = TestEnv::with_settings(settings);
    for digit in 0..10 {
        env.store.reserve_code(&digit.to_string());
    }
    let roster = env.roster().await;

    let member = env.admit(&roster, "Aziza").await;

    assert_eq!(member.code.len(), 2);
    assert!(env.store.code_checks() > 20);
}

#[tokio::test]
async fn test_readmission_by_handle_backfills_and_reactivates() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let rosters = env.rosters();

    let original = rosters
        .admit_member(&roster, admission(None, Some("@aziza"), "Aziza"))
        .await
        .unwrap();
    assert_eq!(original.handle.as_deref(), Some("aziza"));
    rosters.deactivate_member(original.id).await.unwrap();

    let id = unique_user();
    let again = rosters
        .admit_member(&roster, admission(Some(id), Some("aziza"), "Aziza K."))
        .await
        .unwrap();

    assert_eq!(again.id, original.id);
    assert_eq!(again.code, original.code);
    assert_eq!(again.external_id, Some(id));
    assert_eq!(again.display_name, "Aziza K.");
    assert!(again.is_active());
    assert_eq!(rosters.active_members(&roster).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admission_needs_identity() {
    let env = TestEnv::new();
    let roster = env.roster().await;

    let err = env
        .rosters()
        .admit_member(&roster, admission(None, Some("@ "), "Nobody"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::MissingIdentity)));

    let err = env
        .rosters()
        .admit_member(&roster, admission(Some(unique_user()), None, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_complete_identity_by_code_fills_only_missing() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let rosters = env.rosters();
    let member = rosters
        .admit_member(&roster, admission(None, Some("aziza"), "Aziza"))
        .await
        .unwrap();

    let id = unique_user();
    let completed = rosters
        .complete_identity_by_code(&member.code.to_string(), Some(id), Some("other"))
        .await
        .unwrap();
    assert_eq!(completed.id, member.id);
    assert_eq!(completed.external_id, Some(id));
    assert_eq!(completed.handle.as_deref(), Some("aziza"));

    let unknown = rosters
        .complete_identity_by_code("#99999", Some(id), None)
        .await
        .unwrap_err();
    assert!(matches!(
        unknown,
        ServiceError::Domain(DomainError::MemberCodeNotFound(_))
    ));

    let malformed = rosters
        .complete_identity_by_code("12ab", Some(id), None)
        .await
        .unwrap_err();
    assert!(matches!(
        malformed,
        ServiceError::Domain(DomainError::InvalidMemberCode(_))
    ));
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_overview_and_directory() {
    let env = TestEnv::new();
    let rosters = env.rosters();
    let physics = rosters
        .ensure_roster(ChatId::new(-2), Some("Physics"))
        .await
        .unwrap();
    let algebra = rosters
        .ensure_roster(ChatId::new(-1), Some("Algebra"))
        .await
        .unwrap();
    let untitled = rosters.ensure_roster(ChatId::new(-3), None).await.unwrap();
    env.admit(&physics, "Zarina").await;
    env.admit(&algebra, "Murod").await;
    env.admit(&algebra, "Dilnoza").await;
    env.admit(&untitled, "Anvar").await;

    let overview = rosters.overview().await.unwrap();
    let rows: Vec<_> = overview
        .iter()
        .map(|s| (s.title.as_deref(), s.member_count))
        .collect();
    // an untitled roster sorts as the empty title
    assert_eq!(rows, [(None, 1), (Some("Algebra"), 2), (Some("Physics"), 1)]);

    let directory = rosters.directory().await.unwrap();
    let names: Vec<_> = directory.iter().map(|e| e.display_name.as_str()).collect();
    assert_eq!(names, ["Anvar", "Dilnoza", "Murod", "Zarina"]);
}
