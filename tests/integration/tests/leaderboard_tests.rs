//! Leaderboard synchronization behaviour
//!
//! Run with: cargo test -p tally-integration-tests --test leaderboard_tests

use tally_core::entities::GradeStatus;
use tally_core::GatewayError;
use tally_integration_tests::{date, grade_request, Call, TestEnv, GROUP_CHAT};
use tally_service::{ServiceError, SyncOutcome};

#[tokio::test]
async fn test_first_sync_sends_and_pins() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;

    let outcome = env
        .grade(&member, GradeStatus::Done, Some(5), date(2024, 9, 2))
        .await;

    let SyncOutcome::Created(id) = outcome.leaderboard.outcome else {
        panic!("expected a new message, got {:?}", outcome.leaderboard.outcome);
    };
    assert!(outcome.leaderboard.pinned);
    assert_eq!(env.gateway.sends_to(GROUP_CHAT).len(), 1);
    assert_eq!(env.gateway.pins(), [id]);
    assert_eq!(env.store.leaderboard(roster.id).and_then(|s| s.message_id), Some(id));

    let text = env.gateway.displayed(id).unwrap();
    assert!(text.starts_with("<b>Leaderboard - Math 7B</b>"));
    assert!(text.contains("1. <b>Aziza</b>"));
}

#[tokio::test]
async fn test_unchanged_edit_sends_nothing() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    env.admit(&roster, "Aziza").await;

    let first = env.leaderboard().sync(&roster).await.unwrap();
    let id = first.outcome.message_id();
    env.gateway.clear_calls();

    env.gateway.script_edit(Err(GatewayError::NotModified));
    let second = env.leaderboard().sync(&roster).await.unwrap();

    assert_eq!(second.outcome, SyncOutcome::Unchanged(id));
    assert_eq!(env.gateway.send_count(), 0);
    assert_eq!(env.gateway.edit_count(), 1);
    assert_eq!(env.gateway.pins(), [id]);
    assert_eq!(env.store.leaderboard(roster.id).and_then(|s| s.message_id), Some(id));
}

#[tokio::test]
async fn test_changed_ranking_is_edited_in_place() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let day = date(2024, 9, 2);

    let first = env.grade(&member, GradeStatus::Done, Some(3), day).await;
    let id = first.leaderboard.outcome.message_id();
    let second = env.grade(&member, GradeStatus::Done, Some(5), day).await;

    assert_eq!(second.leaderboard.outcome, SyncOutcome::Edited(id));
    assert_eq!(env.gateway.sends_to(GROUP_CHAT).len(), 1);
    assert!(env.gateway.displayed(id).unwrap().contains("Total: 5 |"));
}

#[tokio::test]
async fn test_failed_edit_sends_one_replacement() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    env.admit(&roster, "Aziza").await;

    let old = env.leaderboard().sync(&roster).await.unwrap().outcome.message_id();
    env.gateway.clear_calls();

    env.gateway.script_edit(Err(GatewayError::Forbidden(
        "not enough rights to edit".into(),
    )));
    let report = env.leaderboard().sync(&roster).await.unwrap();

    let SyncOutcome::Replaced { old: replaced, new } = report.outcome else {
        panic!("expected a replacement, got {:?}", report.outcome);
    };
    assert_eq!(replaced, old);
    assert_ne!(new, old);
    assert_eq!(env.gateway.send_count(), 1);
    assert_eq!(env.gateway.pins(), [new]);
    assert_eq!(env.store.leaderboard(roster.id).and_then(|s| s.message_id), Some(new));
}

#[tokio::test]
async fn test_deleted_message_is_replaced() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let day = date(2024, 9, 2);

    let old = env
        .grade(&member, GradeStatus::Done, Some(3), day)
        .await
        .leaderboard
        .outcome
        .message_id();
    env.gateway.delete_message(old);

    let outcome = env.grade(&member, GradeStatus::Absent, None, day).await;
    assert!(matches!(
        outcome.leaderboard.outcome,
        SyncOutcome::Replaced { old: o, .. } if o == old
    ));
    assert_eq!(env.gateway.sends_to(GROUP_CHAT).len(), 2);
}

#[tokio::test]
async fn test_pin_failure_is_swallowed() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    env.gateway
        .fail_pins(GatewayError::BadRequest("not enough rights to pin".into()));

    let outcome = env
        .grade(&member, GradeStatus::Done, Some(4), date(2024, 9, 2))
        .await;

    assert!(!outcome.leaderboard.pinned);
    assert_eq!(env.gateway.pins().len(), 1);
}

#[tokio::test]
async fn test_failed_send_surfaces_after_grade_commits() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    env.gateway
        .fail_sends_to(GROUP_CHAT, GatewayError::Forbidden("bot was kicked".into()));

    let err = env
        .ledger()
        .grade_member(grade_request(&member, GradeStatus::Done, Some(4), date(2024, 9, 2)))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Gateway(GatewayError::Forbidden(_))));
    let grades = env.store.grades_of(member.id);
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].status, GradeStatus::Done);
    assert_eq!(env.store.leaderboard(roster.id).and_then(|s| s.message_id), None);
}

#[tokio::test]
async fn test_done_to_absent_clears_score_from_ranking() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let day = date(2024, 9, 2);

    env.grade(&member, GradeStatus::Done, Some(4), day).await;
    let outcome = env.grade(&member, GradeStatus::Absent, None, day).await;

    assert_eq!(outcome.details.grade.score, None);
    let standing = &outcome.leaderboard.standings[0];
    assert_eq!(
        (standing.total_score, standing.avg_score, standing.done_count, standing.absent_count),
        (0, 0.0, 0, 1)
    );
    let id = outcome.leaderboard.outcome.message_id();
    assert!(env
        .gateway
        .displayed(id)
        .unwrap()
        .contains("Total: 0 | Average: 0.00 | Not done: 0 | Absent: 1"));
}

#[tokio::test]
async fn test_ranking_orders_and_excludes_inactive() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let a = env.admit(&roster, "aziz").await;
    let b = env.admit(&roster, "Akmal").await;
    let c = env.admit(&roster, "Bobur").await;
    let gone = env.admit(&roster, "Zafar").await;

    env.grade(&a, GradeStatus::Done, Some(4), date(2024, 9, 2)).await;
    env.grade(&b, GradeStatus::Done, Some(4), date(2024, 9, 2)).await;
    env.grade(&c, GradeStatus::Done, Some(5), date(2024, 9, 2)).await;
    env.grade(&gone, GradeStatus::Done, Some(5), date(2024, 9, 3)).await;
    env.rosters().deactivate_member(gone.id).await.unwrap();

    let names: Vec<_> = env
        .leaderboard()
        .standings(&roster)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.display_name)
        .collect();
    assert_eq!(names, ["Bobur", "Akmal", "aziz"]);
}

#[tokio::test]
async fn test_pin_targets_group_chat() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    env.admit(&roster, "Aziza").await;

    env.leaderboard().sync(&roster).await.unwrap();

    assert!(env.gateway.calls().iter().any(|call| matches!(
        call,
        Call::Pin { chat_id, .. } if *chat_id == GROUP_CHAT
    )));
}
