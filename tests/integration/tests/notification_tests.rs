//! Notification dispatch behaviour
//!
//! Run with: cargo test -p tally-integration-tests --test notification_tests

use tally_core::entities::{GradeStatus, NotificationStatus};
use tally_core::{ChatId, GatewayError};
use tally_integration_tests::{date, TestEnv};

fn private_chat(guardian: &tally_core::entities::Guardian) -> ChatId {
    ChatId::from(guardian.external_id)
}

// ============================================================================
// Live dispatch
// ============================================================================

#[tokio::test]
async fn test_live_dispatch_resends_on_every_regrade() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let guardian = env.guardian_of(&member, "Mother").await;
    let day = date(2024, 9, 2);

    env.grade(&member, GradeStatus::Done, Some(3), day).await;
    env.grade(&member, GradeStatus::Done, Some(4), day).await;
    env.grade(&member, GradeStatus::Done, Some(5), day).await;

    let sent = env.gateway.sends_to(private_chat(&guardian));
    assert_eq!(sent.len(), 3);
    assert!(sent[2].ends_with("Score: 5"));

    let rows = env.store.notifications_for(guardian.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, NotificationStatus::Sent);
}

#[tokio::test]
async fn test_only_last_attempt_is_kept() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let guardian = env.guardian_of(&member, "Mother").await;
    let chat = private_chat(&guardian);
    let day = date(2024, 9, 2);

    env.grade(&member, GradeStatus::Done, Some(4), day).await;

    env.gateway
        .fail_sends_to(chat, GatewayError::Forbidden("bot was blocked by the user".into()));
    let outcome = env.grade(&member, GradeStatus::Absent, None, day).await;
    assert_eq!(outcome.dispatch.failed, 1);

    let row = &env.store.notifications_for(guardian.id)[0];
    assert_eq!(row.status, NotificationStatus::Failed);
    assert_eq!(
        row.error.as_deref(),
        Some("Forbidden: bot was blocked by the user")
    );

    env.gateway.restore_sends_to(chat);
    env.grade(&member, GradeStatus::NotDone, None, day).await;

    let rows = env.store.notifications_for(guardian.id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, NotificationStatus::Sent);
    assert_eq!(rows[0].error, None);
    assert!(rows[0].sent_at.is_some());
}

#[tokio::test]
async fn test_failing_guardian_does_not_block_others() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let blocked = env.guardian_of(&member, "Father").await;
    let reachable = env.guardian_of(&member, "Mother").await;
    env.gateway.fail_sends_to(
        private_chat(&blocked),
        GatewayError::Network("connection reset".into()),
    );

    let outcome = env
        .grade(&member, GradeStatus::Done, Some(5), date(2024, 9, 2))
        .await;

    assert_eq!(outcome.dispatch.attempted, 2);
    assert_eq!(outcome.dispatch.sent, 1);
    assert_eq!(outcome.dispatch.failed, 1);
    assert_eq!(outcome.details.grade.status, GradeStatus::Done);
    assert_eq!(env.gateway.sends_to(private_chat(&reachable)).len(), 1);
    assert_eq!(
        env.store.notifications_for(blocked.id)[0].status,
        NotificationStatus::Failed
    );
}

#[tokio::test]
async fn test_long_errors_are_truncated() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let guardian = env.guardian_of(&member, "Mother").await;
    env.gateway
        .fail_sends_to(private_chat(&guardian), GatewayError::BadRequest("x".repeat(600)));

    env.grade(&member, GradeStatus::Absent, None, date(2024, 9, 2))
        .await;

    let row = &env.store.notifications_for(guardian.id)[0];
    assert_eq!(row.error.as_ref().map(|e| e.chars().count()), Some(255));
}

#[tokio::test]
async fn test_unrecorded_outcome_is_counted_once() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let blocked = env.guardian_of(&member, "Father").await;
    env.guardian_of(&member, "Mother").await;
    env.gateway.fail_sends_to(
        private_chat(&blocked),
        GatewayError::Forbidden("bot was blocked by the user".into()),
    );
    env.store.fail_notification_records(true);

    let outcome = env
        .grade(&member, GradeStatus::Done, Some(5), date(2024, 9, 2))
        .await;

    assert_eq!(outcome.dispatch.attempted, 2);
    assert_eq!(outcome.dispatch.sent, 1);
    assert_eq!(outcome.dispatch.failed, 1);
    // one gateway error plus two refused writes
    assert_eq!(outcome.dispatch.errors.len(), 3);
}

// ============================================================================
// Backfill dispatch
// ============================================================================

#[tokio::test]
async fn test_backfill_sends_history_once() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let classmate = env.admit(&roster, "Bekzod").await;

    env.grade(&member, GradeStatus::Done, Some(4), date(2024, 9, 3)).await;
    env.grade(&member, GradeStatus::NotDone, None, date(2024, 9, 1)).await;
    env.grade(&member, GradeStatus::Absent, None, date(2024, 9, 2)).await;
    // leaves the member PENDING on the 4th
    env.grade(&classmate, GradeStatus::Done, Some(5), date(2024, 9, 4)).await;
    assert_eq!(env.store.grades_of(member.id).len(), 4);

    let guardian = env.guardian_of(&member, "Mother").await;
    let sent = env.gateway.sends_to(private_chat(&guardian));
    assert_eq!(sent.len(), 3);
    assert!(sent[0].contains("Date: 2024-09-01"));
    assert!(sent[1].contains("Date: 2024-09-02"));
    assert!(sent[2].contains("Date: 2024-09-03"));

    let again = env
        .guardians()
        .link_guardian(guardian.external_id, member.code.as_str())
        .await
        .unwrap();
    assert!(!again.newly_linked);
    assert_eq!(again.backfill.attempted, 0);
    assert_eq!(again.backfill.skipped, 3);
    assert_eq!(env.gateway.sends_to(private_chat(&guardian)).len(), 3);
    assert_eq!(env.store.notifications_for(guardian.id).len(), 3);
}

#[tokio::test]
async fn test_backfill_does_not_retry_failed_rows() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    env.grade(&member, GradeStatus::Done, Some(4), date(2024, 9, 2)).await;

    let guardian = env
        .guardians()
        .register_guardian(tally_service::dto::RegisterGuardianRequest {
            external_id: tally_integration_tests::unique_user(),
            display_name: "Mother".to_string(),
            contact: "+998901112233".to_string(),
        })
        .await
        .unwrap();
    let chat = private_chat(&guardian);
    env.gateway
        .fail_sends_to(chat, GatewayError::Forbidden("bot was blocked by the user".into()));

    let first = env
        .guardians()
        .link_guardian(guardian.external_id, member.code.as_str())
        .await
        .unwrap();
    assert_eq!((first.backfill.attempted, first.backfill.failed), (1, 1));

    env.gateway.restore_sends_to(chat);
    let second = env
        .guardians()
        .link_guardian(guardian.external_id, member.code.as_str())
        .await
        .unwrap();
    assert_eq!(second.backfill.attempted, 0);
    assert_eq!(
        env.store.notifications_for(guardian.id)[0].status,
        NotificationStatus::Failed
    );
}

#[tokio::test]
async fn test_backfill_skips_live_notified_grades() {
    let env = TestEnv::new();
    let roster = env.roster().await;
    let member = env.admit(&roster, "Aziza").await;
    let guardian = env.guardian_of(&member, "Mother").await;

    env.grade(&member, GradeStatus::Done, Some(5), date(2024, 9, 2)).await;
    let report = env
        .dispatcher()
        .dispatch_backfill(&member, &guardian)
        .await
        .unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(env.gateway.sends_to(private_chat(&guardian)).len(), 1);
}
