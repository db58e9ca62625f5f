//! Test fixtures
//!
//! [`TestEnv`] wires the services to an [`InMemoryStore`] and a
//! [`ScriptedGateway`]. The helpers create the people and requests most tests
//! need.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::Level;

use tally_common::{try_init_tracing_with_config, TracingConfig};
use tally_core::entities::{GradeStatus, Guardian, Member, Roster};
use tally_core::{ChatId, ExternalUserId};
use tally_service::dto::{Actor, AdmitMemberRequest, GradeMemberRequest, RegisterGuardianRequest};
use tally_service::{
    GradeLedger, GradeOutcome, GradingSettings, GuardianService, LeaderboardSynchronizer,
    NotificationDispatcher, RosterService, ServiceContext, ServiceContextBuilder,
};

use crate::gateway::ScriptedGateway;
use crate::memory::InMemoryStore;

/// Group chat most tests grade in
pub const GROUP_CHAT: ChatId = ChatId::new(-100_200_300);

/// Privileged grader
pub const TEACHER: ExternalUserId = ExternalUserId::new(1);

/// Counter for unique platform identities
static COUNTER: AtomicI64 = AtomicI64::new(1_000);

/// Get a unique platform user id
pub fn unique_user() -> ExternalUserId {
    ExternalUserId::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Calendar date shorthand
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Services over in-memory collaborators
pub struct TestEnv {
    pub store: Arc<InMemoryStore>,
    pub gateway: Arc<ScriptedGateway>,
    pub ctx: ServiceContext,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_settings(GradingSettings::default())
    }

    pub fn with_settings(settings: GradingSettings) -> Self {
        let _ = try_init_tracing_with_config(TracingConfig {
            level: Level::WARN,
            ..TracingConfig::default()
        });
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(ScriptedGateway::new());
        let ctx = ServiceContextBuilder::new()
            .roster_repo(store.clone())
            .member_repo(store.clone())
            .stats_repo(store.clone())
            .lesson_repo(store.clone())
            .grade_repo(store.clone())
            .guardian_repo(store.clone())
            .notification_repo(store.clone())
            .leaderboard_repo(store.clone())
            .gateway(gateway.clone())
            .settings(settings)
            .build()
            .expect("complete service context");
        Self {
            store,
            gateway,
            ctx,
        }
    }

    pub fn rosters(&self) -> RosterService<'_> {
        RosterService::new(&self.ctx)
    }

    pub fn ledger(&self) -> GradeLedger<'_> {
        GradeLedger::new(&self.ctx)
    }

    pub fn guardians(&self) -> GuardianService<'_> {
        GuardianService::new(&self.ctx)
    }

    pub fn dispatcher(&self) -> NotificationDispatcher<'_> {
        NotificationDispatcher::new(&self.ctx)
    }

    pub fn leaderboard(&self) -> LeaderboardSynchronizer<'_> {
        LeaderboardSynchronizer::new(&self.ctx)
    }

    /// The roster of [`GROUP_CHAT`]
    pub async fn roster(&self) -> Roster {
        self.rosters()
            .ensure_roster(GROUP_CHAT, Some("Math 7B"))
            .await
            .expect("roster")
    }

    /// Admit a member with a fresh platform identity
    pub async fn admit(&self, roster: &Roster, name: &str) -> Member {
        self.rosters()
            .admit_member(
                roster,
                AdmitMemberRequest {
                    external_id: Some(unique_user()),
                    handle: None,
                    display_name: name.to_string(),
                },
            )
            .await
            .expect("admitted member")
    }

    /// Register a guardian and link them to `member`
    pub async fn guardian_of(&self, member: &Member, name: &str) -> Guardian {
        let guardian = self
            .guardians()
            .register_guardian(RegisterGuardianRequest {
                external_id: unique_user(),
                display_name: name.to_string(),
                contact: "+998901112233".to_string(),
            })
            .await
            .expect("registered guardian");
        self.guardians()
            .link_guardian(guardian.external_id, member.code.as_str())
            .await
            .expect("linked guardian");
        guardian
    }

    /// Grade through the full unit of work as [`TEACHER`]
    pub async fn grade(
        &self,
        member: &Member,
        status: GradeStatus,
        score: Option<i32>,
        on: NaiveDate,
    ) -> GradeOutcome {
        self.ledger()
            .grade_member(grade_request(member, status, score, on))
            .await
            .expect("graded")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Grading request in [`GROUP_CHAT`] by [`TEACHER`]
pub fn grade_request(
    member: &Member,
    status: GradeStatus,
    score: Option<i32>,
    on: NaiveDate,
) -> GradeMemberRequest {
    GradeMemberRequest {
        chat_id: GROUP_CHAT,
        chat_title: Some("Math 7B".to_string()),
        member_id: member.id,
        status,
        score,
        lesson_date: Some(on),
        actor: Actor::privileged(TEACHER),
    }
}
