//! Notification dispatcher
//!
//! Delivers grade outcomes to guardians. Live dispatch re-sends on every
//! grading of the same record; backfill dispatch sends each historical grade
//! to a guardian at most once.

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use tally_core::entities::{
    DeliveryOutcome, GradeDetails, GradeStatus, Guardian, Member, Notification,
};
use tally_core::{ChatId, DomainError, TextFormat};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Which dispatch policy is in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Triggered by a grade mutation; always attempts delivery
    Live,
    /// Triggered by a new guardian link; skips pairs that were already handled
    Backfill,
}

/// Tally of one dispatch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Errors that were absorbed, one line each
    pub errors: Vec<String>,
}

impl DispatchReport {
    fn absorb(&mut self, error: impl std::fmt::Display) {
        self.errors.push(error.to_string());
    }
}

/// Plain-text notification sent to a guardian
pub fn format_grade_message(details: &GradeDetails, fallback_title: &str) -> String {
    let score = match (details.grade.status, details.grade.score) {
        (GradeStatus::Done, Some(score)) => score.to_string(),
        _ => "—".to_string(),
    };
    format!(
        "Roster: {}\nMember: {}\nDate: {}\nStatus: {}\nScore: {}",
        details.roster.display_title(fallback_title),
        details.member.display_name,
        details.lesson.lesson_date.format("%Y-%m-%d"),
        details.grade.status.label(),
        score,
    )
}

/// Notification dispatcher
pub struct NotificationDispatcher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationDispatcher<'a> {
    /// Create a new NotificationDispatcher
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fan a fresh grade out to every guardian of its member.
    ///
    /// Never fails: storage and gateway errors are logged per guardian and
    /// counted in the report.
    #[instrument(skip(self, details), fields(grade_id = %details.grade.id, member_id = %details.member.id))]
    pub async fn dispatch_live(&self, details: &GradeDetails) -> DispatchReport {
        let mut report = DispatchReport::default();

        let guardians = match self.ctx.guardian_repo().find_by_member(details.member.id).await {
            Ok(guardians) => guardians,
            Err(e) => {
                warn!(error = %e, "Could not load guardians for live dispatch");
                report.absorb(&e);
                return report;
            }
        };

        for guardian in &guardians {
            if let Err(e) = self.dispatch(details, guardian, DispatchMode::Live, &mut report).await {
                warn!(guardian_id = %guardian.id, error = %e, "Live dispatch failed");
                report.failed += 1;
                report.absorb(&e);
            }
        }

        report
    }

    /// Send a member's graded history to a guardian, oldest lesson first.
    ///
    /// Grades still PENDING are skipped, and so is every grade this guardian
    /// already has a notification row for.
    #[instrument(skip(self, member, guardian), fields(member_id = %member.id, guardian_id = %guardian.id))]
    pub async fn dispatch_backfill(
        &self,
        member: &Member,
        guardian: &Guardian,
    ) -> ServiceResult<DispatchReport> {
        let history = self.ctx.grade_repo().history_for_member(member.id).await?;
        let mut report = DispatchReport::default();

        for details in history
            .iter()
            .filter(|d| d.grade.status != GradeStatus::Pending)
        {
            if let Err(e) = self
                .dispatch(details, guardian, DispatchMode::Backfill, &mut report)
                .await
            {
                warn!(grade_id = %details.grade.id, error = %e, "Backfill dispatch failed");
                report.failed += 1;
                report.absorb(&e);
            }
        }

        info!(
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "Backfill finished"
        );
        Ok(report)
    }

    /// Resolve the notification row for one (grade, guardian) pair and attempt
    /// delivery unless the mode says to skip it.
    ///
    /// Errors are returned only when no delivery was attempted.
    async fn dispatch(
        &self,
        details: &GradeDetails,
        guardian: &Guardian,
        mode: DispatchMode,
        report: &mut DispatchReport,
    ) -> Result<(), DomainError> {
        let Some(notification) = self.resolve(details, guardian, mode).await? else {
            debug!(grade_id = %details.grade.id, guardian_id = %guardian.id, "Already notified");
            report.skipped += 1;
            return Ok(());
        };

        let text = format_grade_message(details, &self.ctx.settings().default_roster_title);
        report.attempted += 1;
        let outcome = match self
            .ctx
            .gateway()
            .send_message(ChatId::from(guardian.external_id), &text, TextFormat::Plain)
            .await
        {
            Ok(_) => {
                report.sent += 1;
                DeliveryOutcome::Sent { at: Utc::now() }
            }
            Err(e) => {
                warn!(guardian_id = %guardian.id, error = %e, "Notification not delivered");
                report.failed += 1;
                report.absorb(&e);
                DeliveryOutcome::failed(&e)
            }
        };

        // The attempt is already counted; an unrecorded outcome is only reported.
        if let Err(e) = self
            .ctx
            .notification_repo()
            .record(notification.id, &outcome)
            .await
        {
            warn!(notification_id = %notification.id, error = %e, "Delivery outcome not recorded");
            report.absorb(&e);
        }
        Ok(())
    }

    /// Live mode fetches or creates the row. Backfill mode only ever creates,
    /// returning `None` when the pair already has a row.
    async fn resolve(
        &self,
        details: &GradeDetails,
        guardian: &Guardian,
        mode: DispatchMode,
    ) -> Result<Option<Notification>, DomainError> {
        let repo = self.ctx.notification_repo();
        let grade_id = details.grade.id;

        if let Some(existing) = repo.find(grade_id, guardian.id).await? {
            return Ok(match mode {
                DispatchMode::Live => Some(existing),
                DispatchMode::Backfill => None,
            });
        }

        match repo.create(grade_id, guardian.id).await {
            Ok(created) => Ok(Some(created)),
            Err(DomainError::NotificationExists) => match mode {
                DispatchMode::Live => repo.find(grade_id, guardian.id).await,
                DispatchMode::Backfill => Ok(None),
            },
            Err(e) => Err(e),
        }
    }
}
