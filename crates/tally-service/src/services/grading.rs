//! Grade ledger
//!
//! Owns the grade of every (lesson, member) pair and, through the store, the
//! member's not-done counter. `grade_member` is the full unit of work behind
//! one grading action: mutate, notify, then refresh the leaderboard.

use tracing::{info, instrument};
use validator::Validate;

use tally_core::entities::{GradeChange, GradeDetails, GradeStatus, Lesson, Member};
use tally_core::{DomainError, ExternalUserId};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::leaderboard::{LeaderboardSynchronizer, SyncReport};
use super::notification::{DispatchReport, NotificationDispatcher};
use super::roster::RosterService;
use crate::dto::GradeMemberRequest;

/// Everything a grading action produced
#[derive(Debug, Clone)]
pub struct GradeOutcome {
    pub details: GradeDetails,
    pub dispatch: DispatchReport,
    pub leaderboard: SyncReport,
}

/// Grade ledger
pub struct GradeLedger<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GradeLedger<'a> {
    /// Create a new GradeLedger
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Give every member without a grade for `lesson` a PENDING one.
    ///
    /// Existing grades are left untouched. Returns how many were created.
    #[instrument(skip(self, lesson, members), fields(lesson_id = %lesson.id, members = members.len()))]
    pub async fn ensure_lesson_grades(
        &self,
        lesson: &Lesson,
        members: &[Member],
    ) -> ServiceResult<u64> {
        let ids: Vec<_> = members
            .iter()
            .filter(|m| m.is_active())
            .map(|m| m.id)
            .collect();
        if ids.is_empty() {
            return Ok(0);
        }
        Ok(self.ctx.grade_repo().insert_pending(lesson.id, &ids).await?)
    }

    /// Overwrite a member's grade for a lesson, creating it first if needed.
    ///
    /// DONE requires a score in 1..=5; other statuses drop the score. The
    /// not-done counter moves in the same transaction.
    #[instrument(skip(self, lesson, member), fields(lesson_id = %lesson.id, member_id = %member.id))]
    pub async fn set_grade(
        &self,
        lesson: &Lesson,
        member: &Member,
        status: GradeStatus,
        score: Option<i32>,
        grader: Option<ExternalUserId>,
    ) -> ServiceResult<GradeDetails> {
        let change = GradeChange::new(status, score, grader)?;
        self.apply(lesson, member, &change).await
    }

    async fn apply(
        &self,
        lesson: &Lesson,
        member: &Member,
        change: &GradeChange,
    ) -> ServiceResult<GradeDetails> {
        if member.roster_id != lesson.roster_id {
            return Err(DomainError::MemberNotInRoster {
                member: member.id,
                roster: lesson.roster_id,
            }
            .into());
        }

        let transition = self
            .ctx
            .grade_repo()
            .apply_change(lesson.id, member.id, change)
            .await?;

        let grade_id = transition.grade.id;
        let details = self
            .ctx
            .grade_repo()
            .find_details(grade_id)
            .await?
            .ok_or(DomainError::GradeNotFound(grade_id))?;

        info!(
            grade_id = %grade_id,
            from = transition.previous_status.as_str(),
            to = details.grade.status.as_str(),
            score = ?details.grade.score,
            "Grade set"
        );
        Ok(details)
    }

    /// Grade a member on behalf of a privileged actor.
    ///
    /// The grade is committed before guardians are notified and the
    /// leaderboard is refreshed; failures in those later steps never undo it.
    /// Only a failed leaderboard send is returned as an error.
    #[instrument(skip(self, request), fields(chat_id = %request.chat_id, member_id = %request.member_id))]
    pub async fn grade_member(&self, request: GradeMemberRequest) -> ServiceResult<GradeOutcome> {
        request.validate()?;
        if !request.actor.privileged {
            return Err(ServiceError::permission_denied("grade members"));
        }
        let change = GradeChange::new(request.status, request.score, request.actor.user_id)?;

        let rosters = RosterService::new(self.ctx);
        let roster = rosters
            .ensure_roster(request.chat_id, request.chat_title.as_deref())
            .await?;

        let member = self
            .ctx
            .member_repo()
            .find_by_id(request.member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(request.member_id))?;
        if member.roster_id != roster.id {
            return Err(DomainError::MemberNotInRoster {
                member: member.id,
                roster: roster.id,
            }
            .into());
        }

        let date = request.lesson_date.unwrap_or_else(|| rosters.today());
        let lesson = rosters.lesson_for(&roster, date).await?;
        let active = rosters.active_members(&roster).await?;
        self.ensure_lesson_grades(&lesson, &active).await?;

        let details = self.apply(&lesson, &member, &change).await?;

        let dispatch = NotificationDispatcher::new(self.ctx)
            .dispatch_live(&details)
            .await;
        let leaderboard = LeaderboardSynchronizer::new(self.ctx)
            .sync(&details.roster)
            .await?;

        Ok(GradeOutcome {
            details,
            dispatch,
            leaderboard,
        })
    }
}
