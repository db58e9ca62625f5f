//! Roster service
//!
//! Rosters, their members and their lessons.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument};
use validator::Validate;

use tally_core::entities::{
    clean_handle, Lesson, Member, MemberDirectoryEntry, MemberStatus, NewMember, Roster,
    RosterSummary,
};
use tally_core::{ChatId, DomainError, ExternalUserId, MemberCode, MemberId};

use super::code::allocate_code;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use crate::dto::AdmitMemberRequest;

/// Roster service
pub struct RosterService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RosterService<'a> {
    /// Create a new RosterService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Roster of a chat, created on first use.
    ///
    /// A different non-empty `title` replaces the stored one.
    #[instrument(skip(self))]
    pub async fn ensure_roster(&self, chat_id: ChatId, title: Option<&str>) -> ServiceResult<Roster> {
        let repo = self.ctx.roster_repo();

        if let Some(mut roster) = repo.find_by_chat(chat_id).await? {
            if let Some(new_title) = title.filter(|_| roster.needs_title_refresh(title)) {
                repo.update_title(roster.id, new_title).await?;
                debug!(roster_id = %roster.id, "Roster title refreshed");
                roster.title = Some(new_title.to_string());
            }
            return Ok(roster);
        }

        let title = title.filter(|t| !t.is_empty());
        match repo.create(chat_id, title).await {
            Ok(roster) => {
                info!(roster_id = %roster.id, "Roster created");
                Ok(roster)
            }
            Err(DomainError::RosterExists(_)) => repo
                .find_by_chat(chat_id)
                .await?
                .ok_or_else(|| ServiceError::internal("roster vanished after conflict")),
            Err(e) => Err(e.into()),
        }
    }

    /// Admit a chat participant to a roster.
    ///
    /// A participant already known by identity or handle is renamed,
    /// has unknown identity fields filled in and is reactivated. Anyone else
    /// becomes a new member with a freshly allocated code.
    #[instrument(skip(self, roster, request), fields(roster_id = %roster.id))]
    pub async fn admit_member(
        &self,
        roster: &Roster,
        request: AdmitMemberRequest,
    ) -> ServiceResult<Member> {
        let request = AdmitMemberRequest {
            display_name: request.display_name.trim().to_string(),
            ..request
        };
        request.validate()?;

        let handle = clean_handle(request.handle.as_deref());
        if request.external_id.is_none() && handle.is_none() {
            return Err(DomainError::MissingIdentity.into());
        }

        if let Some(mut member) = self
            .find_existing(roster, request.external_id, handle.as_deref())
            .await?
        {
            member.display_name = request.display_name;
            member.backfill_identity(request.external_id, handle.as_deref());
            member.status = MemberStatus::Active;
            self.ctx.member_repo().update(&member).await?;
            info!(member_id = %member.id, "Member re-admitted");
            return Ok(member);
        }

        let member = self
            .insert_member(|code| NewMember {
                roster_id: roster.id,
                external_id: request.external_id,
                handle: handle.clone(),
                display_name: request.display_name.clone(),
                code,
            })
            .await?;
        self.ctx.stats_repo().ensure(member.id).await?;

        info!(member_id = %member.id, code = %member.code, "Member admitted");
        Ok(member)
    }

    /// Complete a member's missing identity by their code.
    ///
    /// Known identity fields are never overwritten and no member is created.
    #[instrument(skip(self))]
    pub async fn complete_identity_by_code(
        &self,
        code: &str,
        external_id: Option<ExternalUserId>,
        handle: Option<&str>,
    ) -> ServiceResult<Member> {
        let code =
            MemberCode::parse(code).map_err(|_| DomainError::InvalidMemberCode(code.to_string()))?;
        let mut member = self
            .ctx
            .member_repo()
            .find_by_code(&code)
            .await?
            .ok_or_else(|| DomainError::MemberCodeNotFound(code.as_str().to_string()))?;

        let handle = clean_handle(handle);
        if member.backfill_identity(external_id, handle.as_deref()) {
            self.ctx.member_repo().update(&member).await?;
            info!(member_id = %member.id, "Member identity completed");
        }
        Ok(member)
    }

    /// Mark a member inactive; their grades are kept
    #[instrument(skip(self))]
    pub async fn deactivate_member(&self, member_id: MemberId) -> ServiceResult<Member> {
        let mut member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(member_id))?;

        if member.is_active() {
            member.status = MemberStatus::Inactive;
            self.ctx.member_repo().update(&member).await?;
            info!(member_id = %member.id, "Member deactivated");
        }
        Ok(member)
    }

    /// Active members of a roster, ordered by id
    pub async fn active_members(&self, roster: &Roster) -> ServiceResult<Vec<Member>> {
        Ok(self.ctx.member_repo().find_active_by_roster(roster.id).await?)
    }

    /// Lesson of a roster on a date, created on first use
    #[instrument(skip(self, roster), fields(roster_id = %roster.id))]
    pub async fn lesson_for(&self, roster: &Roster, date: NaiveDate) -> ServiceResult<Lesson> {
        let repo = self.ctx.lesson_repo();
        if let Some(lesson) = repo.find(roster.id, date).await? {
            return Ok(lesson);
        }
        match repo.create(roster.id, date).await {
            Ok(lesson) => Ok(lesson),
            Err(DomainError::LessonExists) => repo
                .find(roster.id, date)
                .await?
                .ok_or_else(|| ServiceError::internal("lesson vanished after conflict")),
            Err(e) => Err(e.into()),
        }
    }

    /// Today's date in the configured timezone
    pub fn today(&self) -> NaiveDate {
        self.ctx.settings().today()
    }

    /// Every roster with its member count
    pub async fn overview(&self) -> ServiceResult<Vec<RosterSummary>> {
        Ok(self.ctx.roster_repo().overview().await?)
    }

    /// Every member with its code and roster title
    pub async fn directory(&self) -> ServiceResult<Vec<MemberDirectoryEntry>> {
        Ok(self.ctx.member_repo().directory().await?)
    }

    async fn find_existing(
        &self,
        roster: &Roster,
        external_id: Option<ExternalUserId>,
        handle: Option<&str>,
    ) -> ServiceResult<Option<Member>> {
        let repo = self.ctx.member_repo();
        if let Some(external_id) = external_id {
            if let Some(member) = repo.find_by_external_id(roster.id, external_id).await? {
                return Ok(Some(member));
            }
        }
        if let Some(handle) = handle {
            if let Some(member) = repo.find_by_handle(roster.id, handle).await? {
                return Ok(Some(member));
            }
        }
        Ok(None)
    }

    /// Insert a member under a freshly allocated code, allocating again when a
    /// concurrent admission took the code first
    async fn insert_member<F>(&self, draft: F) -> ServiceResult<Member>
    where
        F: Fn(MemberCode) -> NewMember,
    {
        let repo = self.ctx.member_repo();
        let mut rng = StdRng::from_entropy();
        loop {
            let code = allocate_code(&mut rng, self.ctx.settings().code_length, |code| async move {
                repo.code_exists(&code).await
            })
            .await?;
            let member = draft(code);

            match repo.create(&member).await {
                Ok(created) => return Ok(created),
                Err(DomainError::MemberCodeExists) => {
                    debug!(code = %member.code, "Code taken concurrently, allocating again");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
