//! Guardian service
//!
//! Registration and member linking for the parties who receive grade
//! notifications.

use tracing::{info, instrument};
use validator::Validate;

use tally_core::entities::{Guardian, Member};
use tally_core::{DomainError, ExternalUserId, MemberCode, MemberId};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::{DispatchReport, NotificationDispatcher};
use crate::dto::RegisterGuardianRequest;

/// Result of linking a guardian to a member
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub guardian: Guardian,
    pub member: Member,
    /// Whether the link did not exist before
    pub newly_linked: bool,
    pub backfill: DispatchReport,
}

/// Guardian service
pub struct GuardianService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GuardianService<'a> {
    /// Create a new GuardianService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a guardian, or update the name and contact of a known one
    #[instrument(skip(self, request), fields(external_id = %request.external_id))]
    pub async fn register_guardian(
        &self,
        request: RegisterGuardianRequest,
    ) -> ServiceResult<Guardian> {
        let request = request.normalized();
        request.validate()?;

        let repo = self.ctx.guardian_repo();
        let existing = match repo.find_by_external_id(request.external_id).await? {
            Some(guardian) => Some(guardian),
            None => match repo
                .create(request.external_id, &request.display_name, &request.contact)
                .await
            {
                Ok(guardian) => {
                    info!(guardian_id = %guardian.id, "Guardian registered");
                    return Ok(guardian);
                }
                Err(DomainError::GuardianExists) => {
                    repo.find_by_external_id(request.external_id).await?
                }
                Err(e) => return Err(e.into()),
            },
        };

        let mut guardian = existing
            .ok_or_else(|| ServiceError::internal("guardian vanished after conflict"))?;
        if guardian.display_name != request.display_name || guardian.contact != request.contact {
            guardian.display_name = request.display_name;
            guardian.contact = request.contact;
            repo.update(&guardian).await?;
            info!(guardian_id = %guardian.id, "Guardian details updated");
        }
        Ok(guardian)
    }

    /// Link a registered guardian to the member holding `code` and send the
    /// member's graded history.
    ///
    /// The history is sent even when the link already existed; grades the
    /// guardian was already notified about are skipped.
    #[instrument(skip(self))]
    pub async fn link_guardian(
        &self,
        guardian_external_id: ExternalUserId,
        code: &str,
    ) -> ServiceResult<LinkOutcome> {
        let guardian = self
            .ctx
            .guardian_repo()
            .find_by_external_id(guardian_external_id)
            .await?
            .ok_or(DomainError::GuardianNotFound(guardian_external_id))?;

        let code =
            MemberCode::parse(code).map_err(|_| DomainError::InvalidMemberCode(code.to_string()))?;
        let member = self
            .ctx
            .member_repo()
            .find_by_code(&code)
            .await?
            .ok_or_else(|| DomainError::MemberCodeNotFound(code.as_str().to_string()))?;

        let newly_linked = self
            .ctx
            .guardian_repo()
            .link(guardian.id, member.id)
            .await?;
        if newly_linked {
            info!(guardian_id = %guardian.id, member_id = %member.id, "Guardian linked");
        }

        let backfill = NotificationDispatcher::new(self.ctx)
            .dispatch_backfill(&member, &guardian)
            .await?;

        Ok(LinkOutcome {
            guardian,
            member,
            newly_linked,
            backfill,
        })
    }

    /// Members a guardian follows
    pub async fn members_of(&self, external_id: ExternalUserId) -> ServiceResult<Vec<Member>> {
        let guardian = self
            .ctx
            .guardian_repo()
            .find_by_external_id(external_id)
            .await?
            .ok_or(DomainError::GuardianNotFound(external_id))?;
        Ok(self.ctx.guardian_repo().members_of(guardian.id).await?)
    }

    /// Guardians following a member
    pub async fn guardians_of(&self, member_id: MemberId) -> ServiceResult<Vec<Guardian>> {
        Ok(self.ctx.guardian_repo().find_by_member(member_id).await?)
    }
}
