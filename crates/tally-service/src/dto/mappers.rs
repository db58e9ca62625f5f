//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities and service results to
//! response DTOs. Titles fall back to the configured default roster title, so
//! the conversions that need one are plain functions.

use tally_core::entities::{GradeDetails, Guardian, Member, MemberDirectoryEntry, RosterSummary};

use super::responses::{
    DirectoryEntryResponse, DispatchResponse, GradeOutcomeResponse, GradeResponse,
    GuardianResponse, LeaderboardResponse, LinkResponse, MemberResponse, RosterSummaryResponse,
    StandingResponse,
};
use crate::services::{DispatchReport, GradeOutcome, LinkOutcome, Standing, SyncReport};

// ============================================================================
// Member Mappers
// ============================================================================

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            display_name: member.display_name.clone(),
            code: member.code.to_string(),
            handle: member.handle.clone(),
            external_id: member.external_id,
            active: member.is_active(),
        }
    }
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self::from(&member)
    }
}

pub fn directory_entry(entry: &MemberDirectoryEntry, fallback_title: &str) -> DirectoryEntryResponse {
    DirectoryEntryResponse {
        display_name: entry.display_name.clone(),
        code: entry.code.to_string(),
        roster_title: entry
            .roster_title
            .clone()
            .unwrap_or_else(|| fallback_title.to_string()),
    }
}

// ============================================================================
// Roster Mappers
// ============================================================================

pub fn roster_summary(summary: &RosterSummary, fallback_title: &str) -> RosterSummaryResponse {
    RosterSummaryResponse {
        title: summary
            .title
            .clone()
            .unwrap_or_else(|| fallback_title.to_string()),
        chat_id: summary.chat_id,
        member_count: summary.member_count,
    }
}

// ============================================================================
// Grading Mappers
// ============================================================================

pub fn grade_response(details: &GradeDetails, fallback_title: &str) -> GradeResponse {
    GradeResponse {
        grade_id: details.grade.id,
        roster_title: details.roster.display_title(fallback_title).to_string(),
        member_id: details.member.id,
        member_name: details.member.display_name.clone(),
        lesson_date: details.lesson.lesson_date,
        status: details.grade.status,
        score: details.grade.score.map(i32::from),
        updated_at: details.grade.updated_at,
    }
}

impl From<&DispatchReport> for DispatchResponse {
    fn from(report: &DispatchReport) -> Self {
        Self {
            attempted: report.attempted,
            sent: report.sent,
            failed: report.failed,
            skipped: report.skipped,
        }
    }
}

/// Number standings from 1 in their ranked order
pub fn ranked(standings: &[Standing]) -> Vec<StandingResponse> {
    standings
        .iter()
        .enumerate()
        .map(|(i, s)| StandingResponse {
            rank: i + 1,
            member_id: s.member_id,
            display_name: s.display_name.clone(),
            total_score: s.total_score,
            avg_score: s.avg_score,
            done_count: s.done_count,
            not_done_count: s.not_done_count,
            absent_count: s.absent_count,
        })
        .collect()
}

impl From<&SyncReport> for LeaderboardResponse {
    fn from(report: &SyncReport) -> Self {
        Self {
            message_id: report.outcome.message_id(),
            new_message: report.outcome.is_new_message(),
            pinned: report.pinned,
            standings: ranked(&report.standings),
        }
    }
}

pub fn grade_outcome(outcome: &GradeOutcome, fallback_title: &str) -> GradeOutcomeResponse {
    GradeOutcomeResponse {
        grade: grade_response(&outcome.details, fallback_title),
        notifications: DispatchResponse::from(&outcome.dispatch),
        leaderboard: LeaderboardResponse::from(&outcome.leaderboard),
    }
}

// ============================================================================
// Guardian Mappers
// ============================================================================

impl From<&Guardian> for GuardianResponse {
    fn from(guardian: &Guardian) -> Self {
        Self {
            id: guardian.id,
            external_id: guardian.external_id,
            display_name: guardian.display_name.clone(),
            contact: guardian.contact.clone(),
        }
    }
}

impl From<&LinkOutcome> for LinkResponse {
    fn from(outcome: &LinkOutcome) -> Self {
        Self {
            member: MemberResponse::from(&outcome.member),
            newly_linked: outcome.newly_linked,
            backfill: DispatchResponse::from(&outcome.backfill),
        }
    }
}
