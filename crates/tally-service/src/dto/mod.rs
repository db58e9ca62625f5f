//! Data transfer objects exchanged with the command layer
//!
//! This module provides:
//! - Request DTOs with validation for command inputs
//! - Response DTOs for serializing results
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{Actor, AdmitMemberRequest, GradeMemberRequest, RegisterGuardianRequest};

pub use responses::{
    DirectoryEntryResponse, DispatchResponse, GradeOutcomeResponse, GradeResponse,
    GuardianResponse, LeaderboardResponse, LinkResponse, MemberResponse, RosterSummaryResponse,
    StandingResponse,
};
