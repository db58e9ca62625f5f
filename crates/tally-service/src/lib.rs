//! # tally-service
//!
//! Application layer containing the grading use cases, services and DTOs.
//!
//! ## Overview
//!
//! - [`GradeLedger`] records grades and runs the full grading unit of work
//! - [`NotificationDispatcher`] delivers grade outcomes to guardians
//! - [`LeaderboardSynchronizer`] keeps each roster's pinned ranking current
//! - [`RosterService`] and [`GuardianService`] manage the people involved
//! - [`bootstrap`] wires everything to PostgreSQL and Telegram

pub mod bootstrap;
pub mod dto;
pub mod services;

pub use bootstrap::bootstrap;
pub use services::{
    allocate_code, DispatchReport, GradeLedger, GradeOutcome, GradingSettings, GuardianService,
    LeaderboardSynchronizer, LinkOutcome, NotificationDispatcher, RosterService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, Standing, SyncOutcome, SyncReport,
};
