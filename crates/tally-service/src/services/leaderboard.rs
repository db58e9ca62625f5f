//! Leaderboard synchronizer
//!
//! Recomputes a roster's ranking and reconciles it with the single pinned
//! message that displays it. Reconciliation is driven by [`next_action`], a
//! pure transition function over the gateway's answers.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, instrument, warn};

use tally_core::entities::{Grade, GradeStatus, LeaderboardState, Member, Roster};
use tally_core::{DomainError, GatewayError, MemberId, MessageId, TextFormat};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

// ============================================================================
// Ranking
// ============================================================================

/// One member's aggregated standing
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub member_id: MemberId,
    pub display_name: String,
    pub total_score: i64,
    pub done_count: u32,
    pub not_done_count: u32,
    pub absent_count: u32,
    /// Mean DONE score rounded to two decimals, 0 when nothing is done
    pub avg_score: f64,
}

impl Standing {
    fn new(member: &Member) -> Self {
        Self {
            member_id: member.id,
            display_name: member.display_name.clone(),
            total_score: 0,
            done_count: 0,
            not_done_count: 0,
            absent_count: 0,
            avg_score: 0.0,
        }
    }

    fn record(&mut self, grade: &Grade) {
        match grade.status {
            GradeStatus::Done => {
                self.total_score += i64::from(grade.score.map_or(0, |s| s.value()));
                self.done_count += 1;
            }
            GradeStatus::NotDone => self.not_done_count += 1,
            GradeStatus::Absent => self.absent_count += 1,
            GradeStatus::Pending => {}
        }
    }

    fn finish(&mut self) {
        self.avg_score = if self.done_count > 0 {
            let avg = self.total_score as f64 / f64::from(self.done_count);
            (avg * 100.0).round() / 100.0
        } else {
            0.0
        };
    }
}

/// Ranking order: total, average and done count descending, then name
/// (case-folded) ascending, then member id.
fn compare(a: &Standing, b: &Standing) -> Ordering {
    b.total_score
        .cmp(&a.total_score)
        .then_with(|| b.avg_score.total_cmp(&a.avg_score))
        .then_with(|| b.done_count.cmp(&a.done_count))
        .then_with(|| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
        })
        .then_with(|| a.member_id.cmp(&b.member_id))
}

/// Rank `members` by the roster's `grades`.
///
/// Every member starts at zero; grades of members not in the list are ignored.
pub fn rank(members: &[Member], grades: &[Grade]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = members.iter().map(Standing::new).collect();
    let index: HashMap<MemberId, usize> = standings
        .iter()
        .enumerate()
        .map(|(i, s)| (s.member_id, i))
        .collect();

    for grade in grades {
        if let Some(&i) = index.get(&grade.member_id) {
            standings[i].record(grade);
        }
    }

    standings.iter_mut().for_each(Standing::finish);
    standings.sort_by(compare);
    standings
}

// ============================================================================
// Rendering
// ============================================================================

/// Escape text for Telegram HTML parse mode
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the leaderboard message (HTML)
pub fn render(title: &str, standings: &[Standing], now: DateTime<FixedOffset>) -> String {
    let mut lines = vec![format!("<b>Leaderboard - {}</b>", escape_html(title)), String::new()];

    if standings.is_empty() {
        lines.push("No grades yet.".to_string());
    } else {
        for (rank, s) in standings.iter().enumerate() {
            lines.push(format!("{}. <b>{}</b>", rank + 1, escape_html(&s.display_name)));
            lines.push(format!(
                "Total: {} | Average: {:.2} | Not done: {} | Absent: {}",
                s.total_score, s.avg_score, s.not_done_count, s.absent_count
            ));
            lines.push(String::new());
        }
    }

    lines.push(format!("Updated: {}", now.format("%Y-%m-%d %H:%M")));
    lines.join("\n")
}

// ============================================================================
// Reconciliation
// ============================================================================

/// How an in-place edit went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    Edited,
    /// The gateway reported the text as unchanged
    Unchanged,
    Failed(GatewayError),
}

impl From<Result<(), GatewayError>> for EditResult {
    fn from(result: Result<(), GatewayError>) -> Self {
        match result {
            Ok(()) => Self::Edited,
            Err(GatewayError::NotModified) => Self::Unchanged,
            Err(e) => Self::Failed(e),
        }
    }
}

/// What reconciliation has learned so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Reconciliation starts from the stored message id
    Started(Option<MessageId>),
    /// An edit of the displayed message finished
    EditFinished(MessageId, EditResult),
    /// A new message was sent, possibly replacing an unusable one
    Sent {
        replacing: Option<MessageId>,
        id: MessageId,
    },
}

/// What reconciliation does next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Edit(MessageId),
    Send { replacing: Option<MessageId> },
    /// Pin the resolved message and stop
    Pin(SyncOutcome),
}

/// How the displayed message was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No message was displayed; a new one was sent
    Created(MessageId),
    /// The displayed message was edited in place
    Edited(MessageId),
    /// The displayed message already showed this text
    Unchanged(MessageId),
    /// The displayed message could not be edited and was replaced
    Replaced { old: MessageId, new: MessageId },
}

impl SyncOutcome {
    /// Identifier of the message now displaying the leaderboard
    pub fn message_id(self) -> MessageId {
        match self {
            Self::Created(id) | Self::Edited(id) | Self::Unchanged(id) => id,
            Self::Replaced { new, .. } => new,
        }
    }

    /// Whether a new message id had to be stored
    pub fn is_new_message(self) -> bool {
        matches!(self, Self::Created(_) | Self::Replaced { .. })
    }
}

/// Reconciliation transition function
pub fn next_action(event: SyncEvent) -> SyncAction {
    match event {
        SyncEvent::Started(None) => SyncAction::Send { replacing: None },
        SyncEvent::Started(Some(id)) => SyncAction::Edit(id),
        SyncEvent::EditFinished(id, EditResult::Edited) => SyncAction::Pin(SyncOutcome::Edited(id)),
        SyncEvent::EditFinished(id, EditResult::Unchanged) => {
            SyncAction::Pin(SyncOutcome::Unchanged(id))
        }
        SyncEvent::EditFinished(id, EditResult::Failed(_)) => SyncAction::Send {
            replacing: Some(id),
        },
        SyncEvent::Sent {
            replacing: None,
            id,
        } => SyncAction::Pin(SyncOutcome::Created(id)),
        SyncEvent::Sent {
            replacing: Some(old),
            id,
        } => SyncAction::Pin(SyncOutcome::Replaced { old, new: id }),
    }
}

/// Result of one synchronization
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    /// Whether the best-effort pin succeeded
    pub pinned: bool,
    pub standings: Vec<Standing>,
}

// ============================================================================
// Service
// ============================================================================

/// Leaderboard synchronizer
pub struct LeaderboardSynchronizer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardSynchronizer<'a> {
    /// Create a new LeaderboardSynchronizer
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current ranking of a roster's active members
    #[instrument(skip(self), fields(roster_id = %roster.id))]
    pub async fn standings(&self, roster: &Roster) -> ServiceResult<Vec<Standing>> {
        let members = self.ctx.member_repo().find_active_by_roster(roster.id).await?;
        let grades = self.ctx.grade_repo().find_by_roster(roster.id).await?;
        Ok(rank(&members, &grades))
    }

    /// Recompute the ranking and bring the displayed message up to date.
    ///
    /// Edit failures fall back to sending a replacement and pin failures are
    /// only logged. A failing send is returned as `ServiceError::Gateway`.
    #[instrument(skip(self), fields(roster_id = %roster.id, chat_id = %roster.chat_id))]
    pub async fn sync(&self, roster: &Roster) -> ServiceResult<SyncReport> {
        let standings = self.standings(roster).await?;
        let settings = self.ctx.settings();
        let text = render(
            roster.display_title(&settings.default_roster_title),
            &standings,
            settings.now(),
        );
        let state = self.load_state(roster).await?;
        let gateway = self.ctx.gateway();

        let mut action = next_action(SyncEvent::Started(state.message_id));
        loop {
            action = match action {
                SyncAction::Edit(id) => {
                    let result = EditResult::from(
                        gateway
                            .edit_message(roster.chat_id, id, &text, TextFormat::Html)
                            .await,
                    );
                    match &result {
                        EditResult::Unchanged => debug!(message_id = %id, "Leaderboard unchanged"),
                        EditResult::Failed(e) => {
                            warn!(message_id = %id, error = %e, "Leaderboard edit failed, sending a new message");
                        }
                        EditResult::Edited => {}
                    }
                    next_action(SyncEvent::EditFinished(id, result))
                }
                SyncAction::Send { replacing } => {
                    let id = gateway
                        .send_message(roster.chat_id, &text, TextFormat::Html)
                        .await
                        .map_err(ServiceError::Gateway)?;
                    self.ctx
                        .leaderboard_repo()
                        .set_message(roster.id, id, Utc::now())
                        .await?;
                    info!(message_id = %id, replaced = ?replacing, "Leaderboard message stored");
                    next_action(SyncEvent::Sent { replacing, id })
                }
                SyncAction::Pin(outcome) => {
                    let id = outcome.message_id();
                    let pinned = match gateway.pin_message(roster.chat_id, id).await {
                        Ok(()) => true,
                        Err(e) => {
                            warn!(message_id = %id, error = %e, "Could not pin leaderboard");
                            false
                        }
                    };
                    return Ok(SyncReport {
                        outcome,
                        pinned,
                        standings,
                    });
                }
            };
        }
    }

    /// Fetch the roster's state, creating it on first use
    async fn load_state(&self, roster: &Roster) -> ServiceResult<LeaderboardState> {
        let repo = self.ctx.leaderboard_repo();
        if let Some(state) = repo.find(roster.id).await? {
            return Ok(state);
        }
        match repo.create(roster.id).await {
            Ok(state) => Ok(state),
            Err(DomainError::LeaderboardStateExists) => repo
                .find(roster.id)
                .await?
                .ok_or_else(|| ServiceError::internal("leaderboard state vanished after conflict")),
            Err(e) => Err(e.into()),
        }
    }
}
