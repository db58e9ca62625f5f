//! Roster, lesson and leaderboard model mappers

use tally_core::entities::{LeaderboardState, Lesson, Roster, RosterSummary};
use tally_core::value_objects::{ChatId, LessonId, MessageId, RosterId};

use crate::models::{LeaderboardStateModel, LessonModel, RosterModel, RosterSummaryModel};

impl From<RosterModel> for Roster {
    fn from(model: RosterModel) -> Self {
        Roster {
            id: RosterId::new(model.id),
            chat_id: ChatId::new(model.chat_id),
            title: model.title,
            created_at: model.created_at,
        }
    }
}

impl From<RosterSummaryModel> for RosterSummary {
    fn from(model: RosterSummaryModel) -> Self {
        RosterSummary {
            title: model.title,
            chat_id: ChatId::new(model.chat_id),
            member_count: model.member_count,
        }
    }
}

impl From<LessonModel> for Lesson {
    fn from(model: LessonModel) -> Self {
        Lesson {
            id: LessonId::new(model.id),
            roster_id: RosterId::new(model.roster_id),
            lesson_date: model.lesson_date,
        }
    }
}

impl From<LeaderboardStateModel> for LeaderboardState {
    fn from(model: LeaderboardStateModel) -> Self {
        LeaderboardState {
            roster_id: RosterId::new(model.roster_id),
            message_id: model.message_id.map(MessageId::new),
            updated_at: model.updated_at,
        }
    }
}
