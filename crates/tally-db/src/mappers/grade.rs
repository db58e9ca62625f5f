//! Grade model mappers

use tally_core::entities::{Grade, GradeDetails, GradeStatus, Lesson, Member, MemberStatus, Roster};
use tally_core::error::DomainError;
use tally_core::value_objects::{
    ChatId, ExternalUserId, GradeId, LessonId, MemberCode, MemberId, RosterId, Score,
};

use crate::models::{GradeDetailsModel, GradeModel};

impl TryFrom<GradeModel> for Grade {
    type Error = DomainError;

    fn try_from(model: GradeModel) -> Result<Self, Self::Error> {
        let score = model
            .score
            .map(Score::try_from)
            .transpose()
            .map_err(|e| DomainError::DatabaseError(format!("stored {e}")))?;

        Ok(Grade {
            id: GradeId::new(model.id),
            lesson_id: LessonId::new(model.lesson_id),
            member_id: MemberId::new(model.member_id),
            status: GradeStatus::parse(&model.status)?,
            score,
            graded_by: model.graded_by.map(ExternalUserId::new),
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<GradeDetailsModel> for GradeDetails {
    type Error = DomainError;

    fn try_from(model: GradeDetailsModel) -> Result<Self, Self::Error> {
        let grade = Grade::try_from(model.grade())?;

        Ok(GradeDetails {
            lesson: Lesson {
                id: LessonId::new(model.lesson_id),
                roster_id: RosterId::new(model.roster_id),
                lesson_date: model.lesson_date,
            },
            roster: Roster {
                id: RosterId::new(model.roster_id),
                chat_id: ChatId::new(model.roster_chat_id),
                title: model.roster_title,
                created_at: model.roster_created_at,
            },
            member: Member {
                id: MemberId::new(model.member_id),
                roster_id: RosterId::new(model.roster_id),
                external_id: model.member_external_id.map(ExternalUserId::new),
                handle: model.member_handle,
                display_name: model.member_display_name,
                code: MemberCode::from_stored(model.member_code),
                status: MemberStatus::from_stored(&model.member_status),
                created_at: model.member_created_at,
            },
            grade,
        })
    }
}
