//! 学生答案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub choice_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attempts::Entity",
        from = "Column::AttemptId",
        to = "super::attempts::Column::Id"
    )]
    Attempt,
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::choices::Entity",
        from = "Column::ChoiceId",
        to = "super::choices::Column::Id"
    )]
    Choice,
}

impl Related<super::attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempt.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::choices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Choice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student_answer(self) -> crate::models::attempts::entities::StudentAnswer {
        crate::models::attempts::entities::StudentAnswer {
            id: self.id,
            attempt_id: self.attempt_id,
            question_id: self.question_id,
            choice_id: self.choice_id,
        }
    }
}
