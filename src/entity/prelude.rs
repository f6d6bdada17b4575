//! 预导入模块，方便使用

pub use super::attempts::{
    ActiveModel as AttemptActiveModel, Entity as Attempts, Model as AttemptModel,
};
pub use super::choices::{ActiveModel as ChoiceActiveModel, Entity as Choices, Model as ChoiceModel};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::quizzes::{ActiveModel as QuizActiveModel, Entity as Quizzes, Model as QuizModel};
pub use super::student_answers::{
    ActiveModel as StudentAnswerActiveModel, Entity as StudentAnswers, Model as StudentAnswerModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
