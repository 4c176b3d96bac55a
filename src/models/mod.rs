pub mod attempt;
pub mod language;
pub mod question;
pub mod section;

pub use attempt::{
    AnswerMap, Attempt, AttemptAnswer, AttemptStatistics, NewAttempt, Submission, TestResult,
    TestType,
};
pub use language::Language;
pub use question::{Difficulty, FullTestSet, Question, QuestionId, SectionQuestionSet};
pub use section::{DifficultyBreakdown, Section, SectionList, SectionStatistics};
