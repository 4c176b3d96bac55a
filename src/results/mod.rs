pub mod review;

pub use review::{classify, AnswerStatus, ResultsView, ReviewItem, ScoreSummary, FULL_TEST_PASS_MARK};
