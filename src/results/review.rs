//! 成绩展示
//!
//! 汇总数字直接取自服务端成绩；本地答案表只用于逐题回顾

use std::collections::HashMap;
use std::fmt;

use crate::error::FlowError;
use crate::models::{Language, Question, QuestionId, TestResult, TestType};
use crate::session::SessionState;

/// 完整考试的及格线（答对题数）
pub const FULL_TEST_PASS_MARK: u32 = 52;

/// 单题作答情况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    Unanswered,
    Correct,
    Incorrect,
}

/// 判定单题
///
/// 题目带正确答案时直接比对；测试题集不带答案时使用服务端逐题判定 `verdict`，
/// 两者都没有按答错处理。
pub fn classify(question: &Question, selected: Option<usize>, verdict: Option<bool>) -> AnswerStatus {
    let Some(selected) = selected else {
        return AnswerStatus::Unanswered;
    };
    let correct = match question.correct_answer {
        Some(correct) => correct == selected,
        None => verdict.unwrap_or(false),
    };
    if correct {
        AnswerStatus::Correct
    } else {
        AnswerStatus::Incorrect
    }
}

/// 成绩汇总
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub passed: bool,
    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub score_percentage: f64,
    pub time_taken_seconds: Option<u64>,
}

impl From<&TestResult> for ScoreSummary {
    fn from(result: &TestResult) -> Self {
        Self {
            passed: result.passed,
            total: result.total_questions,
            answered: result.answered_questions,
            correct: result.correct_answers,
            incorrect: result
                .answered_questions
                .saturating_sub(result.correct_answers),
            unanswered: result
                .total_questions
                .saturating_sub(result.answered_questions),
            score_percentage: result.score_percentage,
            time_taken_seconds: result.time_taken_seconds,
        }
    }
}

/// 逐题回顾条目
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    /// 题号（从 1 开始）
    pub number: usize,
    pub question_id: QuestionId,
    pub prompt: String,
    pub status: AnswerStatus,
    /// 考生所选选项
    pub selected: Option<String>,
    /// 正确选项（已知时）
    pub correct: Option<String>,
    pub explanation: String,
}

/// 成绩页
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub summary: ScoreSummary,
    pub mode: Option<TestType>,
    pub items: Vec<ReviewItem>,
}

impl ResultsView {
    /// 组合服务端成绩与本地题目/答案
    ///
    /// 没有成绩时返回 [`FlowError::ResultMissing`]，只影响成绩页本身。
    pub fn build(
        result: Option<&TestResult>,
        session: &SessionState,
        lang: Language,
        verdicts: &HashMap<QuestionId, bool>,
    ) -> Result<Self, FlowError> {
        let result = result.ok_or(FlowError::ResultMissing)?;

        let items = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = session.answer_for(question.id);
                let status = classify(question, selected, verdicts.get(&question.id).copied());
                ReviewItem {
                    number: index + 1,
                    question_id: question.id,
                    prompt: question.text(lang).to_string(),
                    status,
                    selected: selected
                        .and_then(|i| question.option(lang, i))
                        .map(str::to_string),
                    correct: question
                        .correct_answer
                        .and_then(|i| question.option(lang, i))
                        .map(str::to_string),
                    explanation: question.explanation(lang).to_string(),
                }
            })
            .collect();

        Ok(Self {
            summary: ScoreSummary::from(result),
            mode: session.mode(),
            items,
        })
    }

    /// 完整考试未及格时，还差多少道答对才能及格
    pub fn answers_needed_to_pass(&self) -> Option<u32> {
        if self.mode != Some(TestType::Full) || self.summary.passed {
            return None;
        }
        Some(FULL_TEST_PASS_MARK.saturating_sub(self.summary.correct))
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "{}", "=".repeat(60))?;
        if s.passed {
            writeln!(f, "✅ 恭喜！考试通过")?;
        } else {
            writeln!(f, "❌ 很遗憾，未通过")?;
        }
        writeln!(f, "答对 {} / {} 题，得分 {:.1}%", s.correct, s.total, s.score_percentage)?;
        writeln!(
            f,
            "正确 {} | 错误 {} | 未作答 {} | 已作答 {}",
            s.correct, s.incorrect, s.unanswered, s.answered
        )?;
        if let Some(secs) = s.time_taken_seconds {
            writeln!(f, "用时 {}:{:02}", secs / 60, secs % 60)?;
        }
        match (self.mode, self.answers_needed_to_pass()) {
            (Some(TestType::Full), Some(needed)) => {
                writeln!(f, "💡 还需要再答对 {} 题才能通过", needed)?
            }
            (Some(TestType::Full), None) => writeln!(f, "🎉 你已经可以参加正式考试了！")?,
            _ => {}
        }
        writeln!(f, "{}", "=".repeat(60))?;

        writeln!(f, "答案回顾")?;
        for item in &self.items {
            let mark = match item.status {
                AnswerStatus::Correct => "✓",
                AnswerStatus::Incorrect => "✗",
                AnswerStatus::Unanswered => "○",
            };
            writeln!(f, "{} {}. {}", mark, item.number, item.prompt)?;
            match (&item.status, &item.selected) {
                (AnswerStatus::Unanswered, _) => {
                    if let Some(correct) = &item.correct {
                        writeln!(f, "    未作答 - 正确答案: {}", correct)?;
                    } else {
                        writeln!(f, "    未作答")?;
                    }
                }
                (status, Some(selected)) => {
                    writeln!(f, "    你的答案: {}", selected)?;
                    if *status == AnswerStatus::Incorrect {
                        if let Some(correct) = &item.correct {
                            writeln!(f, "    正确答案: {}", correct)?;
                        }
                    }
                }
                (_, None) => {}
            }
            if !item.explanation.is_empty() {
                writeln!(f, "    解析: {}", item.explanation)?;
            }
        }
        Ok(())
    }
}
