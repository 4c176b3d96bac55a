use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::question::QuestionId;

/// 测试类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// 完整模拟考试（65 题）
    Full,
    /// 单个分区练习
    Section,
}

impl TestType {
    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Full => "full",
            TestType::Section => "section",
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 答案表：题目 id -> 选项下标
pub type AnswerMap = HashMap<QuestionId, usize>;

/// 服务端的单题作答记录
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttemptAnswer {
    pub question: QuestionId,
    pub selected_answer: usize,
    pub is_correct: bool,
}

/// 测试记录
///
/// 开始测试时由服务端创建，提交后服务端写入成绩字段。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attempt {
    pub id: u64,
    pub test_type: TestType,
    #[serde(default)]
    pub section: Option<u64>,
    #[serde(default)]
    pub section_name: Option<String>,
    #[serde(default)]
    pub with_timer: bool,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub total_questions: u32,
    #[serde(default)]
    pub answered_questions: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub score_percentage: f64,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub time_taken_seconds: Option<u64>,
    #[serde(default)]
    pub answers: Vec<AttemptAnswer>,
}

/// `POST attempts/` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAttempt {
    pub test_type: TestType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    pub with_timer: bool,
    pub total_questions: usize,
}

/// `POST attempts/{id}/submit/` 请求体
#[derive(Debug, Serialize)]
pub struct Submission<'a> {
    pub answers: &'a AnswerMap,
}

/// 服务端计算的测试成绩
///
/// 直接从提交响应读取，客户端不重新计算。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestResult {
    pub passed: bool,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub score_percentage: f64,
    pub answered_questions: u32,
    #[serde(default)]
    pub time_taken_seconds: Option<u64>,
}

/// `GET attempts/statistics/` 的响应
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttemptStatistics {
    pub total_attempts: u32,
    pub passed_attempts: u32,
    pub failed_attempts: u32,
    pub pass_rate: f64,
    #[serde(default)]
    pub full_test_attempts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attempt_omits_missing_section() {
        let body = NewAttempt {
            test_type: TestType::Full,
            section_id: None,
            with_timer: true,
            total_questions: 65,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"test_type": "full", "with_timer": true, "total_questions": 65})
        );
    }

    #[test]
    fn test_submission_keys_are_question_ids() {
        let mut answers = AnswerMap::new();
        answers.insert(12, 2);
        let json = serde_json::to_value(Submission { answers: &answers }).unwrap();
        assert_eq!(json, serde_json::json!({"answers": {"12": 2}}));
    }

    #[test]
    fn test_result_reads_submitted_attempt() {
        let body = r#"{
            "id": 3,
            "test_type": "section",
            "section": 4,
            "section_name": "البيئة",
            "with_timer": false,
            "started_at": "2026-10-17T08:00:00Z",
            "completed_at": "2026-10-17T08:20:00Z",
            "total_questions": 10,
            "answered_questions": 0,
            "correct_answers": 0,
            "score_percentage": 0.0,
            "passed": false,
            "time_taken_seconds": 1200,
            "answers": []
        }"#;

        let result: TestResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.total_questions, 10);
        assert_eq!(result.answered_questions, 0);
        assert_eq!(result.time_taken_seconds, Some(1200));

        let attempt: Attempt = serde_json::from_str(body).unwrap();
        assert_eq!(attempt.test_type, TestType::Section);
        assert!(attempt.completed_at.is_some());
    }
}
