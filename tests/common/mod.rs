//! 集成测试共用的内存题库
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use driving_theory_client::error::ApiError;
use driving_theory_client::models::{
    AnswerMap, Attempt, AttemptStatistics, DifficultyBreakdown, FullTestSet, NewAttempt,
    Question, Section, SectionQuestionSet, SectionStatistics, TestResult,
};
use driving_theory_client::workflow::TestFlow;
use driving_theory_client::{ExamApi, SessionStore};

pub fn question(id: u64) -> Question {
    serde_json::from_value(json!({
        "id": id,
        "question_id": format!("Q{:03}", id),
        "text_ar": format!("سؤال {}", id),
        "text_en": format!("Question {}", id),
        "options_ar": ["أ", "ب", "ج", "د"],
        "options_en": ["A", "B", "C", "D"]
    }))
    .unwrap()
}

pub fn section() -> Section {
    serde_json::from_value(json!({
        "id": 3,
        "section_id": "traffic_rules",
        "name_ar": "قواعد المرور",
        "name_en": "Traffic rules",
        "question_count": 40
    }))
    .unwrap()
}

pub fn server_error(endpoint: &str) -> ApiError {
    ApiError::BadResponse {
        endpoint: endpoint.to_string(),
        status: 500,
        message: Some("internal error".to_string()),
    }
}

/// 内存题库
#[derive(Default)]
pub struct FakeExamApi {
    pub questions: Vec<Question>,
    /// 前 N 次拉题失败
    pub load_failures: AtomicUsize,
    pub fail_create: bool,
    pub fail_submit: bool,
    /// 分区列表 / 分区详情 / 统计接口失败
    pub fail_sections: bool,
    pub fail_section: bool,
    pub fail_statistics: bool,
    /// 拉题时重置该会话（模拟用户在加载期间离开）
    pub reset_on_fetch: Mutex<Option<SessionStore>>,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<NewAttempt>>,
    pub submitted: Mutex<Option<AnswerMap>>,
}

impl FakeExamApi {
    pub fn with_questions(n: u64) -> Self {
        Self {
            questions: (1..=n).map(question).collect(),
            ..Default::default()
        }
    }

    pub fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch(&self, endpoint: &str) -> Result<Vec<Question>, ApiError> {
        if let Some(store) = self.reset_on_fetch.lock().unwrap().take() {
            store.reset_session();
        }
        let remaining = self.load_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.load_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(server_error(endpoint));
        }
        Ok(self.questions.clone())
    }

    pub fn submitted_answers(&self) -> AnswerMap {
        self.submitted.lock().unwrap().clone().unwrap_or_default()
    }
}

#[async_trait]
impl ExamApi for FakeExamApi {
    async fn list_sections(&self) -> Result<Vec<Section>, ApiError> {
        self.record("list_sections");
        if self.fail_sections {
            return Err(server_error("sections/"));
        }
        Ok(vec![section()])
    }

    async fn get_section(&self, section_id: &str) -> Result<Section, ApiError> {
        self.record(format!("get_section:{}", section_id));
        if self.fail_section {
            return Err(server_error("sections/detail/"));
        }
        Ok(section())
    }

    async fn section_statistics(&self, section_id: &str) -> Result<SectionStatistics, ApiError> {
        self.record(format!("section_statistics:{}", section_id));
        if self.fail_statistics {
            return Err(server_error("sections/statistics/"));
        }
        Ok(SectionStatistics {
            section_id: section_id.to_string(),
            section_name: "قواعد المرور".to_string(),
            total_questions: self.questions.len() as u32,
            difficulty_breakdown: DifficultyBreakdown {
                easy: 1,
                medium: 1,
                hard: 0,
            },
        })
    }

    async fn random_full_test(&self) -> Result<FullTestSet, ApiError> {
        self.record("random_full_test");
        let questions = self.fetch("questions/random_full_test/")?;
        Ok(FullTestSet {
            total: questions.len(),
            distribution: Default::default(),
            questions,
        })
    }

    async fn questions_by_section(
        &self,
        section_id: &str,
        random: Option<u32>,
    ) -> Result<SectionQuestionSet, ApiError> {
        self.record(format!("questions_by_section:{}:{:?}", section_id, random));
        let mut questions = self.fetch("questions/by_section/")?;
        if let Some(n) = random {
            questions.truncate(n as usize);
        }
        Ok(SectionQuestionSet {
            section: section(),
            total: questions.len(),
            questions,
        })
    }

    async fn create_attempt(&self, request: &NewAttempt) -> Result<Attempt, ApiError> {
        self.record("create_attempt");
        if self.fail_create {
            return Err(server_error("attempts/"));
        }
        self.created.lock().unwrap().push(request.clone());
        Ok(serde_json::from_value(json!({
            "id": 42,
            "test_type": request.test_type,
            "with_timer": request.with_timer,
            "total_questions": request.total_questions
        }))
        .unwrap())
    }

    async fn submit_attempt(
        &self,
        attempt_id: u64,
        answers: &AnswerMap,
    ) -> Result<TestResult, ApiError> {
        self.record(format!("submit_attempt:{}", attempt_id));
        if self.fail_submit {
            return Err(server_error("attempts/42/submit/"));
        }
        *self.submitted.lock().unwrap() = Some(answers.clone());

        let total = self.questions.len() as u32;
        let correct = answers.values().filter(|&&i| i == 0).count() as u32;
        let score = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };
        Ok(TestResult {
            passed: score >= 80.0,
            correct_answers: correct,
            total_questions: total,
            score_percentage: score,
            answered_questions: answers.len() as u32,
            time_taken_seconds: Some(120),
        })
    }

    async fn get_attempt(&self, attempt_id: u64) -> Result<Attempt, ApiError> {
        self.record(format!("get_attempt:{}", attempt_id));
        let answers: Vec<_> = self
            .submitted_answers()
            .into_iter()
            .map(|(question, selected)| {
                json!({
                    "question": question,
                    "selected_answer": selected,
                    "is_correct": selected == 0
                })
            })
            .collect();
        Ok(serde_json::from_value(json!({
            "id": attempt_id,
            "test_type": "full",
            "total_questions": self.questions.len(),
            "answers": answers
        }))
        .unwrap())
    }

    async fn attempt_statistics(&self) -> Result<AttemptStatistics, ApiError> {
        self.record("attempt_statistics");
        if self.fail_statistics {
            return Err(server_error("attempts/statistics/"));
        }
        Ok(AttemptStatistics {
            total_attempts: 0,
            passed_attempts: 0,
            failed_attempts: 0,
            pass_rate: 0.0,
            full_test_attempts: 0,
        })
    }
}

pub fn setup(api: FakeExamApi) -> (Arc<FakeExamApi>, TestFlow) {
    let api = Arc::new(api);
    let flow = TestFlow::new(api.clone(), SessionStore::default());
    (api, flow)
}
