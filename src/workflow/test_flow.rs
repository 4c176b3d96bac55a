//! 测试流程 - 流程层
//!
//! 核心职责：定义"一次测试"的完整生命周期
//!
//! 状态顺序：
//! 1. Loading：拉取题目 → 创建测试记录 → 初始化会话
//! 2. Ready：翻题、作答（委托给会话容器）
//! 3. Submitting：提交答案表
//! 4. Done：保存服务端成绩
//!
//! Loading / Submitting 失败进入 Failed。
//! 请求期间会话被重置或替换时，响应直接丢弃，流程回到 Idle。

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::clients::ExamApi;
use crate::error::FlowError;
use crate::models::{
    Language, NewAttempt, Question, QuestionId, Section, TestResult, TestType,
};
use crate::results::ResultsView;
use crate::session::SessionStore;
use crate::workflow::test_request::{TestKind, TestRequest};

/// 失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// 题目或分区加载失败
    Load,
    /// 服务端返回空题目集
    NoQuestions,
    /// 创建测试记录失败
    AttemptCreation,
    /// 提交失败
    Submission,
}

/// 流程状态
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    /// 尚未开始
    Idle,
    Loading,
    /// 可以翻题作答
    Ready,
    Submitting,
    /// 已拿到成绩
    Done(TestResult),
    Failed(FailureReason),
}

impl FlowState {
    /// 状态名（用于日志和错误信息）
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Idle => "Idle",
            FlowState::Loading => "Loading",
            FlowState::Ready => "Ready",
            FlowState::Submitting => "Submitting",
            FlowState::Done(_) => "Done",
            FlowState::Failed(_) => "Failed",
        }
    }
}

/// 测试流程控制器
///
/// - 编排加载、作答、提交的顺序
/// - 不直接持有会话状态，通过注入的 [`SessionStore`] 修改
/// - 只依赖 [`ExamApi`]，测试时可替换为内存实现
pub struct TestFlow {
    api: Arc<dyn ExamApi>,
    store: SessionStore,
    state: FlowState,
    last_request: Option<TestRequest>,
    /// 服务端逐题判定（题目不带正确答案时用于回顾）
    verdicts: HashMap<QuestionId, bool>,
}

impl TestFlow {
    pub fn new(api: Arc<dyn ExamApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            state: FlowState::Idle,
            last_request: None,
            verdicts: HashMap::new(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// 成绩（仅 Done 状态下有）
    pub fn result(&self) -> Option<&TestResult> {
        match &self.state {
            FlowState::Done(result) => Some(result),
            _ => None,
        }
    }

    /// 加载题目并开始新会话
    pub async fn load(&mut self, request: TestRequest) -> Result<(), FlowError> {
        info!("{} 📥 开始加载测试...", request);
        self.last_request = Some(request.clone());
        self.verdicts.clear();
        self.state = FlowState::Loading;

        let ticket = self.store.generation();

        // ========== 1. 拉取题目 ==========
        let (mode, section, questions) = match self.fetch_questions(&request).await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!("{} ❌ 加载题目失败: {}", request, e);
                self.state = FlowState::Failed(FailureReason::Load);
                return Err(FlowError::Load(e));
            }
        };

        if questions.is_empty() {
            warn!("{} ⚠️ 服务端返回空题目集", request);
            self.state = FlowState::Failed(FailureReason::NoQuestions);
            return Err(FlowError::NoQuestionsAvailable);
        }
        info!("{} ✓ 获取到 {} 道题", request, questions.len());

        self.ensure_current(ticket, &request)?;

        // ========== 2. 创建测试记录 ==========
        let new_attempt = NewAttempt {
            test_type: mode,
            section_id: request.section_id().map(str::to_string),
            with_timer: request.with_timer,
            total_questions: questions.len(),
        };
        let attempt = match self.api.create_attempt(&new_attempt).await {
            Ok(attempt) => attempt,
            Err(e) => {
                error!("{} ❌ 创建测试记录失败: {}", request, e);
                self.state = FlowState::Failed(FailureReason::AttemptCreation);
                return Err(FlowError::AttemptCreation(e));
            }
        };
        let attempt_id = attempt.id;

        // ========== 3. 初始化会话 ==========
        match self.store.start_session_if_current(
            ticket,
            mode,
            section,
            request.with_timer,
            questions,
            attempt,
        ) {
            Ok(generation) => {
                info!(
                    "{} ✅ 测试就绪: 记录 #{} (代数 {})",
                    request, attempt_id, generation
                );
                self.state = FlowState::Ready;
                Ok(())
            }
            Err(current) => self.discard_stale(ticket, current, &request),
        }
    }

    /// 用上一次的请求重新加载
    pub async fn retry(&mut self) -> Result<(), FlowError> {
        let request = match (&self.state, &self.last_request) {
            (FlowState::Failed(_), Some(request)) => request.clone(),
            _ => return Err(FlowError::NothingToRetry),
        };
        info!("{} 🔄 重试加载", request);
        self.load(request).await
    }

    /// 下一题，返回当前位置
    pub fn advance(&self) -> Result<usize, FlowError> {
        self.require_ready()?;
        Ok(self.store.advance())
    }

    /// 上一题，返回当前位置
    pub fn retreat(&self) -> Result<usize, FlowError> {
        self.require_ready()?;
        Ok(self.store.retreat())
    }

    /// 为当前题目选择选项
    pub fn answer(&self, option_index: usize) -> Result<QuestionId, FlowError> {
        self.require_ready()?;
        let question_id = self
            .store
            .read(|s| s.current_question().map(|q| q.id))
            .ok_or(FlowError::InvalidState {
                expected: "Ready",
                actual: "Idle",
            })?;
        self.store.record_answer(question_id, option_index);
        debug!("题目 #{} 选择选项 {}", question_id, option_index);
        Ok(question_id)
    }

    /// 交卷
    ///
    /// 不要求全部作答；未作答的题由服务端计为未作答。
    pub async fn finish(&mut self) -> Result<TestResult, FlowError> {
        self.require_ready()?;

        let ticket = self.store.generation();
        let (attempt_id, answers, needs_verdicts) = self.store.read(|s| {
            (
                s.attempt().map(|a| a.id),
                s.answers().clone(),
                s.questions().iter().any(|q| q.correct_answer.is_none()),
            )
        });
        let Some(attempt_id) = attempt_id else {
            warn!("⚠️ 会话已在流程外被重置，无法交卷");
            self.state = FlowState::Idle;
            return Err(FlowError::InvalidState {
                expected: "Ready",
                actual: "Idle",
            });
        };

        self.state = FlowState::Submitting;
        info!(
            "📤 提交测试记录 #{}: 已作答 {} 题",
            attempt_id,
            answers.len()
        );

        let result = match self.api.submit_attempt(attempt_id, &answers).await {
            Ok(result) => result,
            Err(e) => {
                error!("❌ 提交测试记录 #{} 失败: {}", attempt_id, e);
                self.state = FlowState::Failed(FailureReason::Submission);
                return Err(FlowError::Submission(e));
            }
        };

        let current = self.store.generation();
        if current != ticket {
            warn!(
                "⚠️ 提交期间会话已变更 (代数 {} -> {})，丢弃成绩",
                ticket, current
            );
            self.state = FlowState::Idle;
            return Err(FlowError::Stale {
                started: ticket,
                current,
            });
        }

        info!(
            "✅ 成绩: {}/{} ({:.1}%) {}",
            result.correct_answers,
            result.total_questions,
            result.score_percentage,
            if result.passed { "通过" } else { "未通过" }
        );

        if needs_verdicts {
            self.verdicts = self.attempt_verdicts(attempt_id).await;
        }

        self.state = FlowState::Done(result.clone());
        Ok(result)
    }

    /// 倒计时到期
    ///
    /// Ready 状态下立即交卷，其余状态忽略。
    pub async fn on_timer_expired(&mut self) -> Result<Option<TestResult>, FlowError> {
        if self.state != FlowState::Ready {
            debug!("倒计时到期，但当前状态为 {}，忽略", self.state.name());
            return Ok(None);
        }
        info!("⏰ 时间到，自动交卷");
        self.finish().await.map(Some)
    }

    /// 放弃当前测试，清空会话
    pub fn abandon(&mut self) {
        self.store.reset_session();
        self.verdicts.clear();
        self.state = FlowState::Idle;
        info!("🗑️ 会话已清空");
    }

    /// 组合成绩页
    pub fn results_view(&self, lang: Language) -> Result<ResultsView, FlowError> {
        ResultsView::build(
            self.result(),
            &self.store.snapshot(),
            lang,
            &self.verdicts,
        )
    }

    // ========== 内部 ==========

    async fn fetch_questions(
        &self,
        request: &TestRequest,
    ) -> Result<(TestType, Option<Section>, Vec<Question>), crate::error::ApiError> {
        match &request.kind {
            TestKind::Full => {
                let set = self.api.random_full_test().await?;
                debug!("{} 分区分布: {:?}", request, set.distribution);
                Ok((TestType::Full, None, set.questions))
            }
            TestKind::Section(section_id) => {
                let set = self
                    .api
                    .questions_by_section(section_id, request.random)
                    .await?;
                Ok((TestType::Section, Some(set.section), set.questions))
            }
        }
    }

    /// 服务端逐题判定，失败时只影响回顾
    async fn attempt_verdicts(&self, attempt_id: u64) -> HashMap<QuestionId, bool> {
        match self.api.get_attempt(attempt_id).await {
            Ok(attempt) => attempt
                .answers
                .iter()
                .map(|a| (a.question, a.is_correct))
                .collect(),
            Err(e) => {
                warn!("⚠️ 获取逐题判定失败，回顾中将无法区分对错: {}", e);
                HashMap::new()
            }
        }
    }

    fn require_ready(&self) -> Result<(), FlowError> {
        match self.state {
            FlowState::Ready => Ok(()),
            ref other => Err(FlowError::InvalidState {
                expected: "Ready",
                actual: other.name(),
            }),
        }
    }

    fn ensure_current(&mut self, ticket: u64, request: &TestRequest) -> Result<(), FlowError> {
        let current = self.store.generation();
        if current == ticket {
            Ok(())
        } else {
            self.discard_stale(ticket, current, request)
        }
    }

    fn discard_stale(
        &mut self,
        started: u64,
        current: u64,
        request: &TestRequest,
    ) -> Result<(), FlowError> {
        warn!(
            "{} ⚠️ 加载期间会话已变更 (代数 {} -> {})，丢弃响应",
            request, started, current
        );
        self.state = FlowState::Idle;
        Err(FlowError::Stale { started, current })
    }
}
