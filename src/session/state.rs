//! 测试会话状态
//!
//! 纯数据 + 纯转换函数，不做 I/O，不关心谁在订阅

use std::sync::Arc;

use crate::models::{AnswerMap, Attempt, Question, QuestionId, Section, TestType};
use crate::session::timer::{self, Tick};

/// 计时测试的默认时长（秒）
pub const DEFAULT_DURATION_SECS: u32 = 3000;

/// 一次测试的会话状态
///
/// 字段只能通过 [`SessionStore`](crate::session::SessionStore) 的变更接口修改，
/// 对外只暴露只读访问器。
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    attempt: Option<Attempt>,
    questions: Arc<[Question]>,
    position: usize,
    answers: AnswerMap,
    time_left: u32,
    mode: Option<TestType>,
    timer_enabled: bool,
    section: Option<Section>,
}

impl SessionState {
    /// 未开始的空会话
    pub fn new(duration_secs: u32) -> Self {
        Self {
            attempt: None,
            questions: Arc::from(Vec::<Question>::new()),
            position: 0,
            answers: AnswerMap::new(),
            time_left: duration_secs,
            mode: None,
            timer_enabled: false,
            section: None,
        }
    }

    // ========== 转换 ==========

    /// 开始新会话，替换全部状态
    pub(crate) fn start(
        &mut self,
        duration_secs: u32,
        mode: TestType,
        section: Option<Section>,
        timer_enabled: bool,
        questions: Vec<Question>,
    ) {
        *self = Self {
            mode: Some(mode),
            section,
            timer_enabled,
            questions: Arc::from(questions),
            ..Self::new(duration_secs)
        };
    }

    pub(crate) fn set_attempt(&mut self, attempt: Attempt) {
        self.attempt = Some(attempt);
    }

    /// 记录（或覆盖）某题的答案，返回是否有变化
    pub(crate) fn record_answer(&mut self, question_id: QuestionId, option_index: usize) -> bool {
        self.answers.insert(question_id, option_index) != Some(option_index)
    }

    /// 下一题，已在最后一题时不动
    pub(crate) fn advance(&mut self) -> bool {
        if self.position + 1 < self.questions.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// 上一题，已在第一题时不动
    pub(crate) fn retreat(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }

    /// 倒计时走一格；未开启计时返回 `None`
    pub(crate) fn tick(&mut self) -> Option<Tick> {
        if !self.timer_enabled {
            return None;
        }
        let tick = timer::tick(self.time_left);
        self.time_left = tick.remaining;
        Some(tick)
    }

    // ========== 只读访问 ==========

    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.questions.len()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer_for(&self, question_id: QuestionId) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn mode(&self) -> Option<TestType> {
        self.mode
    }

    pub fn timer_enabled(&self) -> bool {
        self.timer_enabled
    }

    pub fn section(&self) -> Option<&Section> {
        self.section.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.mode.is_some()
    }

    /// 进度百分比（当前题号 / 总题数）
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            0.0
        } else {
            (self.position + 1) as f64 / self.questions.len() as f64 * 100.0
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}
