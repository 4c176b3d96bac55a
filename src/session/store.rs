//! 会话状态容器
//!
//! 唯一持有 `SessionState` 的地方，只暴露变更接口和只读快照。
//! 每次变更都会通知所有订阅者（`tokio::sync::watch`）。
//!
//! 每次开始或重置会话时代数（generation）加一。异步请求开始前记下代数，
//! 返回时代数已变说明会话被替换，响应应当丢弃。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::models::{Attempt, Question, QuestionId, Section, TestType};
use crate::session::state::{SessionState, DEFAULT_DURATION_SECS};
use crate::session::timer::Tick;

/// 会话状态容器句柄，克隆后指向同一份状态
#[derive(Clone)]
pub struct SessionStore {
    shared: Arc<Shared>,
}

struct Shared {
    tx: watch::Sender<SessionState>,
    generation: AtomicU64,
    duration_secs: u32,
}

impl SessionStore {
    /// 创建容器，`duration_secs` 为计时测试的时长
    pub fn new(duration_secs: u32) -> Self {
        let (tx, _rx) = watch::channel(SessionState::new(duration_secs));
        Self {
            shared: Arc::new(Shared {
                tx,
                generation: AtomicU64::new(0),
                duration_secs,
            }),
        }
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.tx.subscribe()
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> SessionState {
        self.shared.tx.borrow().clone()
    }

    /// 在不克隆的情况下读取状态
    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.shared.tx.borrow())
    }

    /// 当前代数
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// 计时测试时长（秒）
    pub fn duration_secs(&self) -> u32 {
        self.shared.duration_secs
    }

    /// 开始新会话，返回新代数
    pub fn start_session(
        &self,
        mode: TestType,
        section: Option<Section>,
        timer_enabled: bool,
        questions: Vec<Question>,
    ) -> u64 {
        let duration = self.shared.duration_secs;
        let mut generation = 0;
        self.shared.tx.send_modify(|state| {
            generation = self.bump();
            state.start(duration, mode, section, timer_enabled, questions);
        });
        debug!("会话开始: 代数 {}", generation);
        generation
    }

    /// 仅当代数仍为 `expected` 时开始新会话
    ///
    /// 代数已变时不做任何修改，返回 `Err(当前代数)`。
    pub fn start_session_if_current(
        &self,
        expected: u64,
        mode: TestType,
        section: Option<Section>,
        timer_enabled: bool,
        questions: Vec<Question>,
        attempt: Attempt,
    ) -> Result<u64, u64> {
        let duration = self.shared.duration_secs;
        let mut outcome = Err(expected);
        self.shared.tx.send_if_modified(|state| {
            let current = self.generation();
            if current != expected {
                outcome = Err(current);
                return false;
            }
            let generation = self.bump();
            state.start(duration, mode, section, timer_enabled, questions);
            state.set_attempt(attempt);
            outcome = Ok(generation);
            true
        });
        outcome
    }

    /// 记录（或覆盖）答案
    pub fn record_answer(&self, question_id: QuestionId, option_index: usize) {
        self.shared
            .tx
            .send_if_modified(|state| state.record_answer(question_id, option_index));
    }

    /// 下一题，返回当前位置
    pub fn advance(&self) -> usize {
        let mut position = 0;
        self.shared.tx.send_if_modified(|state| {
            let moved = state.advance();
            position = state.position();
            moved
        });
        position
    }

    /// 上一题，返回当前位置
    pub fn retreat(&self) -> usize {
        let mut position = 0;
        self.shared.tx.send_if_modified(|state| {
            let moved = state.retreat();
            position = state.position();
            moved
        });
        position
    }

    /// 清空会话，回到从未开始的状态
    pub fn reset_session(&self) {
        let duration = self.shared.duration_secs;
        self.shared.tx.send_modify(|state| {
            self.bump();
            *state = SessionState::new(duration);
        });
        debug!("会话已重置: 代数 {}", self.generation());
    }

    /// 倒计时走一格
    ///
    /// 代数不匹配或未开启计时返回 `None`。
    pub fn tick(&self, generation: u64) -> Option<Tick> {
        let mut result = None;
        self.shared.tx.send_if_modified(|state| {
            if self.generation() != generation {
                return false;
            }
            result = state.tick();
            result.is_some_and(|t| t.remaining != 0 || t.expired)
        });
        result
    }

    fn bump(&self) -> u64 {
        self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}
