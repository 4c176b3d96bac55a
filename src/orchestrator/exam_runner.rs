//! 终端考试运行器 - 编排层
//!
//! 把终端输入翻译成流程操作：
//! - 数字：选择选项（从 1 开始）
//! - `n` / `p`：下一题 / 上一题（最后一题按 `n` 即交卷）
//! - `f`：提前交卷
//! - `q`：放弃本次测试
//!
//! 倒计时到期与用户输入同时等待，到期后立即交卷。

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, FlowError};
use crate::models::{Language, TestResult};
use crate::results::ResultsView;
use crate::services::ReportWriter;
use crate::session::{ClockDisplay, CountdownTimer, SessionState};
use crate::workflow::{FlowState, TestFlow, TestRequest};

/// 一行输入对应的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 选择选项（下标从 0 开始）
    Select(usize),
    Next,
    Prev,
    Finish,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "n" => Some(Command::Next),
            "p" => Some(Command::Prev),
            "f" => Some(Command::Finish),
            "q" => Some(Command::Quit),
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 => Some(Command::Select(n - 1)),
                _ => None,
            },
        }
    }
}

/// 一次测试的运行结果
#[derive(Debug)]
pub enum RunOutcome {
    /// 拿到成绩并已展示
    Completed(ResultsView),
    /// 用户放弃或输入结束
    Abandoned,
    /// 加载或提交失败，已提示用户
    Failed(FlowError),
}

/// 终端考试运行器
pub struct ExamRunner {
    flow: TestFlow,
    config: Config,
    report_writer: Option<ReportWriter>,
}

impl ExamRunner {
    pub fn new(flow: TestFlow, config: Config) -> Self {
        let report_writer = config.report_file.as_deref().map(ReportWriter::with_path);
        Self {
            flow,
            config,
            report_writer,
        }
    }

    pub fn flow(&self) -> &TestFlow {
        &self.flow
    }

    /// 运行一次测试，输入来自 `input`
    pub async fn run<R>(&mut self, request: TestRequest, input: R) -> AppResult<RunOutcome>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        // ========== 1. 加载（失败时可重试） ==========
        let mut loaded = self.flow.load(request).await;
        while let Err(e) = loaded {
            println!("❌ {}", e.user_message());
            if !matches!(self.flow.state(), FlowState::Failed(_)) {
                return Ok(RunOutcome::Failed(e));
            }
            println!("输入 r 重试，其他任意键返回首页");
            let retry = matches!(
                lines.next_line().await,
                Ok(Some(line)) if line.trim().eq_ignore_ascii_case("r")
            );
            if !retry {
                return Ok(RunOutcome::Failed(e));
            }
            loaded = self.flow.retry().await;
        }

        // ========== 2. 作答 ==========
        self.take_test(&mut lines).await
    }

    /// Ready 之后的作答循环
    async fn take_test<R>(&mut self, lines: &mut tokio::io::Lines<R>) -> AppResult<RunOutcome>
    where
        R: AsyncBufRead + Unpin,
    {
        let expired = Arc::new(Notify::new());
        let notifier = Arc::clone(&expired);
        let mut timer = CountdownTimer::start(
            self.flow.store().clone(),
            self.config.tick_interval(),
            move || notifier.notify_one(),
        );

        let lang = self.config.language;
        let finished = loop {
            // 先取快照再打印，避免持有读锁时阻塞在终端输出上
            let snapshot = self.flow.store().snapshot();
            render_question(&snapshot, lang, self.config.low_time_threshold_secs);

            let command = tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => Command::parse(&line),
                    Ok(None) => Some(Command::Quit),
                    Err(e) => {
                        warn!("⚠️ 读取输入失败: {}", e);
                        Some(Command::Quit)
                    }
                },
                _ = expired.notified() => {
                    println!("⏰ 时间到，正在自动交卷...");
                    break self
                        .flow
                        .on_timer_expired()
                        .await
                        .and_then(|result| result.ok_or(FlowError::ResultMissing));
                }
            };

            let Some(command) = command else {
                println!("无效输入：数字选择选项，n 下一题，p 上一题，f 交卷，q 放弃");
                continue;
            };

            match command {
                Command::Select(index) => {
                    let count = self
                        .flow
                        .store()
                        .read(|s| s.current_question().map_or(0, |q| q.options(lang).len()));
                    if index >= count {
                        println!("没有第 {} 个选项", index + 1);
                        continue;
                    }
                    self.flow.answer(index)?;
                }
                Command::Prev => {
                    self.flow.retreat()?;
                }
                Command::Next => {
                    if self.flow.store().read(SessionState::is_last) {
                        break self.submit().await;
                    }
                    self.flow.advance()?;
                }
                Command::Finish => break self.submit().await,
                Command::Quit => {
                    timer.stop();
                    self.flow.abandon();
                    println!("已放弃本次测试");
                    return Ok(RunOutcome::Abandoned);
                }
            }
        };
        timer.stop();

        match finished {
            Ok(_) => self.show_results().await,
            Err(e) => {
                println!("❌ {}", e.user_message());
                Ok(RunOutcome::Failed(e))
            }
        }
    }

    async fn submit(&mut self) -> Result<TestResult, FlowError> {
        let unanswered = self
            .flow
            .store()
            .read(|s| s.questions().len().saturating_sub(s.answered_count()));
        if unanswered > 0 {
            info!("交卷时仍有 {} 题未作答", unanswered);
        }
        println!("📤 正在提交...");
        self.flow.finish().await
    }

    async fn show_results(&mut self) -> AppResult<RunOutcome> {
        let view = match self.flow.results_view(self.config.language) {
            Ok(view) => view,
            Err(e) => {
                println!("❌ {}，请重新选择测试", e.user_message());
                return Ok(RunOutcome::Failed(e));
            }
        };
        println!("{}", view);

        if let Some(writer) = &self.report_writer {
            if let Err(e) = writer.write(&view).await {
                warn!("⚠️ 写入成绩报告失败: {}", e);
            }
        }
        Ok(RunOutcome::Completed(view))
    }
}

/// 打印当前题目
fn render_question(state: &SessionState, lang: Language, low_time_threshold: u32) {
    let Some(question) = state.current_question() else {
        return;
    };
    let total = state.questions().len();

    println!("\n{}", "─".repeat(60));
    let mut header = format!(
        "第 {}/{} 题 ({:.0}%) | 已作答 {}",
        state.position() + 1,
        total,
        state.progress_percent(),
        state.answered_count()
    );
    if state.timer_enabled() {
        let clock = ClockDisplay::new(state.time_left(), low_time_threshold);
        let marker = if clock.low_time { "⚠️" } else { "⏱️" };
        header.push_str(&format!(" | {} {}", marker, clock));
    }
    println!("{}", header);
    if let Some(section) = state.section() {
        println!("分区: {}", section.name(lang));
    }
    println!("{}", question.text(lang));
    if let Some(url) = question.illustration() {
        println!("[插图] {}", url);
    }

    let selected = state.answer_for(question.id);
    for (index, option) in question.options(lang).iter().enumerate() {
        let mark = if selected == Some(index) { "●" } else { "○" };
        println!("  {} {}. {}", mark, index + 1, option);
    }
    let next_hint = if state.is_last() { "n 交卷" } else { "n 下一题" };
    println!("> 数字选择，{}，p 上一题，f 交卷，q 放弃", next_hint);
}
