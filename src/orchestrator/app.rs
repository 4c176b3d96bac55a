//! 应用入口 - 编排层
//!
//! 持有配置、题库客户端和会话容器，按路由分派到各页面。
//! 页面内的加载失败在这里兜住：提示用户后回到首页。

use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{info, warn};

use crate::clients::{ExamApi, ExamClient};
use crate::config::Config;
use crate::error::{AppResult, FlowError};
use crate::models::{AttemptStatistics, Language, Section, SectionStatistics};
use crate::orchestrator::exam_runner::{ExamRunner, RunOutcome};
use crate::session::SessionStore;
use crate::utils::logging::{log_startup, truncate_text};
use crate::workflow::{Route, TestFlow};

/// 应用主结构
pub struct App {
    config: Config,
    api: Arc<dyn ExamApi>,
    store: SessionStore,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);
        let client = ExamClient::new(&config)?;
        Ok(Self::with_api(config, Arc::new(client)))
    }

    /// 使用指定的题库实现创建应用
    pub fn with_api(config: Config, api: Arc<dyn ExamApi>) -> Self {
        let store = SessionStore::new(config.test_duration_secs);
        Self { config, api, store }
    }

    /// 运行指定页面，返回最终展示的页面
    ///
    /// 页面加载失败或测试中途结束时回到首页，返回 [`Route::Home`]。
    pub async fn run(&self, route: Route) -> AppResult<Route> {
        info!("📍 打开页面: {:?}", route);
        let loaded = match &route {
            Route::Home => {
                self.show_home().await;
                return Ok(Route::Home);
            }
            Route::Sections => self.show_sections().await,
            Route::SectionDetail(section_id) => self.show_section(section_id).await,
            Route::Test(request) => {
                let flow = TestFlow::new(Arc::clone(&self.api), self.store.clone());
                let mut runner = ExamRunner::new(flow, self.config.clone());
                let input = BufReader::new(tokio::io::stdin());
                match runner.run(request.clone(), input).await? {
                    RunOutcome::Completed(view) => {
                        info!(
                            "🏁 测试结束: {}/{}",
                            view.summary.correct, view.summary.total
                        );
                        Ok(())
                    }
                    // 运行器已经提示过用户
                    RunOutcome::Abandoned | RunOutcome::Failed(_) => {
                        self.show_home().await;
                        return Ok(Route::Home);
                    }
                }
            }
            // 成绩只存在于一次运行的内存中，单独打开成绩页必然没有成绩
            Route::Results => Err(FlowError::ResultMissing),
        };

        match loaded {
            Ok(()) => Ok(route),
            Err(e) => {
                warn!("⚠️ 页面 {:?} 无法展示: {}", route, e);
                println!("❌ {}，返回首页", e.user_message());
                self.show_home().await;
                Ok(Route::Home)
            }
        }
    }

    /// 首页：全站统计 + 可选页面
    ///
    /// 统计获取失败不影响首页本身。
    async fn show_home(&self) {
        match self.api.attempt_statistics().await {
            Ok(stats) => println!("{}", render_statistics(&stats)),
            Err(e) => warn!("⚠️ 获取全站统计失败: {}", e),
        }

        println!("\n可用页面:");
        println!("  /sections                    分区列表");
        println!("  /section/<id>                分区详情");
        println!("  /test/full?timer=true        完整模拟考试（计时）");
        println!("  /test/section/<id>?random=N  分区练习");
    }

    /// 分区列表
    async fn show_sections(&self) -> Result<(), FlowError> {
        let sections = self.api.list_sections().await.map_err(FlowError::Load)?;
        if sections.is_empty() {
            warn!("⚠️ 服务端没有任何分区");
        }
        println!("{}", render_sections(&sections, self.config.language));
        Ok(())
    }

    /// 分区详情：基本信息 + 题目统计
    async fn show_section(&self, section_id: &str) -> Result<(), FlowError> {
        let section = self
            .api
            .get_section(section_id)
            .await
            .map_err(FlowError::Load)?;
        let lang = self.config.language;

        println!("\n{}", section.name(lang));
        println!("{}", section.description(lang));

        match self.api.section_statistics(section_id).await {
            Ok(stats) => println!("{}", render_section_statistics(&stats)),
            Err(e) => warn!("⚠️ 获取分区统计失败: {}", e),
        }

        println!("开始练习: /test/section/{}?timer=false", section.section_id);
        println!("随机 10 题: /test/section/{}?random=10", section.section_id);
        Ok(())
    }
}

fn render_statistics(stats: &AttemptStatistics) -> String {
    format!(
        "{line}\n📊 全站测试统计\n总次数: {} | 完整考试: {}\n✅ 通过: {} | ❌ 未通过: {} | 通过率: {:.1}%\n{line}",
        stats.total_attempts,
        stats.full_test_attempts,
        stats.passed_attempts,
        stats.failed_attempts,
        stats.pass_rate,
        line = "─".repeat(60),
    )
}

fn render_section_statistics(stats: &SectionStatistics) -> String {
    let b = &stats.difficulty_breakdown;
    format!(
        "📚 {}: 共 {} 题\n难度分布: 简单 {} | 中等 {} | 困难 {}",
        stats.section_name, stats.total_questions, b.easy, b.medium, b.hard
    )
}

fn render_sections(sections: &[Section], lang: Language) -> String {
    let mut out = format!("\n共 {} 个分区:", sections.len());
    for section in sections {
        out.push_str(&format!(
            "\n  [{}] {} ({} 题)",
            section.section_id,
            section.name(lang),
            section.question_count
        ));
        let description = section.description(lang);
        if !description.is_empty() {
            out.push_str(&format!("\n      {}", truncate_text(description, 80)));
        }
    }
    out
}
