//! 题库服务接口
//!
//! 流程层只依赖这个 trait，测试时可以替换为内存实现

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    AnswerMap, Attempt, AttemptStatistics, FullTestSet, NewAttempt, Section, SectionQuestionSet,
    SectionStatistics, TestResult,
};

/// 远程题目 / 测试记录服务
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// 所有分区（按服务端顺序）
    async fn list_sections(&self) -> Result<Vec<Section>, ApiError>;

    /// 单个分区
    async fn get_section(&self, section_id: &str) -> Result<Section, ApiError>;

    /// 分区题目统计
    async fn section_statistics(&self, section_id: &str) -> Result<SectionStatistics, ApiError>;

    /// 随机抽取的完整模拟考试题集
    async fn random_full_test(&self) -> Result<FullTestSet, ApiError>;

    /// 分区题目；`random` 给定时服务端随机抽取该数量
    async fn questions_by_section(
        &self,
        section_id: &str,
        random: Option<u32>,
    ) -> Result<SectionQuestionSet, ApiError>;

    /// 创建测试记录
    async fn create_attempt(&self, request: &NewAttempt) -> Result<Attempt, ApiError>;

    /// 提交答案并取回成绩
    async fn submit_attempt(
        &self,
        attempt_id: u64,
        answers: &AnswerMap,
    ) -> Result<TestResult, ApiError>;

    /// 单条测试记录
    async fn get_attempt(&self, attempt_id: u64) -> Result<Attempt, ApiError>;

    /// 全站测试统计
    async fn attempt_statistics(&self) -> Result<AttemptStatistics, ApiError>;
}
