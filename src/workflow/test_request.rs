//! 测试请求
//!
//! 封装"要开始哪种测试"这一信息，来自路由参数

use std::fmt::Display;

/// 测试种类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestKind {
    /// 完整模拟考试
    Full,
    /// 指定分区（分区标识，如 `traffic_rules`）
    Section(String),
}

/// 测试请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRequest {
    pub kind: TestKind,
    /// 是否计时
    pub with_timer: bool,
    /// 分区测试时随机抽取的题数，`None` 表示全部
    pub random: Option<u32>,
}

impl TestRequest {
    /// 完整模拟考试
    pub fn full(with_timer: bool) -> Self {
        Self {
            kind: TestKind::Full,
            with_timer,
            random: None,
        }
    }

    /// 分区测试
    pub fn section(section_id: impl Into<String>, with_timer: bool) -> Self {
        Self {
            kind: TestKind::Section(section_id.into()),
            with_timer,
            random: None,
        }
    }

    /// 只抽取 `count` 道题
    pub fn with_random(mut self, count: u32) -> Self {
        self.random = Some(count);
        self
    }

    /// 分区标识（完整考试为 `None`）
    pub fn section_id(&self) -> Option<&str> {
        match &self.kind {
            TestKind::Full => None,
            TestKind::Section(id) => Some(id),
        }
    }
}

impl Display for TestRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let timer = if self.with_timer { "开" } else { "关" };
        match &self.kind {
            TestKind::Full => write!(f, "[完整考试 计时#{}]", timer),
            TestKind::Section(id) => write!(f, "[分区 {} 计时#{}]", id, timer),
        }
    }
}
