use serde::{Deserialize, Serialize};

use crate::models::language::{pick, Language};

/// 题目分区（交通安全、交通规则、环境……）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: u64,
    /// 路由和接口里使用的分区标识，如 `traffic_rules`
    pub section_id: String,
    pub name_ar: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description_ar: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub question_count: u32,
    /// 展示用强调色
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub order: i32,
}

impl Section {
    pub fn name(&self, lang: Language) -> &str {
        pick(lang, &self.name_ar, &self.name_en, "")
    }

    pub fn description(&self, lang: Language) -> &str {
        pick(lang, &self.description_ar, &self.description_en, "")
    }
}

/// `GET sections/` 可能返回分页结构，也可能直接返回数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SectionList {
    Paged { results: Vec<Section> },
    Plain(Vec<Section>),
}

impl SectionList {
    pub fn into_vec(self) -> Vec<Section> {
        match self {
            SectionList::Paged { results } => results,
            SectionList::Plain(sections) => sections,
        }
    }
}

/// 按难度统计的题目数
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DifficultyBreakdown {
    #[serde(default)]
    pub easy: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub hard: u32,
}

/// `GET sections/{id}/statistics/` 的响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionStatistics {
    pub section_id: String,
    #[serde(default)]
    pub section_name: String,
    pub total_questions: u32,
    #[serde(default)]
    pub difficulty_breakdown: DifficultyBreakdown,
}
