use serde::{Deserialize, Serialize};

use crate::models::language::{pick, Language};
use crate::models::section::Section;

/// 题目主键（服务端自增 id，也是答案表的键）
pub type QuestionId = u64;

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// 题目
///
/// 由服务端持有，客户端在一次测试期间只读。
/// 测试用题集不会下发 `correct_answer`，所以这里是可选的。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub section: Option<u64>,
    #[serde(default)]
    pub section_name: Option<String>,

    pub text_ar: String,
    #[serde(default)]
    pub text_en: String,
    #[serde(default)]
    pub text_sv: String,

    pub options_ar: Vec<String>,
    #[serde(default)]
    pub options_en: Option<Vec<String>>,
    #[serde(default)]
    pub options_sv: Option<Vec<String>>,

    #[serde(default)]
    pub correct_answer: Option<usize>,

    #[serde(default)]
    pub explanation_ar: String,
    #[serde(default)]
    pub explanation_en: String,
    #[serde(default)]
    pub explanation_sv: String,

    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl Question {
    /// 题干
    pub fn text(&self, lang: Language) -> &str {
        pick(lang, &self.text_ar, &self.text_en, &self.text_sv)
    }

    /// 选项列表，译文缺失或数量不一致时回退到阿拉伯语
    pub fn options(&self, lang: Language) -> &[String] {
        let localized = match lang {
            Language::Ar => None,
            Language::En => self.options_en.as_deref(),
            Language::Sv => self.options_sv.as_deref(),
        };
        match localized {
            Some(opts) if opts.len() == self.options_ar.len() => opts,
            _ => &self.options_ar,
        }
    }

    /// 单个选项文本
    pub fn option(&self, lang: Language, index: usize) -> Option<&str> {
        self.options(lang).get(index).map(String::as_str)
    }

    /// 解析
    pub fn explanation(&self, lang: Language) -> &str {
        pick(
            lang,
            &self.explanation_ar,
            &self.explanation_en,
            &self.explanation_sv,
        )
    }

    /// 插图地址，空字符串视为没有插图
    pub fn illustration(&self) -> Option<&str> {
        [self.image_url.as_deref(), self.image.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// `GET questions/random_full_test/` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct FullTestSet {
    #[serde(default)]
    pub total: usize,
    /// 各分区抽题数量
    #[serde(default)]
    pub distribution: std::collections::BTreeMap<String, u32>,
    pub questions: Vec<Question>,
}

/// `GET questions/by_section/` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct SectionQuestionSet {
    pub section: Section,
    #[serde(default)]
    pub total: usize,
    pub questions: Vec<Question>,
}
