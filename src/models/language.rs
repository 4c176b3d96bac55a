use crate::error::ConfigError;

/// 界面与题目文本语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// 阿拉伯语（题库主语言，所有题目都有）
    #[default]
    Ar,
    /// 英语
    En,
    /// 瑞典语
    Sv,
}

impl Language {
    /// 获取语言代码
    pub fn code(self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
            Language::Sv => "sv",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Language::Ar => "العربية",
            Language::En => "English",
            Language::Sv => "Svenska",
        }
    }

    /// 从语言代码解析（忽略大小写）
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ar" | "arabic" => Some(Language::Ar),
            "en" | "english" => Some(Language::En),
            "sv" | "swedish" => Some(Language::Sv),
            _ => None,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| ConfigError::UnknownLanguage(s.to_string()))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// 按语言挑选文本，译文为空时回退到阿拉伯语
pub(crate) fn pick<'a>(lang: Language, ar: &'a str, en: &'a str, sv: &'a str) -> &'a str {
    let localized = match lang {
        Language::Ar => ar,
        Language::En => en,
        Language::Sv => sv,
    };
    if localized.trim().is_empty() {
        ar
    } else {
        localized
    }
}
