use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 测试流程错误
    #[error("流程错误: {0}")]
    Flow(#[from] FlowError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 路由错误
    #[error("路由错误: {0}")]
    Route(#[from] RouteError),
    /// 文件读写错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（连接、超时等）
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非 2xx 状态
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 响应体解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// HTTP 客户端构建失败
    #[error("HTTP客户端初始化失败: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),
}

/// 测试流程错误
///
/// 所有变体对用户都显示为同一条通用提示，区分只用于日志和测试。
#[derive(Debug, Error)]
pub enum FlowError {
    /// 题目或分区加载失败
    #[error("加载测试失败: {0}")]
    Load(#[source] ApiError),
    /// 服务端返回空题目集
    #[error("没有可用的题目")]
    NoQuestionsAvailable,
    /// 创建测试记录失败
    #[error("创建测试记录失败: {0}")]
    AttemptCreation(#[source] ApiError),
    /// 提交答案失败
    #[error("提交答案失败: {0}")]
    Submission(#[source] ApiError),
    /// 提交流程结束但没有拿到成绩
    #[error("缺少测试成绩")]
    ResultMissing,
    /// 当前状态不允许该操作
    #[error("当前状态 {actual} 不允许该操作 (需要 {expected})")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },
    /// 会话在请求期间已被重置或替换，响应被丢弃
    #[error("会话已被替换 (代数 {started} -> {current})，丢弃过期响应")]
    Stale { started: u64, current: u64 },
    /// 没有可重试的请求
    #[error("没有可重试的加载请求")]
    NothingToRetry,
}

impl FlowError {
    /// 面向用户的通用提示
    pub fn user_message(&self) -> &'static str {
        match self {
            FlowError::NoQuestionsAvailable => "没有可用的题目",
            FlowError::Submission(_) | FlowError::ResultMissing => "计算成绩时出错",
            _ => "加载测试失败",
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 不支持的语言代码
    #[error("不支持的语言: {0}")]
    UnknownLanguage(String),
    /// 时长或间隔为 0
    #[error("配置项 {key} 必须大于 0")]
    NotPositive { key: &'static str },
}

/// 路由解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// 无法识别的路径
    #[error("无法识别的路径: {0}")]
    Unknown(String),
    /// 分区测试缺少分区ID
    #[error("分区测试缺少分区ID")]
    MissingSectionId,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读写错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

impl ApiError {
    /// 创建网络请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建 JSON 解析失败错误
    pub fn json_parse_failed(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        ApiError::JsonParseFailed {
            endpoint: endpoint.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
