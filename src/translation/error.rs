//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型，以及把错误转换为页面上可见的诊断文本的机制

use thiserror::Error;

/// 语言数据未加载时写入页面的固定诊断文本
pub const DATA_NOT_LOADED: &str = "Error: Language data not loaded.";

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 语言数据加载失败（网络、状态码或 JSON 解析）
    #[error("语言数据加载失败 ({location}): {reason}")]
    LoadFailure { location: String, reason: String },

    /// 语言数据中没有该语言
    #[error("语言 '{0}' 不存在")]
    LanguageNotFound(String),

    /// 该语言下没有该键
    #[error("语言 '{language}' 中不存在键 '{key}'")]
    KeyNotFound { language: String, key: String },

    /// 目标元素缺少键属性
    #[error("<{tag}> 元素缺少 '{attribute}' 属性")]
    MissingKeyAttribute { tag: String, attribute: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),
}

impl TranslationError {
    pub fn load_failure(location: impl Into<String>, reason: impl ToString) -> Self {
        TranslationError::LoadFailure {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// 获取写入页面的诊断文本
    pub fn diagnostic(&self) -> String {
        match self {
            TranslationError::LoadFailure { .. } => DATA_NOT_LOADED.to_string(),
            TranslationError::LanguageNotFound(language) => {
                format!("Error: Language '{language}' not found in configuration.")
            }
            TranslationError::KeyNotFound { language, key } => {
                format!("Key '{key}' not found in language '{language}'.")
            }
            other => format!("Error: {other}"),
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::LoadFailure { .. } => ErrorSeverity::Error,
            TranslationError::LanguageNotFound(_) => ErrorSeverity::Warning,
            TranslationError::KeyNotFound { .. } => ErrorSeverity::Warning,
            TranslationError::MissingKeyAttribute { .. } => ErrorSeverity::Warning,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 翻译结果类型
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 按严重程度记录错误
pub fn log_error(error: &TranslationError) {
    match error.severity() {
        ErrorSeverity::Info => tracing::info!("{}", error),
        ErrorSeverity::Warning => tracing::warn!("{}", error),
        ErrorSeverity::Error | ErrorSeverity::Critical => tracing::error!("{}", error),
    }
}
