//! 翻译模块
//!
//! 根据语言数据替换页面中 `<zlang key="...">` 元素的文本。
//!
//! ## 模块结构
//!
//! - `config`: 配置管理（文件、环境变量）
//! - `dictionary`: 两级语言数据映射
//! - `error`: 错误类型与诊断文本
//! - `service`: 翻译服务（加载、查找、写入页面）
//! - `source`: 语言数据来源
//!
//! ## 使用示例
//!
//! ```no_run
//! use zlang::parsers::html::html_to_dom;
//! use zlang::translation::{FileSource, TranslationService};
//!
//! # async fn example() {
//! let dom = html_to_dom(b"<zlang key=\"greeting\">Hello</zlang>", "utf-8".to_string());
//! let service = TranslationService::new("es", FileSource::new("langConfig.json"));
//! let stats = service.apply_to_page(&dom.document).await;
//! println!("translated {} of {}", stats.translated, stats.targets);
//! # }
//! ```

pub mod config;
pub mod dictionary;
pub mod error;
pub mod service;
pub mod source;

pub use self::config::TranslatorConfig;
pub use self::dictionary::Dictionary;
pub use self::error::{ErrorSeverity, TranslationError, TranslationResult, DATA_NOT_LOADED};
pub use self::service::{PageStats, TargetMarkup, TranslationService};
pub use self::source::{
    resolve_dictionary_url, DictionarySource, FileSource, StaticSource, UrlSource,
};
