//! 翻译服务核心模块
//!
//! 加载语言数据（每个服务实例最多一次），查找译文，并把结果写入页面中的目标元素。

use std::sync::Arc;

use markup5ever_rcdom::Handle;
use tokio::sync::OnceCell;

use crate::parsers::html::dom::{find_nodes, get_node_attr, set_node_text};
use crate::translation::config::constants;
use crate::translation::dictionary::Dictionary;
use crate::translation::error::{log_error, TranslationError, TranslationResult};
use crate::translation::source::DictionarySource;

/// 目标元素的标记方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMarkup {
    pub tag: String,
    pub key_attribute: String,
}

impl TargetMarkup {
    /// HTML 解析器会把标签名转为小写，这里保持一致
    pub fn new(tag: &str, key_attribute: &str) -> Self {
        Self {
            tag: tag.trim().to_ascii_lowercase(),
            key_attribute: key_attribute.trim().to_ascii_lowercase(),
        }
    }
}

impl Default for TargetMarkup {
    fn default() -> Self {
        Self::new(constants::DEFAULT_TARGET_TAG, constants::DEFAULT_KEY_ATTRIBUTE)
    }
}

/// 一次页面翻译的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    /// 找到的目标元素
    pub targets: usize,
    /// 写入了译文的元素
    pub translated: usize,
    /// 写入了诊断文本的元素
    pub unresolved: usize,
    /// 缺少键属性而跳过的元素
    pub skipped: usize,
}

/// 翻译服务
pub struct TranslationService<S> {
    language: String,
    source: S,
    markup: TargetMarkup,
    dictionary: OnceCell<TranslationResult<Arc<Dictionary>>>,
}

impl<S: DictionarySource> TranslationService<S> {
    /// 创建新的翻译服务
    pub fn new(language: impl Into<String>, source: S) -> Self {
        Self {
            language: language.into(),
            source,
            markup: TargetMarkup::default(),
            dictionary: OnceCell::new(),
        }
    }

    pub fn with_markup(mut self, markup: TargetMarkup) -> Self {
        self.markup = markup;
        self
    }

    /// 页面使用的语言
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn markup(&self) -> &TargetMarkup {
        &self.markup
    }

    /// 语言数据是否已经尝试加载（无论成功与否）
    pub fn is_loaded(&self) -> bool {
        self.dictionary.initialized()
    }

    /// 加载语言数据
    ///
    /// 第一次调用时获取并解析；结果（包括失败）被缓存，之后的调用不会再次获取。
    /// 并发的首次调用共享同一次加载。
    pub async fn load_dictionary(&self) -> TranslationResult<Arc<Dictionary>> {
        self.dictionary
            .get_or_init(|| self.fetch_dictionary())
            .await
            .clone()
    }

    async fn fetch_dictionary(&self) -> TranslationResult<Arc<Dictionary>> {
        let location = self.source.location();
        tracing::debug!("加载语言数据: {}", location);

        let result = match self.source.fetch().await {
            Ok(data) => Dictionary::from_slice(&data)
                .map_err(|e| TranslationError::load_failure(location.as_str(), e)),
            Err(e) => Err(e),
        };

        match result {
            Ok(dictionary) => {
                tracing::info!(
                    "语言数据加载完成: {} ({} 种语言: {:?})",
                    location,
                    dictionary.len(),
                    dictionary.languages()
                );
                Ok(Arc::new(dictionary))
            }
            Err(e) => {
                log_error(&e);
                Err(e)
            }
        }
    }

    /// 查找译文，失败时返回结构化错误
    pub async fn lookup(&self, language: &str, key: &str) -> TranslationResult<String> {
        let dictionary = self.load_dictionary().await?;
        dictionary.lookup(language, key).map(str::to_string)
    }

    /// 翻译单个键
    ///
    /// 从不失败：语言数据未加载、语言或键缺失时返回诊断文本。
    pub async fn translate(&self, language: &str, key: &str) -> String {
        match self.lookup(language, key).await {
            Ok(text) => text,
            Err(e) => {
                report_miss(&e);
                e.diagnostic()
            }
        }
    }

    /// 翻译页面
    ///
    /// 按文档顺序逐个处理目标元素，用配置语言的译文替换其文本内容。
    /// 缺少键属性的元素保持不变并记录警告。
    pub async fn apply_to_page(&self, document: &Handle) -> PageStats {
        let mut stats = PageStats::default();

        for element in find_nodes(document, vec![self.markup.tag.as_str()]) {
            stats.targets += 1;

            let key = get_node_attr(&element, &self.markup.key_attribute)
                .filter(|key| !key.is_empty());
            let Some(key) = key else {
                log_error(&TranslationError::MissingKeyAttribute {
                    tag: self.markup.tag.clone(),
                    attribute: self.markup.key_attribute.clone(),
                });
                stats.skipped += 1;
                continue;
            };

            let text = match self.lookup(&self.language, &key).await {
                Ok(text) => {
                    stats.translated += 1;
                    text
                }
                Err(e) => {
                    report_miss(&e);
                    stats.unresolved += 1;
                    e.diagnostic()
                }
            };

            set_node_text(&element, &text);
        }

        tracing::debug!(
            "页面翻译完成: 目标 {}, 已翻译 {}, 未解析 {}, 跳过 {}",
            stats.targets,
            stats.translated,
            stats.unresolved,
            stats.skipped
        );

        stats
    }
}

// Load failures are logged once when the dictionary is fetched.
fn report_miss(error: &TranslationError) {
    match error {
        TranslationError::LoadFailure { .. } => tracing::debug!("{}", error),
        other => log_error(other),
    }
}
