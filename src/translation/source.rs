//! 语言数据来源
//!
//! 翻译服务只依赖 [`DictionarySource`]，具体从哪里取数据由调用方在构造时注入。

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use url::{ParseError, Url};

use crate::network::session::Session;
use crate::translation::error::{TranslationError, TranslationResult};

/// 语言数据来源
pub trait DictionarySource {
    /// 数据位置描述，用于日志和错误信息
    fn location(&self) -> String;

    /// 获取原始 JSON 字节
    fn fetch(&self) -> impl Future<Output = TranslationResult<Vec<u8>>> + Send;
}

impl<S: DictionarySource> DictionarySource for Arc<S> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn fetch(&self) -> impl Future<Output = TranslationResult<Vec<u8>>> + Send {
        (**self).fetch()
    }
}

/// 通过会话获取 URL 上的语言数据（`http:`、`https:` 或 `file:`）
#[derive(Debug, Clone)]
pub struct UrlSource {
    session: Session,
    url: Url,
}

impl UrlSource {
    pub fn new(session: Session, url: Url) -> Self {
        Self { session, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl DictionarySource for UrlSource {
    fn location(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> TranslationResult<Vec<u8>> {
        self.session
            .retrieve(&self.url)
            .await
            .map(|resource| resource.data)
            .map_err(|e| TranslationError::load_failure(self.url.as_str(), e))
    }
}

/// 本地文件
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DictionarySource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> TranslationResult<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| TranslationError::load_failure(self.location(), e))
    }
}

/// 内存中的语言数据，适用于宿主已经持有 JSON 的场景
#[derive(Debug, Clone)]
pub struct StaticSource {
    data: Vec<u8>,
}

impl StaticSource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl DictionarySource for StaticSource {
    fn location(&self) -> String {
        "<inline>".to_string()
    }

    async fn fetch(&self) -> TranslationResult<Vec<u8>> {
        Ok(self.data.clone())
    }
}

/// 相对于页面 URL 解析语言数据位置
///
/// 与浏览器中 `fetch('./langConfig.json')` 的行为一致：绝对 URL 原样使用，
/// 其余按页面（或其 `<base>`）解析。
pub fn resolve_dictionary_url(base_url: &Url, location: &str) -> TranslationResult<Url> {
    let location = location.trim();
    if location.is_empty() {
        return Err(TranslationError::InvalidInput(
            "dictionary location is empty".to_string(),
        ));
    }

    match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => base_url.join(location).map_err(|e| {
            TranslationError::InvalidInput(format!(
                "cannot resolve \"{location}\" against {base_url}: {e}"
            ))
        }),
        Err(e) => Err(TranslationError::InvalidInput(format!(
            "invalid dictionary location \"{location}\": {e}"
        ))),
    }
}
