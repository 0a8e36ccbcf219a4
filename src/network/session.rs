//! HTTP会话管理和资源下载

use std::io;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::core::{detect_media_type_by_file_name, parse_content_type};

/// 默认 User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("zlang/", env!("CARGO_PKG_VERSION"));

/// 资源获取错误
#[derive(Error, Debug)]
pub enum RetrieveError {
    #[error("HTTP status {0}")]
    Status(StatusCode),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("invalid file URL: {0}")]
    InvalidFileUrl(String),

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// 已获取的资源
#[derive(Debug, Clone)]
pub struct RetrievedResource {
    pub data: Vec<u8>,
    pub final_url: Url,
    pub media_type: String,
    pub charset: String,
}

/// HTTP 会话
///
/// 包装一个共享的 `reqwest::Client`，克隆开销很小。
/// 同时支持 `file:` URL，以便本地页面按与浏览器相同的方式解析相对路径。
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
}

impl Session {
    /// 创建新的会话
    ///
    /// `timeout` 为 `None` 时请求没有超时限制。
    pub fn new(
        timeout: Option<Duration>,
        user_agent: Option<&str>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// 获取资源
    pub async fn retrieve(&self, url: &Url) -> Result<RetrievedResource, RetrieveError> {
        match url.scheme() {
            "http" | "https" => self.retrieve_remote(url).await,
            "file" => self.retrieve_local(url).await,
            other => Err(RetrieveError::UnsupportedScheme(other.to_string())),
        }
    }

    async fn retrieve_remote(&self, url: &Url) -> Result<RetrievedResource, RetrieveError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RetrieveError::Status(status));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let data = response.bytes().await?.to_vec();

        let (mut media_type, charset, _is_base64) = parse_content_type(&content_type);
        if media_type.is_empty() {
            media_type = detect_media_type_by_file_name(final_url.path());
        }

        Ok(RetrievedResource {
            data,
            final_url,
            media_type,
            charset,
        })
    }

    async fn retrieve_local(&self, url: &Url) -> Result<RetrievedResource, RetrieveError> {
        let path = url
            .to_file_path()
            .map_err(|_| RetrieveError::InvalidFileUrl(url.to_string()))?;

        tracing::debug!("读取本地文件 {}", path.display());
        let data = tokio::fs::read(&path).await?;

        Ok(RetrievedResource {
            data,
            final_url: url.clone(),
            media_type: detect_media_type_by_file_name(url.path()),
            charset: String::new(),
        })
    }
}
