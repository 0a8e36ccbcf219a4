//! 翻译配置管理模块
//!
//! 配置按以下顺序叠加：默认值 → 配置文件 → `ZLANG_*` 环境变量。
//! 命令行参数由调用方在加载之后覆盖。

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::service::TargetMarkup;

/// 配置常量
pub mod constants {
    pub const DEFAULT_DICTIONARY: &str = "./langConfig.json";
    pub const DEFAULT_TARGET_TAG: &str = "zlang";
    pub const DEFAULT_KEY_ATTRIBUTE: &str = "key";
    pub const DEFAULT_LANGUAGE_ATTRIBUTE: &str = "zlangu";

    pub const ENV_PREFIX: &str = "ZLANG";

    pub const CONFIG_PATHS: &[&str] = &[
        "zlang.toml",
        ".zlang.toml",
        "~/.config/zlang/config.toml",
        "/etc/zlang/config.toml",
    ];
}

/// 翻译配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// 目标语言；为空时从文档的 `<script>` 属性中发现
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// 语言数据位置（相对页面解析）
    pub dictionary: String,

    /// 目标元素标签名
    pub target_tag: String,

    /// 目标元素上的键属性
    pub key_attribute: String,

    /// `<script>` 上声明语言的属性
    pub language_attribute: String,

    /// 请求超时（秒）；默认无超时
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            language: None,
            dictionary: constants::DEFAULT_DICTIONARY.to_string(),
            target_tag: constants::DEFAULT_TARGET_TAG.to_string(),
            key_attribute: constants::DEFAULT_KEY_ATTRIBUTE.to_string(),
            language_attribute: constants::DEFAULT_LANGUAGE_ATTRIBUTE.to_string(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl TranslatorConfig {
    /// 加载配置
    ///
    /// 指定了路径时该文件必须存在；否则使用 [`constants::CONFIG_PATHS`] 中第一个存在的文件。
    pub fn load(explicit_path: Option<&str>) -> TranslationResult<Self> {
        let mut builder = Config::builder();

        match explicit_path {
            Some(path) => {
                let path = expand_path(path);
                tracing::debug!("加载配置文件: {}", path.display());
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) = Self::find_config_file() {
                    tracing::debug!("加载配置文件: {}", path.display());
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        let config: Self = builder
            .add_source(Environment::with_prefix(constants::ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| TranslationError::ConfigError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> TranslationResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| TranslationError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> TranslationResult<String> {
        toml::to_string_pretty(self).map_err(|e| TranslationError::ConfigError(e.to_string()))
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        let required = [
            ("dictionary", &self.dictionary),
            ("target_tag", &self.target_tag),
            ("key_attribute", &self.key_attribute),
            ("language_attribute", &self.language_attribute),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(TranslationError::ConfigError(format!("{name} 不能为空")));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(TranslationError::ConfigError(
                "timeout_secs 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 明确配置的目标语言（去除空白，空值视为未配置）
    pub fn language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|language| !language.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn markup(&self) -> TargetMarkup {
        TargetMarkup::new(&self.target_tag, &self.key_attribute)
    }

    fn find_config_file() -> Option<PathBuf> {
        constants::CONFIG_PATHS
            .iter()
            .map(|path| expand_path(path))
            .find(|path| path.is_file())
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
