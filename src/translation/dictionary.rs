//! 语言数据（字典）
//!
//! 两级映射：语言代码 → 键 → 译文。加载后不可变。

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::translation::error::{TranslationError, TranslationResult};

/// 语言数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dictionary {
    languages: HashMap<String, HashMap<String, String>>,
}

impl Dictionary {
    /// 从 JSON 字节解析
    ///
    /// 形如 `{ "es": { "greeting": "Hola" } }`；允许 UTF-8 BOM。
    ///
    /// 只有无法解析的 JSON 才会失败。值不是对象的顶层项（如 `"version": 2`）
    /// 不算作语言；`null`、空串、`false`、`0` 以及数组和对象不算作译文；
    /// 其余数字和 `true` 按文本保存。
    pub fn from_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let raw: HashMap<String, Value> = serde_json::from_slice(data)?;

        let languages = raw
            .into_iter()
            .filter_map(|(language, section)| match section {
                Value::Object(entries) => {
                    let entries = entries
                        .into_iter()
                        .filter_map(|(key, value)| entry_text(&value).map(|text| (key, text)))
                        .collect();
                    Some((language, entries))
                }
                other => {
                    tracing::debug!("忽略非语言项 '{}': {}", language, other);
                    None
                }
            })
            .collect();

        Ok(Self { languages })
    }

    /// 查找译文
    ///
    /// 先查语言，再查键。空字符串译文视为缺失。
    pub fn lookup(&self, language: &str, key: &str) -> TranslationResult<&str> {
        let entries = self
            .languages
            .get(language)
            .ok_or_else(|| TranslationError::LanguageNotFound(language.to_string()))?;

        match entries.get(key) {
            Some(text) if !text.is_empty() => Ok(text.as_str()),
            _ => Err(TranslationError::KeyNotFound {
                language: language.to_string(),
                key: key.to_string(),
            }),
        }
    }

    pub fn contains_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// 已排序的语言代码列表
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    /// 语言数量
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// 译文值转为文本，假值和复合值返回 `None`
fn entry_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

impl From<HashMap<String, HashMap<String, String>>> for Dictionary {
    fn from(languages: HashMap<String, HashMap<String, String>>) -> Self {
        Self { languages }
    }
}
