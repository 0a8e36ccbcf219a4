//! HTML 文档元数据处理模块
//!
//! 此模块负责从文档中读取翻译所需的元数据：
//! - 获取 base URL，用于解析语言数据的相对路径
//! - 处理字符编码声明
//! - 从 `<script>` 标签的配置属性中发现目标语言

use markup5ever_rcdom::Handle;

use crate::core::parse_content_type;

use super::dom::{find_nodes, get_node_attr};

/// 获取文档的 base URL
///
/// 从 HTML 文档的 `<head>` 部分查找 `<base>` 标签并提取其 `href` 属性值。
/// 根据 HTML 规范，只有第一个 `<base>` 标签有效，其余的将被忽略。
pub fn get_base_url(handle: &Handle) -> Option<String> {
    if let Some(base_node) = find_nodes(handle, vec!["html", "head", "base"]).first() {
        // 只有第一个 base 标签起作用（忽略其余的，如果有的话）
        get_node_attr(base_node, "href")
    } else {
        None
    }
}

/// 获取文档字符编码
///
/// 从 HTML 文档的 meta 标签中提取字符编码信息。支持两种格式：
/// 1. HTML5 格式：`<meta charset="utf-8">`
/// 2. HTML4 格式：`<meta http-equiv="content-type" content="text/html; charset=utf-8">`
pub fn get_charset(node: &Handle) -> Option<String> {
    for meta_node in find_nodes(node, vec!["html", "head", "meta"]).iter() {
        if let Some(meta_charset_node_attr_value) = get_node_attr(meta_node, "charset") {
            // 处理 <meta charset="..." /> 格式
            return Some(meta_charset_node_attr_value);
        }

        if get_node_attr(meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-type")
        {
            if let Some(meta_content_type_node_attr_value) = get_node_attr(meta_node, "content") {
                // 处理 <meta http-equiv="content-type" content="text/html; charset=..." /> 格式
                let (_media_type, charset, _is_base64) =
                    parse_content_type(&meta_content_type_node_attr_value);
                return Some(charset);
            }
        }
    }

    None
}

/// 获取所有 `<script>` 标签上声明的语言代码
///
/// 按文档顺序返回非空的属性值（已去除首尾空白）。
pub fn get_script_languages(handle: &Handle, attr_name: &str) -> Vec<String> {
    find_nodes(handle, vec!["script"])
        .iter()
        .filter_map(|script_node| get_node_attr(script_node, attr_name))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// 从文档中发现目标语言
///
/// 多个 `<script>` 声明该属性时，以最后一个为准；值不一致时记录警告。
///
/// # 示例
///
/// ```ignore
/// // <script src="translator.js" zlangu="es"></script>
/// let language = detect_language(&dom.document, "zlangu");
/// assert_eq!(language, Some("es".to_string()));
/// ```
pub fn detect_language(handle: &Handle, attr_name: &str) -> Option<String> {
    let mut languages = get_script_languages(handle, attr_name);

    if let Some(last) = languages.last() {
        if languages.iter().any(|language| language != last) {
            tracing::warn!(
                "多个 <script> 声明了不同的 {} 属性 {:?}，使用最后一个: {}",
                attr_name,
                languages,
                last
            );
        }
    }

    languages.pop()
}
