//! # 解析器模块
//!
//! 这个模块包含用于解析和处理 HTML 文档的功能：
//!
//! - HTML解析和DOM操作
//! - 文档元数据（字符编码、base URL、语言声明）
//! - 文档序列化
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM操作、元数据处理

pub mod html;

// Re-export commonly used items for convenience
pub use html::{
    detect_language, find_nodes, get_base_url, get_charset, get_node_attr, get_node_text,
    html_to_dom, serialize_document, set_node_text,
};
