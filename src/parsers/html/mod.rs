//! HTML解析和处理模块
//!
//! - `dom`: 基础DOM操作（解析、查找节点、读写属性与文本）
//! - `metadata`: 文档元数据处理（base URL、字符编码、语言声明）
//! - `serializer`: 序列化功能

pub mod dom;
pub mod metadata;
pub mod serializer;

pub use dom::{find_nodes, get_node_attr, get_node_text, html_to_dom, set_node_text};
pub use metadata::{detect_language, get_base_url, get_charset, get_script_languages};
pub use serializer::serialize_document;
