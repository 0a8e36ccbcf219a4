//! # zlang
//!
//! 根据 JSON 语言数据翻译 HTML 页面中 `<zlang key="...">` 元素的工具库。
//!
//! ## 模块组织
//!
//! - `core` - 页面翻译流程（读取、解析、翻译、序列化）
//! - `parsers` - HTML 解析与 DOM 操作
//! - `network` - 页面与语言数据的获取
//! - `translation` - 翻译服务、语言数据、配置
//! - `env` - 进程级环境变量

pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod translation;

// Re-export commonly used items for convenience
pub use self::core::*;
pub use network::*;
pub use parsers::*;
pub use translation::*;
