//! # 网络模块
//!
//! 页面与语言数据的获取：
//!
//! - `session` - HTTP会话管理、请求处理、本地文件读取

pub mod session;

// Re-export commonly used items for convenience
pub use session::{RetrieveError, RetrievedResource, Session};
