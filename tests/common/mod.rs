// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use markup5ever_rcdom::RcDom;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use url::Url;

use zlang::parsers::html::{find_nodes, get_node_text, html_to_dom};
use zlang::translation::{DictionarySource, TranslationError, TranslationResult};

pub const SAMPLE_DICTIONARY: &str = r#"{
    "es": { "greeting": "Hola", "farewell": "Adiós" },
    "fr": { "greeting": "Bonjour", "farewell": "Au revoir" }
}"#;

/// 记录获取次数的语言数据来源
pub struct CountingSource {
    data: Option<Vec<u8>>,
    fetches: AtomicUsize,
}

impl CountingSource {
    pub fn new(data: &str) -> Self {
        Self {
            data: Some(data.as_bytes().to_vec()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// 模拟无法访问的语言数据
    pub fn unreachable() -> Self {
        Self {
            data: None,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DictionarySource for CountingSource {
    fn location(&self) -> String {
        "counting://langConfig.json".to_string()
    }

    async fn fetch(&self) -> TranslationResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        self.data
            .clone()
            .ok_or_else(|| TranslationError::load_failure(self.location(), "connection refused"))
    }
}

/// HTML 测试辅助
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    pub fn create_test_dom(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8".to_string())
    }

    /// 所有目标元素的文本，按文档顺序
    pub fn target_texts(dom: &RcDom, tag: &str) -> Vec<String> {
        find_nodes(&dom.document, vec![tag])
            .iter()
            .map(get_node_text)
            .collect()
    }
}

/// 捕获 tracing 输出
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// 在当前线程上安装订阅者，返回的 guard 释放前有效
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }
}

pub struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(self.buf.clone())
    }
}

/// 在本地随机端口启动测试服务器，返回其根 URL
pub async fn spawn_server(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}
