use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use markup5ever_rcdom::RcDom;
use url::Url;

use crate::network::session::Session;
use crate::parsers::html::{
    detect_language, get_base_url, get_charset, html_to_dom, serialize_document,
};
use crate::translation::{
    resolve_dictionary_url, PageStats, TranslationError, TranslationService, TranslatorConfig,
    UrlSource,
};

/// Represents errors that can occur while translating a page
///
/// Translation misses never end up here; they are written into the page
/// as diagnostic text. This covers everything that prevents producing
/// a page at all.
#[derive(Debug)]
pub struct PageError {
    details: String,
}

impl PageError {
    /// Creates a new PageError with the given message
    pub fn new(msg: &str) -> PageError {
        PageError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl Error for PageError {}

impl From<TranslationError> for PageError {
    fn from(error: TranslationError) -> Self {
        PageError::new(&error.to_string())
    }
}

/// Result of translating one page
#[derive(Debug, Clone)]
pub struct TranslatedPage {
    pub data: Vec<u8>,
    pub language: String,
    pub stats: PageStats,
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";
// All known non-"text/..." plaintext media types
const PLAINTEXT_MEDIA_TYPES: &[&str] = &[
    "application/json",      // .json
    "application/xhtml+xml", // .xhtml
    "application/xml",       // .xml
];

/// Translates a page from a URL or file path
///
/// Fetches the page, resolves the language and dictionary location,
/// replaces the text of every target element and serializes the result
/// in the page's own encoding.
///
/// # Examples
///
/// ```no_run
/// use zlang::core::translate_page;
/// use zlang::translation::TranslatorConfig;
///
/// # async fn example() {
/// let config = TranslatorConfig::default();
/// let page = translate_page("site/index.html", &config).await;
/// # }
/// ```
pub async fn translate_page(
    target: &str,
    config: &TranslatorConfig,
) -> Result<TranslatedPage, PageError> {
    config.validate()?;

    let session = Session::new(config.timeout(), config.user_agent.as_deref())
        .map_err(|e| PageError::new(&format!("Failed to create HTTP client: {e}")))?;
    let target_url = resolve_target(target)?;

    let resource = session
        .retrieve(&target_url)
        .await
        .map_err(|e| PageError::new(&format!("Failed to fetch {target}: {e}")))?;

    // Local files are taken as HTML whatever their extension
    if target_url.scheme() != "file" && !is_plaintext_media_type(&resource.media_type) {
        return Err(PageError::new(&format!(
            "Unsupported media type: {}",
            resource.media_type
        )));
    }

    let input_encoding = Some(resource.charset).filter(|charset| !charset.is_empty());
    PageProcessor::new(session, config)
        .process_document(resource.data, input_encoding, resource.final_url)
        .await
}

/// Translates a page from raw HTML data
///
/// `page_url` is the address the page was loaded from; the dictionary
/// location is resolved against it.
pub async fn translate_document_from_data(
    config: &TranslatorConfig,
    input_data: Vec<u8>,
    input_encoding: Option<String>,
    page_url: Url,
) -> Result<TranslatedPage, PageError> {
    config.validate()?;

    let session = Session::new(config.timeout(), config.user_agent.as_deref())
        .map_err(|e| PageError::new(&format!("Failed to create HTTP client: {e}")))?;

    PageProcessor::new(session, config)
        .process_document(input_data, input_encoding, page_url)
        .await
}

/// Turns a CLI target into a URL
pub fn resolve_target(target: &str) -> Result<Url, PageError> {
    if ["http://", "https://", "file://"]
        .iter()
        .any(|scheme| target.starts_with(scheme))
    {
        return Url::parse(target).map_err(|e| PageError::new(&format!("Invalid URL: {e}")));
    }

    let path = Path::new(target);
    if !path.exists() {
        return Err(PageError::new(&format!("File not found: {target}")));
    }

    let canonical_path = fs::canonicalize(path)
        .map_err(|e| PageError::new(&format!("Failed to read file: {e}")))?;
    Url::from_file_path(&canonical_path).map_err(|_| {
        PageError::new(&format!(
            "could not map path to URL \"{}\"",
            canonical_path.display()
        ))
    })
}

/// Determines the media type based on file extension
pub fn detect_media_type_by_file_name(filename: &str) -> String {
    let filename_lowercased = filename.to_lowercase();

    if filename_lowercased.ends_with(".html") || filename_lowercased.ends_with(".htm") {
        "text/html".to_string()
    } else if filename_lowercased.ends_with(".xhtml") {
        "application/xhtml+xml".to_string()
    } else if filename_lowercased.ends_with(".json") {
        "application/json".to_string()
    } else if filename_lowercased.ends_with(".txt") {
        "text/plain".to_string()
    } else if filename_lowercased.ends_with(".xml") {
        "application/xml".to_string()
    } else {
        "application/octet-stream".to_string()
    }
}

/// Parses Content-Type header value
pub fn parse_content_type(content_type: &str) -> (String, String, bool) {
    let mut media_type = String::new();
    let mut charset = String::new();
    let mut is_base64 = false;

    let parts: Vec<&str> = content_type.split(';').collect();

    if !parts.is_empty() {
        media_type = parts[0].trim().to_lowercase();
    }

    for part in parts.iter().skip(1) {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("charset=") {
            charset = value.trim_matches('"').to_string();
        } else if part == "base64" {
            is_base64 = true;
        }
    }

    (media_type, charset, is_base64)
}

/// Checks if the given media type represents plaintext content
pub fn is_plaintext_media_type(media_type: &str) -> bool {
    media_type.starts_with("text/") || PLAINTEXT_MEDIA_TYPES.contains(&media_type)
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str, use_color: bool) {
    if use_color {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stderr
pub fn print_info_message(msg: &str) {
    eprintln!("{msg}");
}

/// 页面处理器，负责协调整个页面翻译流程
pub struct PageProcessor<'a> {
    session: Session,
    config: &'a TranslatorConfig,
}

impl<'a> PageProcessor<'a> {
    pub fn new(session: Session, config: &'a TranslatorConfig) -> Self {
        Self { session, config }
    }

    /// 处理页面数据并返回最终结果
    pub async fn process_document(
        self,
        input_data: Vec<u8>,
        input_encoding: Option<String>,
        page_url: Url,
    ) -> Result<TranslatedPage, PageError> {
        // 1. 解析文档并确定编码
        let (dom, document_encoding) = process_encoding(&input_data, input_encoding);

        // 2. 确定基础URL（考虑 BASE 元素）
        let base_url = resolve_base_url(page_url, &dom);

        // 3. 确定目标语言
        let language = self.determine_language(&dom)?;

        // 4. 构建翻译服务并写入页面
        let dictionary_url = resolve_dictionary_url(&base_url, &self.config.dictionary)?;
        tracing::debug!("页面语言 {}, 语言数据 {}", language, dictionary_url);

        let source = UrlSource::new(self.session, dictionary_url);
        let service =
            TranslationService::new(language.clone(), source).with_markup(self.config.markup());
        let stats = service.apply_to_page(&dom.document).await;

        // 5. 序列化
        let data = serialize_document(dom, &document_encoding)
            .map_err(|e| PageError::new(&format!("Unable to serialize DOM: {e}")))?;

        Ok(TranslatedPage {
            data,
            language,
            stats,
        })
    }

    fn determine_language(&self, dom: &RcDom) -> Result<String, PageError> {
        if let Some(language) = self.config.language() {
            return Ok(language.to_string());
        }

        detect_language(&dom.document, &self.config.language_attribute).ok_or_else(|| {
            PageError::new(&format!(
                "no language configured: pass --lang or add a {} attribute to a <script> element",
                self.config.language_attribute
            ))
        })
    }
}

/// 解析文档，优先使用文档内声明的有效字符集
fn process_encoding(input_data: &[u8], input_encoding: Option<String>) -> (RcDom, String) {
    let mut document_encoding = input_encoding.unwrap_or_else(|| "utf-8".to_string());

    // 初始解析
    let mut dom = html_to_dom(input_data, document_encoding.clone());

    // 尝试确定文档的编码
    if let Some(html_charset) = get_charset(&dom.document) {
        if !html_charset.is_empty() {
            // 检查HTML内部指定的字符集是否有效
            if let Some(document_charset) =
                Encoding::for_label_no_replacement(html_charset.as_bytes())
            {
                document_encoding = html_charset;
                dom = html_to_dom(input_data, document_charset.name().to_string());
            }
        }
    }

    (dom, document_encoding)
}

fn resolve_base_url(page_url: Url, dom: &RcDom) -> Url {
    match get_base_url(&dom.document) {
        Some(existing_base_url) => page_url.join(&existing_base_url).unwrap_or(page_url),
        None => page_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_display() {
        let error = PageError::new("test error");
        assert_eq!(format!("{}", error), "test error");
    }

    #[test]
    fn test_page_error_from_translation_error() {
        let error: PageError =
            TranslationError::ConfigError("dictionary 不能为空".to_string()).into();
        assert!(error.to_string().contains("dictionary"));
    }

    #[test]
    fn test_detect_media_type_by_file_name() {
        assert_eq!(detect_media_type_by_file_name("index.html"), "text/html");
        assert_eq!(detect_media_type_by_file_name("INDEX.HTM"), "text/html");
        assert_eq!(
            detect_media_type_by_file_name("langConfig.json"),
            "application/json"
        );
        assert_eq!(
            detect_media_type_by_file_name("photo.png"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_parse_content_type_with_charset() {
        let (media_type, charset, is_base64) = parse_content_type("text/html; charset=utf-8");
        assert_eq!(media_type, "text/html");
        assert_eq!(charset, "utf-8");
        assert!(!is_base64);
    }

    #[test]
    fn test_parse_content_type_quoted_charset() {
        let (media_type, charset, _) =
            parse_content_type("application/json; charset=\"ISO-8859-1\"");
        assert_eq!(media_type, "application/json");
        assert_eq!(charset, "ISO-8859-1");
    }

    #[test]
    fn test_parse_content_type_empty() {
        let (media_type, charset, is_base64) = parse_content_type("");
        assert_eq!(media_type, "");
        assert_eq!(charset, "");
        assert!(!is_base64);
    }

    #[test]
    fn test_is_plaintext_media_type() {
        assert!(is_plaintext_media_type("text/html"));
        assert!(is_plaintext_media_type("application/xhtml+xml"));
        assert!(!is_plaintext_media_type("image/png"));
    }

    #[test]
    fn test_resolve_target_url() {
        let url = resolve_target("https://example.com/index.html").unwrap();
        assert_eq!(url.as_str(), "https://example.com/index.html");
    }

    #[test]
    fn test_resolve_target_missing_file() {
        let error = resolve_target("/definitely/not/here.html").unwrap_err();
        assert!(error.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_resolve_target_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<p></p>").unwrap();

        let url = resolve_target(path.to_str().unwrap()).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/index.html"));
    }

    #[test]
    fn test_resolve_base_url_with_base_element() {
        let dom = html_to_dom(
            b"<html><head><base href=\"/static/\"></head></html>",
            "utf-8".to_string(),
        );
        let page_url = Url::parse("https://example.com/docs/index.html").unwrap();
        assert_eq!(
            resolve_base_url(page_url, &dom).as_str(),
            "https://example.com/static/"
        );
    }

    #[test]
    fn test_process_encoding_uses_meta_charset() {
        let (_, encoding) = process_encoding(
            b"<html><head><meta charset=\"windows-1252\"></head><body>\xf3</body></html>",
            None,
        );
        assert_eq!(encoding, "windows-1252");
    }
}
