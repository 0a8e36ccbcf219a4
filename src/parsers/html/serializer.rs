use std::io;

use encoding_rs::Encoding;
use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

/// 序列化文档
///
/// 输出使用文档原有的字符编码；编码未知时保留 UTF-8。
pub fn serialize_document(dom: RcDom, document_encoding: &str) -> io::Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.into();
    serialize(&mut buf, &serializable, SerializeOpts::default())?;

    if !document_encoding.is_empty() {
        if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
            let s: &str = &String::from_utf8_lossy(&buf);
            let (data, _, _) = encoding.encode(s);
            buf = data.to_vec();
        }
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::dom::{find_nodes, html_to_dom, set_node_text};

    #[test]
    fn test_serialize_document_after_mutation() {
        let dom = html_to_dom(
            b"<html><body><zlang key=\"greeting\">Hello</zlang></body></html>",
            "utf-8".to_string(),
        );
        let node = &find_nodes(&dom.document, vec!["zlang"])[0];
        set_node_text(node, "Hola & adi\u{f3}s");

        let output = String::from_utf8(serialize_document(dom, "utf-8").unwrap()).unwrap();
        assert!(output.contains("<zlang key=\"greeting\">Hola &amp; adi\u{f3}s</zlang>"));
    }

    #[test]
    fn test_serialize_document_legacy_encoding() {
        let dom = html_to_dom(b"<p>adi\xf3s</p>", "windows-1252".to_string());

        let output = serialize_document(dom, "windows-1252").unwrap();
        assert!(output.windows(5).any(|w| w == b"adi\xf3s"));
    }
}
