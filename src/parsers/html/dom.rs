use std::cell::RefCell;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: String) -> RcDom {
    let s: String;

    if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        s = string.to_string();
    } else {
        s = String::from_utf8_lossy(data).to_string();
    }

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .unwrap_or_default()
}

/// 查找指定路径的DOM节点
///
/// 结果按文档顺序（先序遍历）排列。
pub fn find_nodes(node: &Handle, node_names: Vec<&str>) -> Vec<Handle> {
    assert!(!node_names.is_empty());

    let mut found_nodes = Vec::new();
    let node_name = node_names[0];

    if node_names.len() == 1 {
        if let NodeData::Element { ref name, .. } = node.data {
            if &*name.local == node_name {
                found_nodes.push(node.clone());
            }
        }

        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
        }
    } else if let NodeData::Element { ref name, .. } = node.data {
        if &*name.local == node_name {
            let mut new_node_names = node_names;
            new_node_names.remove(0);
            found_nodes.append(&mut find_nodes(node, new_node_names));
        } else {
            for child_node in node.children.borrow().iter() {
                found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
            }
        }
    } else {
        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
        }
    }

    found_nodes
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点的文本内容（所有后代文本节点按顺序拼接）
pub fn get_node_text(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, buf: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        buf.push_str(&contents.borrow());
    }

    for child_node in node.children.borrow().iter() {
        collect_text(child_node, buf);
    }
}

/// 设置节点的文本内容
///
/// 移除所有子节点，并以单个文本节点替代；空字符串会使节点没有子节点。
pub fn set_node_text(node: &Handle, text: &str) {
    let mut children = node.children.borrow_mut();

    for child_node in children.drain(..) {
        child_node.parent.set(None);
    }

    if text.is_empty() {
        return;
    }

    let text_node = Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    });
    text_node.parent.set(Some(Rc::downgrade(node)));
    children.push(text_node);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8".to_string())
    }

    #[test]
    fn test_find_nodes_document_order() {
        let dom = dom(
            "<body><zlang key=\"a\"></zlang><div><zlang key=\"b\"></zlang></div><zlang key=\"c\"></zlang></body>",
        );
        let keys: Vec<String> = find_nodes(&dom.document, vec!["zlang"])
            .iter()
            .filter_map(|node| get_node_attr(node, "key"))
            .collect();

        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_find_nodes_by_path() {
        let dom = dom("<html><head><meta charset=\"utf-8\"></head><body><meta></body></html>");
        assert_eq!(find_nodes(&dom.document, vec!["html", "head", "meta"]).len(), 1);
    }

    #[test]
    fn test_get_node_attr_missing() {
        let dom = dom("<zlang>text</zlang>");
        let node = &find_nodes(&dom.document, vec!["zlang"])[0];
        assert_eq!(get_node_attr(node, "key"), None);
    }

    #[test]
    fn test_set_node_text_replaces_children() {
        let dom = dom("<zlang key=\"greeting\">Hello <b>there</b></zlang>");
        let node = &find_nodes(&dom.document, vec!["zlang"])[0];
        assert_eq!(get_node_text(node), "Hello there");

        set_node_text(node, "Hola");

        assert_eq!(get_node_text(node), "Hola");
        assert_eq!(node.children.borrow().len(), 1);
        assert!(find_nodes(&dom.document, vec!["b"]).is_empty());
    }

    #[test]
    fn test_set_node_text_empty() {
        let dom = dom("<zlang key=\"greeting\">Hello</zlang>");
        let node = &find_nodes(&dom.document, vec!["zlang"])[0];

        set_node_text(node, "");

        assert!(node.children.borrow().is_empty());
    }

    #[test]
    fn test_set_node_text_parent_link() {
        let dom = dom("<zlang key=\"greeting\"></zlang>");
        let node = &find_nodes(&dom.document, vec!["zlang"])[0];

        set_node_text(node, "Hola");

        let child = node.children.borrow()[0].clone();
        let parent = child.parent.take();
        assert!(parent
            .as_ref()
            .and_then(|weak| weak.upgrade())
            .is_some_and(|p| Rc::ptr_eq(&p, node)));
        child.parent.set(parent);
    }
}
