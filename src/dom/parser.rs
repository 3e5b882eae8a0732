use crate::dom::{DomNode, DomTree};
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;

/// Tags whose children should be stripped (invisible/script content)
const SKIP_CHILDREN: &[&str] = &["script", "style", "noscript", "svg"];

/// Parse raw HTML string into a DomTree.
///
/// Whitespace-only text nodes are kept so that text content of an element
/// reads the same as it would in a browser.
pub fn parse_html(html: &str, url: &str) -> DomTree {
    let document = Html::parse_document(html);

    // Extract <title>
    let title = scraper::Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let root = DomNode::document(vec![convert_element(document.root_element())]);

    DomTree {
        root,
        url: url.to_string(),
        title: title.trim().to_string(),
    }
}

/// Parse a fragment (e.g. an article body) and return its top-level nodes.
pub fn parse_fragment(html: &str) -> Vec<DomNode> {
    let fragment = Html::parse_fragment(html);
    convert_children(fragment.root_element())
}

fn convert_element(el: ElementRef<'_>) -> DomNode {
    let tag = el.value().name.local.as_ref().to_string();
    let attributes: HashMap<String, String> = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    // Skip children of invisible elements
    if SKIP_CHILDREN.contains(&tag.as_str()) {
        return DomNode::element(tag, attributes, Vec::new());
    }

    DomNode::element(tag, attributes, convert_children(el))
}

fn convert_children(el: ElementRef<'_>) -> Vec<DomNode> {
    let mut children = Vec::new();

    for child_ref in el.children() {
        match child_ref.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child_ref) {
                    children.push(convert_element(child_el));
                }
            }
            Node::Text(t) => {
                children.push(DomNode::text(t.text.to_string()));
            }
            _ => {}
        }
    }

    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ContentTree;

    #[test]
    fn parse_simple_html() {
        let html = r#"
        <html>
            <head><title>Test Page</title></head>
            <body>
                <h1>Hello, reader</h1>
                <p>Content paragraph</p>
            </body>
        </html>
        "#;

        let tree = parse_html(html, "https://example.com");
        assert_eq!(tree.title, "Test Page");
        assert_eq!(tree.url, "https://example.com");
        assert!(tree.root.node_count() > 0);
        let body = tree.body();
        assert_eq!(tree.tag(&body), Some("body"));
    }

    #[test]
    fn strips_script_children() {
        let html = r#"
        <html><body>
            <p>Visible</p>
            <script>alert("hidden");</script>
        </body></html>
        "#;

        let tree = parse_html(html, "https://example.com");
        let text = tree.root.text_content();
        assert!(text.contains("Visible"));
        assert!(!text.contains("alert"));
    }

    #[test]
    fn keeps_inline_spacing_and_attributes() {
        let html = r#"<html><body><h2 id="x" class="a b"><b>One</b> <i>two</i></h2></body></html>"#;
        let tree = parse_html(html, "");
        let h2 = tree.find_by_id("x").unwrap();
        assert_eq!(ContentTree::text_content(&tree, &h2), "One two");
        assert!(tree.has_class(&h2, "b"));
    }

    #[test]
    fn fragment_yields_top_level_nodes() {
        let nodes = parse_fragment("<p>a</p><p>b</p>");
        let tags: Vec<&str> = nodes
            .iter()
            .filter(|n| n.is_element())
            .map(|n| n.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["p", "p"]);
    }
}
