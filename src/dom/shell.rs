//! Feed-reader page shells.
//!
//! Wraps loaded article bodies in the markup a feed reader's reading view
//! exposes: either a single reading-mode `.post`, or a `#stream` of `.flux`
//! entries where at most one is expanded (`.active`).

use crate::dom::{DomNode, DomTree, NodePath};

pub const STREAM_ID: &str = "stream";
pub const FLUX_CLASS: &str = "flux";
pub const FLUX_HEADER_CLASS: &str = "flux_header";
pub const ACTIVE_CLASS: &str = "active";
pub const POST_CLASS: &str = "post";

/// One article to place in a shell.
#[derive(Debug, Clone)]
pub struct ArticleSource {
    pub title: String,
    pub url: String,
    pub body: Vec<DomNode>,
}

fn page(title: &str, url: &str, stream_children: Vec<DomNode>) -> DomTree {
    let stream = DomNode::with_attrs("div", &[("id", STREAM_ID)], stream_children);
    let body = DomNode::with_attrs("body", &[], vec![stream]);
    let head = DomNode::with_attrs(
        "head",
        &[],
        vec![DomNode::with_attrs("title", &[], vec![DomNode::text(title)])],
    );
    let html = DomNode::with_attrs("html", &[], vec![head, body]);
    DomTree {
        root: DomNode::document(vec![html]),
        url: url.to_string(),
        title: title.to_string(),
    }
}

/// Reading mode: `#stream > .post > article body`.
pub fn reading_view(article: ArticleSource) -> DomTree {
    let post = DomNode::with_attrs("div", &[("class", POST_CLASS)], article.body);
    page(&article.title, &article.url, vec![post])
}

/// Normal mode: one `.flux` per article, the first one expanded.
pub fn stream_view(articles: Vec<ArticleSource>) -> DomTree {
    let (title, url) = articles
        .first()
        .map(|a| (a.title.clone(), a.url.clone()))
        .unwrap_or_default();

    let entries = articles
        .into_iter()
        .enumerate()
        .map(|(i, article)| {
            let class = if i == 0 {
                format!("{} {}", FLUX_CLASS, ACTIVE_CLASS)
            } else {
                FLUX_CLASS.to_string()
            };
            let index = i.to_string();
            let header = DomNode::with_attrs(
                "div",
                &[("class", FLUX_HEADER_CLASS)],
                vec![DomNode::with_attrs(
                    "span",
                    &[("class", "item-title")],
                    vec![DomNode::text(article.title)],
                )],
            );
            let text = DomNode::with_attrs("div", &[("class", "text")], article.body);
            let content = DomNode::with_attrs("div", &[("class", "content")], vec![text]);
            DomNode::with_attrs(
                "div",
                &[("class", class.as_str()), ("data-article", index.as_str())],
                vec![header, content],
            )
        })
        .collect();

    page(&title, &url, entries)
}

/// All `.flux` entries under `#stream`, in document order.
pub fn flux_entries(doc: &DomTree) -> Vec<NodePath> {
    let Some(stream) = doc.find_by_id(STREAM_ID) else {
        return Vec::new();
    };
    let Some(stream_node) = doc.node(&stream) else {
        return Vec::new();
    };
    stream_node
        .children
        .iter()
        .enumerate()
        .filter(|(_, c)| c.has_class(FLUX_CLASS))
        .map(|(i, _)| stream.child(i))
        .collect()
}

/// Expand the entry at `entry`, collapsing any other.
///
/// Returns the paths whose `class` attribute changed, so the caller can
/// report them as mutations.
pub fn expand_entry(doc: &mut DomTree, entry: &NodePath) -> Vec<NodePath> {
    let mut changed = Vec::new();
    for path in flux_entries(doc) {
        let Some(node) = doc.node_mut(&path) else {
            continue;
        };
        let want = &path == entry;
        if node.has_class(ACTIVE_CLASS) != want {
            if want {
                node.add_class(ACTIVE_CLASS);
            } else {
                node.remove_class(ACTIVE_CLASS);
            }
            changed.push(path);
        }
    }
    changed
}
