//! Stateless egui helpers for painting article DOM nodes.
//!
//! Every element that carries an `id` has its painted extent recorded in
//! [`ArticleFrame::spans`], in content coordinates, so the scroll tracker can
//! sample it.

use std::collections::HashMap;

use eframe::egui;
use reader_outline::dom::{DomNode, NodePath, NodeType};
use reader_outline::engine::scroll::Span;

/// Per-frame output of article painting.
pub struct ArticleFrame<'a> {
    /// Screen y of the scrolled content's top edge.
    pub origin_y: f32,
    pub spans: &'a mut HashMap<String, Span>,
    /// Anchor to bring to the top of the viewport this frame.
    pub scroll_target: Option<&'a str>,
    /// Path of a clicked entry header, if any.
    pub clicked: Option<NodePath>,
}

impl ArticleFrame<'_> {
    fn record(&mut self, node: &DomNode, response: &egui::Response) {
        let Some(id) = node.attr("id") else {
            return;
        };
        self.spans.insert(
            id.to_string(),
            Span::new(response.rect.top() - self.origin_y, response.rect.height()),
        );
        if self.scroll_target == Some(id) {
            response.scroll_to_me(Some(egui::Align::TOP));
        }
    }
}

const BLOCK_TAGS: &[&str] = &[
    "div", "section", "article", "main", "header", "footer", "blockquote", "ul", "ol", "table",
    "tbody", "tr", "td", "figure", "body", "aside", "nav", "details",
];

/// Recursively paint `node`, found at `path` in the document.
pub fn render_node(ui: &mut egui::Ui, node: &DomNode, path: &NodePath, frame: &mut ArticleFrame) {
    match node.node_type {
        NodeType::Text => {
            let text = node.text.trim();
            if !text.is_empty() {
                ui.label(text);
            }
            return;
        }
        NodeType::Document => {
            render_children(ui, node, path, frame);
            return;
        }
        NodeType::Element => {}
    }

    let tag = node.tag.to_ascii_lowercase();
    let response = match tag.as_str() {
        "h1" => heading(ui, node, 28.0, true),
        "h2" => heading(ui, node, 22.0, true),
        "h3" => heading(ui, node, 18.0, true),
        "h4" | "h5" | "h6" => heading(ui, node, 16.0, false),
        "p" | "li" | "span" => {
            let response = paragraph(ui, node, tag == "li");
            ui.add_space(6.0);
            response
        }
        "hr" => ui.separator(),
        "br" => ui.label(""),
        "img" => ui.colored_label(egui::Color32::GRAY, "[Image]"),
        "pre" | "code" => ui.code(node.text_content()),
        "strong" | "b" => ui.label(egui::RichText::new(collapse_ws(&node.text_content())).strong()),
        "em" | "i" => ui.label(egui::RichText::new(collapse_ws(&node.text_content())).italics()),
        t if BLOCK_TAGS.contains(&t) || has_block_child(node) => {
            ui.vertical(|ui| render_children(ui, node, path, frame)).response
        }
        _ if node.children.iter().any(DomNode::is_element) => {
            ui.vertical(|ui| render_children(ui, node, path, frame)).response
        }
        _ => {
            let text = collapse_ws(&node.text_content());
            if text.is_empty() {
                return;
            }
            ui.label(text)
        }
    };
    frame.record(node, &response);
}

fn render_children(ui: &mut egui::Ui, node: &DomNode, path: &NodePath, frame: &mut ArticleFrame) {
    for (i, child) in node.children.iter().enumerate() {
        render_node(ui, child, &path.child(i), frame);
    }
}

fn has_block_child(node: &DomNode) -> bool {
    node.children
        .iter()
        .any(|c| c.is_element() && BLOCK_TAGS.contains(&c.tag.to_ascii_lowercase().as_str()))
}

fn heading(ui: &mut egui::Ui, node: &DomNode, size: f32, strong: bool) -> egui::Response {
    let mut rt = egui::RichText::new(collapse_ws(&node.text_content())).size(size);
    if strong {
        rt = rt.strong();
    }
    let response = ui.heading(rt);
    ui.add_space(size / 3.0);
    response
}

/// Inline block: a leading bold run stays bold, the rest is plain text.
fn paragraph(ui: &mut egui::Ui, node: &DomNode, bullet: bool) -> egui::Response {
    let mut lead = String::new();
    let mut rest = String::new();
    let mut seen_content = false;
    for child in &node.children {
        if !seen_content && child.is_blank_text() {
            continue;
        }
        let bold = child.is_element() && matches!(child.tag.to_ascii_lowercase().as_str(), "strong" | "b");
        if !seen_content && bold {
            lead = child.text_content();
        } else {
            rest.push_str(&child.text_content());
        }
        seen_content = true;
    }

    ui.horizontal_wrapped(|ui| {
        if bullet {
            ui.label("\u{2022}");
        }
        let lead = collapse_ws(&lead);
        if !lead.is_empty() {
            ui.label(egui::RichText::new(lead).strong());
        }
        let rest = collapse_ws(&rest);
        if !rest.is_empty() {
            ui.label(rest);
        }
    })
    .response
}

/// Collapse runs of whitespace the way HTML rendering does.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate `s` to at most `max_chars` Unicode scalar values, appending `"..."` if truncated.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let t: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", t)
    }
}
