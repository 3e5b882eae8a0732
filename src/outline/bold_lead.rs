use crate::dom::{ContentTree, NodePath};
use crate::outline::{tag_in, Candidate, MIN_LEVEL};

const BLOCK_TAGS: &[&str] = &["p", "div", "li"];
const BOLD_TAGS: &[&str] = &["strong", "b"];

/// First child that is not a whitespace-only text node.
fn first_significant_child(tree: &impl ContentTree, node: &NodePath) -> Option<NodePath> {
    tree.children(node)
        .into_iter()
        .find(|child| !(tree.is_text(child) && tree.text_content(child).trim().is_empty()))
}

/// Strategy C: blocks opening with a short bold run, all at level 2.
///
/// The anchor is the block itself; the label is the bold text.
pub fn extract(tree: &impl ContentTree, root: &NodePath, max_chars: usize) -> Vec<Candidate> {
    let mut out = Vec::new();
    for node in tree.descendants(root) {
        if !tag_in(tree, &node, BLOCK_TAGS) {
            continue;
        }
        let Some(lead) = first_significant_child(tree, &node) else {
            continue;
        };
        if !tag_in(tree, &lead, BOLD_TAGS) {
            continue;
        }
        let label = tree.text_content(&lead).trim().to_string();
        if label.is_empty() || label.chars().count() > max_chars {
            continue;
        }
        out.push(Candidate {
            anchor: node,
            level: MIN_LEVEL,
            label,
        });
    }
    out
}
