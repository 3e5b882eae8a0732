use crate::dom::shell::{ACTIVE_CLASS, FLUX_CLASS, POST_CLASS, STREAM_ID};
use crate::dom::{ContentTree, NodePath};

const CONTENT_CLASS: &str = "content";
const TEXT_CLASS: &str = "text";

/// First element with `id` in document order.
pub fn find_by_id(tree: &impl ContentTree, id: &str) -> Option<NodePath> {
    let root = NodePath::root();
    if tree.attr(&root, "id") == Some(id) {
        return Some(root);
    }
    tree.descendants(&root)
        .into_iter()
        .find(|node| tree.attr(node, "id") == Some(id))
}

/// Descendants of `scope` carrying every class in `classes`, document order.
fn descendants_with_classes(
    tree: &impl ContentTree,
    scope: &NodePath,
    classes: &[&str],
) -> Vec<NodePath> {
    tree.descendants(scope)
        .into_iter()
        .filter(|node| classes.iter().all(|c| tree.has_class(node, c)))
        .collect()
}

/// Resolve the subtree holding the displayed article.
///
/// 1. the expanded entry's text region: `#stream .flux.active .content .text`
/// 2. the reading-mode article: `#stream .post`
pub fn locate_article(tree: &impl ContentTree) -> Option<NodePath> {
    let stream = find_by_id(tree, STREAM_ID)?;

    let expanded = descendants_with_classes(tree, &stream, &[FLUX_CLASS, ACTIVE_CLASS])
        .into_iter()
        .flat_map(|flux| descendants_with_classes(tree, &flux, &[CONTENT_CLASS]))
        .flat_map(|content| descendants_with_classes(tree, &content, &[TEXT_CLASS]))
        .min();
    if expanded.is_some() {
        return expanded;
    }

    descendants_with_classes(tree, &stream, &[POST_CLASS])
        .into_iter()
        .next()
}

/// Nearest node (this one included) carrying any of `classes`.
pub fn closest_with_class(
    tree: &impl ContentTree,
    node: &NodePath,
    classes: &[&str],
) -> Option<NodePath> {
    let mut current = Some(node.clone());
    while let Some(path) = current {
        if classes.iter().any(|c| tree.has_class(&path, c)) {
            return Some(path);
        }
        current = path.parent();
    }
    None
}
