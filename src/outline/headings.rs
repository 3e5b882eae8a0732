use crate::dom::{ContentTree, NodePath};
use crate::outline::levels::normalize;
use crate::outline::Candidate;

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Ordinal of a heading tag (`h3` → 3).
fn heading_rank(tag: &str) -> Option<u8> {
    let lower = tag.to_ascii_lowercase();
    if !HEADING_TAGS.contains(&lower.as_str()) {
        return None;
    }
    lower[1..].parse().ok()
}

/// Strategy A: native headings below `root`, levels normalized.
pub fn extract(tree: &impl ContentTree, root: &NodePath) -> Vec<Candidate> {
    let found: Vec<(NodePath, u8)> = tree
        .descendants(root)
        .into_iter()
        .filter_map(|node| {
            let rank = tree.tag(&node).and_then(heading_rank)?;
            Some((node, rank))
        })
        .collect();

    let raw: Vec<u8> = found.iter().map(|(_, rank)| *rank).collect();
    found
        .into_iter()
        .zip(normalize(&raw))
        .map(|((anchor, _), level)| Candidate {
            label: tree.text_content(&anchor).trim().to_string(),
            anchor,
            level,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    #[test]
    fn collects_all_six_levels_in_order() {
        let tree = parse_html(
            r#"<html><body><div id="a">
                <h1>One</h1><p>x</p><h3> Sub </h3>
                <section><h6>Deep</h6></section>
                <h2>Two</h2>
            </div></body></html>"#,
            "",
        );
        let root = tree.find_by_id("a").unwrap();
        let items = extract(&tree, &root);
        let labels: Vec<&str> = items.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["One", "Sub", "Deep", "Two"]);
        let levels: Vec<u8> = items.iter().map(|c| c.level).collect();
        assert_eq!(levels, vec![2, 4, 6, 3]);
    }

    #[test]
    fn ignores_root_and_outside_headings() {
        let tree = parse_html(
            r#"<html><body><h2>Outside</h2><h2 id="a"><span>Root</span></h2></body></html>"#,
            "",
        );
        let root = tree.find_by_id("a").unwrap();
        assert!(extract(&tree, &root).is_empty());
    }

    #[test]
    fn rank_parsing() {
        assert_eq!(heading_rank("H4"), Some(4));
        assert_eq!(heading_rank("header"), None);
        assert_eq!(heading_rank("h7"), None);
    }
}
