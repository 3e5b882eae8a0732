//! Strategy selection and anchor-id assignment.

use std::collections::HashSet;

use crate::config::OutlineConfig;
use crate::dom::{ContentTree, NodePath};
use crate::outline::locator::find_by_id;
use crate::outline::{bold_lead, headings, numbered, Candidate, Outline, OutlineItem, Strategy};

/// Run one strategy on its own.
pub fn run_strategy(
    tree: &impl ContentTree,
    root: &NodePath,
    strategy: Strategy,
    config: &OutlineConfig,
) -> Vec<Candidate> {
    match strategy {
        Strategy::Headings => headings::extract(tree, root),
        Strategy::Numbered => {
            numbered::extract(tree, root, &config.prefixes, config.numbered_max_chars)
        }
        Strategy::BoldLead => bold_lead::extract(tree, root, config.bold_max_chars),
    }
}

/// Try headings, then numbered prefixes, then bold leads; keep the first
/// proposal with at least `min_items` items. Proposals are never merged.
pub fn select(
    tree: &impl ContentTree,
    root: &NodePath,
    config: &OutlineConfig,
) -> Option<(Strategy, Vec<Candidate>)> {
    for strategy in [Strategy::Headings, Strategy::Numbered, Strategy::BoldLead] {
        let candidates = run_strategy(tree, root, strategy, config);
        if candidates.len() >= config.min_items {
            log::debug!(
                "outline: {} strategy produced {} items",
                strategy.name(),
                candidates.len()
            );
            return Some((strategy, candidates));
        }
        log::debug!(
            "outline: {} strategy produced {} items, falling through",
            strategy.name(),
            candidates.len()
        );
    }
    None
}

/// Derive the outline for `root`, annotating anchors with identifiers.
///
/// An anchor keeps its own `id` unless another item already claimed it;
/// otherwise it is given `<id_prefix><n>`, with `n` starting at the item's
/// position and skipping values already used anywhere in the tree.
pub fn extract_outline(
    tree: &mut impl ContentTree,
    root: &NodePath,
    config: &OutlineConfig,
) -> Outline {
    let Some((strategy, candidates)) = select(&*tree, root, config) else {
        return Outline::empty();
    };

    let own_ids: HashSet<String> = candidates
        .iter()
        .filter_map(|c| existing_id(&*tree, &c.anchor))
        .collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut items = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.into_iter().enumerate() {
        let anchor_id = match existing_id(&*tree, &candidate.anchor) {
            Some(id) if !taken.contains(&id) => id,
            _ => {
                let anchor = &candidate.anchor;
                let id = synthesize_id(&config.id_prefix, index, |id| {
                    taken.contains(id)
                        || own_ids.contains(id)
                        || find_by_id(&*tree, id).is_some_and(|other| &other != anchor)
                });
                tree.set_attr(&candidate.anchor, "id", &id);
                id
            }
        };
        taken.insert(anchor_id.clone());
        items.push(OutlineItem {
            anchor: candidate.anchor,
            anchor_id,
            level: candidate.level,
            label: candidate.label,
        });
    }

    Outline::new(items, strategy)
}

/// The node's own `id`, verbatim. Blank ids count as missing.
fn existing_id(tree: &impl ContentTree, node: &NodePath) -> Option<String> {
    tree.attr(node, "id")
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}

fn synthesize_id(prefix: &str, start: usize, in_use: impl Fn(&str) -> bool) -> String {
    let mut n = start;
    loop {
        let id = format!("{}{}", prefix, n);
        if !in_use(&id) {
            return id;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;
    use crate::dom::DomTree;

    fn doc(body: &str) -> (DomTree, NodePath) {
        let html = format!(r#"<html><body><div id="root">{}</div></body></html>"#, body);
        let tree = parse_html(&html, "");
        let root = tree.find_by_id("root").unwrap();
        (tree, root)
    }

    #[test]
    fn headings_win_when_viable() {
        let (mut tree, root) = doc("<h2>A</h2><p>1. x</p><p>2. y</p><h3>B</h3>");
        let outline = extract_outline(&mut tree, &root, &OutlineConfig::default());
        assert_eq!(outline.strategy(), Some(Strategy::Headings));
        assert_eq!(outline.levels(), vec![2, 3]);
    }

    #[test]
    fn numbered_used_when_headings_too_few() {
        let (mut tree, root) =
            doc("<h2>Only</h2><p>1. First</p><p>Body.</p><p>2. Second</p><p><b>Bold</b> x</p>");
        let config = OutlineConfig::default();
        let expected = numbered::extract(&tree, &root, &config.prefixes, 80);
        let outline = extract_outline(&mut tree, &root, &config);
        assert_eq!(outline.strategy(), Some(Strategy::Numbered));
        let labels: Vec<String> = outline.items().iter().map(|i| i.label.clone()).collect();
        let want: Vec<String> = expected.iter().map(|c| c.label.clone()).collect();
        assert_eq!(labels, want);
        assert_eq!(labels, vec!["1. First", "2. Second"]);
    }

    #[test]
    fn bold_lead_is_last_resort() {
        let (mut tree, root) = doc("<p><b>Why</b> it matters</p><p><strong>How</strong> it works</p>");
        let outline = extract_outline(&mut tree, &root, &OutlineConfig::default());
        assert_eq!(outline.strategy(), Some(Strategy::BoldLead));
        assert_eq!(outline.levels(), vec![2, 2]);
    }

    #[test]
    fn failed_strategies_are_not_mixed() {
        // One heading, one numbered block, one bold lead: nothing reaches two.
        let (mut tree, root) = doc("<h2>A</h2><p>1. B</p><p><b>C</b> d</p>");
        let outline = extract_outline(&mut tree, &root, &OutlineConfig::default());
        assert!(outline.is_empty());
        assert_eq!(outline.strategy(), None);
    }

    #[test]
    fn ids_are_reused_or_synthesized() {
        let (mut tree, root) = doc(r#"<h2 id="intro">A</h2><h2>B</h2><h2>C</h2>"#);
        let outline = extract_outline(&mut tree, &root, &OutlineConfig::default());
        assert_eq!(
            outline.anchor_ids(),
            vec!["intro", "toc-heading-1", "toc-heading-2"]
        );
        let second = &outline.items()[1];
        assert_eq!(tree.attr(&second.anchor, "id"), Some("toc-heading-1"));
    }

    #[test]
    fn ids_stay_unique_under_collisions() {
        let (mut tree, root) = doc(
            r#"<h2 id="dup">A</h2><h2 id="dup">B</h2><h2>C</h2><h2 id="toc-heading-2">D</h2>"#,
        );
        let outline = extract_outline(&mut tree, &root, &OutlineConfig::default());
        let ids = outline.anchor_ids();
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids[0], "dup");
        assert_eq!(ids[3], "toc-heading-2");
        assert_eq!(ids[1], "toc-heading-1");
        assert_eq!(ids[2], "toc-heading-3");
    }

    #[test]
    fn synthesized_ids_avoid_ids_outside_the_article() {
        let html = r#"<html><body><h2 id="toc-heading-0">Old</h2><div id="root"><h2>A</h2><h2>B</h2></div></body></html>"#;
        let mut tree = parse_html(html, "");
        let root = tree.find_by_id("root").unwrap();
        let outline = extract_outline(&mut tree, &root, &OutlineConfig::default());
        assert_eq!(outline.anchor_ids(), vec!["toc-heading-1", "toc-heading-2"]);
    }

    #[test]
    fn padded_ids_are_reused_verbatim() {
        let (mut tree, root) = doc(r#"<h2 id=" intro ">A</h2><h2 id="  ">B</h2>"#);
        let outline = extract_outline(&mut tree, &root, &OutlineConfig::default());
        assert_eq!(outline.anchor_ids(), vec![" intro ", "toc-heading-1"]);
        for item in outline.items() {
            assert_eq!(tree.find_by_id(&item.anchor_id), Some(item.anchor.clone()));
        }
    }

    #[test]
    fn custom_prefix_table_drives_numbered_strategy() {
        let body = "<p>Chapter 1 Arrival</p><p>Text.</p><p>Chapter 2 Departure</p>";
        let (mut tree, root) = doc(body);
        let builtin = extract_outline(&mut tree, &root, &OutlineConfig::default());
        assert!(builtin.is_empty());

        let chapter = numbered::PrefixRule::new("english-chapter", r"Chapter \d+", 2).unwrap();
        let config = OutlineConfig::default()
            .with_prefixes(numbered::PrefixTable::extended(vec![chapter]));
        let (mut tree, root) = doc(body);
        let outline = extract_outline(&mut tree, &root, &config);
        assert_eq!(outline.strategy(), Some(Strategy::Numbered));
        assert_eq!(outline.levels(), vec![2, 2]);
        let labels: Vec<&str> = outline.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Chapter 1 Arrival", "Chapter 2 Departure"]);
    }

    #[test]
    fn extended_rules_rank_below_builtins() {
        // Would put every Arabic-numbered block at level 5 if it ran first.
        let loose = numbered::PrefixRule::new("any-digit", r"\d", 5).unwrap();
        let table = numbered::PrefixTable::extended(vec![loose]);
        let last = table.rules().last().unwrap();
        assert_eq!(last.name, "any-digit");
        assert_eq!(table.classify("1. First"), Some(2));
        assert_eq!(table.classify("1.2 Detail"), Some(3));
        assert_eq!(table.classify("7 days"), Some(5));

        let config = OutlineConfig::default().with_prefixes(table);
        let (mut tree, root) = doc("<p>1. First</p><p>2. Second</p><p>3 notes</p>");
        let outline = extract_outline(&mut tree, &root, &config);
        assert_eq!(outline.levels(), vec![2, 2, 5]);
    }

    #[test]
    fn rebuild_reuses_previously_synthesized_ids() {
        let (mut tree, root) = doc("<h2>A</h2><h2>B</h2>");
        let first = extract_outline(&mut tree, &root, &OutlineConfig::default());
        let second = extract_outline(&mut tree, &root, &OutlineConfig::default());
        assert_eq!(first.anchor_ids(), second.anchor_ids());
    }
}
