//! Numbered-prefix heuristic.
//!
//! Articles converted from word processors often lose their heading tags
//! but keep visible numbering ("第一章", "II.", "3.", "(2)"). Short blocks
//! whose text starts with such a marker become outline items at the level
//! bound to the first rule that matches.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{ContentTree, NodePath};
use crate::outline::{tag_in, Candidate, MAX_LEVEL, MIN_LEVEL};

/// Block-ish elements that may carry a numbered heading.
const CANDIDATE_TAGS: &[&str] = &["p", "div", "span"];

/// Built-in rules, tried top to bottom.
const DEFAULT_RULES: &[(&str, &str, u8)] = &[
    ("chapter", r"第[0-9一二三四五六七八九十百千零〇两]+[章篇部卷]", 2),
    ("section", r"第[0-9一二三四五六七八九十百千零〇两]+[节節]", 3),
    ("cjk-ordinal", r"[一二三四五六七八九十]+[、．.]", 2),
    ("roman", r"[IVXLCDM]+[.、．]\s*\S", 2),
    ("dotted", r"\d+\.\d+[.、．]?\s*\S", 3),
    ("arabic", r"\d+[.、．]\s*\S", 2),
    ("parenthesized", r"[(（]\d+[)）]", 3),
];

static DEFAULT_TABLE: LazyLock<PrefixTable> = LazyLock::new(|| {
    let rules = DEFAULT_RULES
        .iter()
        .map(|(name, pattern, level)| {
            PrefixRule::new(name, pattern, *level).expect("built-in prefix pattern")
        })
        .collect();
    PrefixTable { rules }
});

/// A custom rule failed to compile.
#[derive(Debug, Clone)]
pub struct PatternError {
    pub message: String,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PatternError {}

/// A prefix pattern bound to a fixed outline level.
#[derive(Debug, Clone)]
pub struct PrefixRule {
    pub name: String,
    pattern: Regex,
    pub level: u8,
}

impl PrefixRule {
    /// `pattern` is matched at the start of the trimmed text; the anchor is
    /// added here. `level` is clamped into the outline range.
    pub fn new(name: &str, pattern: &str, level: u8) -> Result<Self, PatternError> {
        let anchored = format!("^(?:{})", pattern);
        let pattern = Regex::new(&anchored).map_err(|e| PatternError {
            message: format!("Invalid prefix rule '{}': {}", name, e),
        })?;
        Ok(Self {
            name: name.to_string(),
            pattern,
            level: level.clamp(MIN_LEVEL, MAX_LEVEL),
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Ordered list of prefix rules; the first match wins.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    rules: Vec<PrefixRule>,
}

impl PrefixTable {
    pub fn new(rules: Vec<PrefixRule>) -> Self {
        Self { rules }
    }

    /// Built-in rules followed by `extra` (lower priority).
    pub fn extended(extra: Vec<PrefixRule>) -> Self {
        let mut table = Self::default();
        table.rules.extend(extra);
        table
    }

    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Level of the first rule matching `text`.
    pub fn classify(&self, text: &str) -> Option<u8> {
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(|rule| rule.level)
    }
}

impl Default for PrefixTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

/// Strategy B: short numbered blocks below `root`.
///
/// A block is skipped when one of its ancestors (below `root`) was already
/// accepted, so a numbered container and its own numbered child never both
/// appear.
pub fn extract(
    tree: &impl ContentTree,
    root: &NodePath,
    table: &PrefixTable,
    max_chars: usize,
) -> Vec<Candidate> {
    let mut accepted: HashSet<NodePath> = HashSet::new();
    let mut out = Vec::new();

    for node in tree.descendants(root) {
        if !tag_in(tree, &node, CANDIDATE_TAGS) {
            continue;
        }
        let text = tree.text_content(&node);
        let text = text.trim();
        if text.is_empty() || text.chars().count() >= max_chars {
            continue;
        }
        let Some(level) = table.classify(text) else {
            continue;
        };
        if dominated(&node, root, &accepted) {
            continue;
        }
        accepted.insert(node.clone());
        out.push(Candidate {
            anchor: node,
            level,
            label: text.to_string(),
        });
    }

    out
}

/// Walk up from `node` towards `root`, stopping at the first accepted ancestor.
fn dominated(node: &NodePath, root: &NodePath, accepted: &HashSet<NodePath>) -> bool {
    let mut current = node.parent();
    while let Some(path) = current {
        if !root.is_ancestor_of(&path) {
            break;
        }
        if accepted.contains(&path) {
            return true;
        }
        current = path.parent();
    }
    false
}
