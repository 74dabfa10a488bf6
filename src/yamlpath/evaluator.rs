//! yamlpath query evaluation against a document tree.
//!
//! Evaluation produces [`NodePath`]s (child index paths) rather than node
//! references, so callers can re-borrow the owning document mutably and
//! patch every match in place — bulk replace is one pass over the result.

use super::ast::{FilterExpr, PathSegment, YamlPath};
use crate::document::{Node, NodePath, NodeValue};

/// Evaluator for yamlpath queries over one document root.
pub struct Evaluator<'a> {
    root: &'a Node,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Node) -> Self {
        Evaluator { root }
    }

    /// Evaluates a query and returns the index path of every match.
    pub fn evaluate(&self, path: &YamlPath) -> Vec<NodePath> {
        if path.segments.is_empty() {
            return vec![];
        }

        let mut current: Vec<(NodePath, &Node)> = vec![(vec![], self.root)];

        for segment in &path.segments {
            let mut next = Vec::new();
            for (path, node) in &current {
                next.extend(self.evaluate_segment(node, segment, path));
            }
            current = next;
        }

        current.into_iter().map(|(path, _)| path).collect()
    }

    fn evaluate_segment(
        &self,
        node: &'a Node,
        segment: &PathSegment,
        current_path: &[usize],
    ) -> Vec<(NodePath, &'a Node)> {
        match segment {
            PathSegment::Root => vec![(vec![], self.root)],
            PathSegment::Child(name) => self.find_child(node, name, current_path),
            PathSegment::Index(idx) => self.index_item(node, *idx, current_path),
            PathSegment::Wildcard => self.all_children(node, current_path),
            PathSegment::RecursiveDescent(prop) => {
                self.recursive_descent(node, prop.as_deref(), current_path)
            }
            PathSegment::Slice(start, end) => self.slice(node, *start, *end, current_path),
            PathSegment::MultiProperty(props) => {
                let mut results = Vec::new();
                for prop in props {
                    results.extend(self.find_child(node, prop, current_path));
                }
                results
            }
            PathSegment::Filter(filter) => self.filter_children(node, filter, current_path),
        }
    }

    fn find_child(
        &self,
        node: &'a Node,
        name: &str,
        current_path: &[usize],
    ) -> Vec<(NodePath, &'a Node)> {
        if let NodeValue::Mapping(entries) = node.value() {
            for (idx, entry) in entries.iter().enumerate() {
                if entry.key == name {
                    let mut new_path = current_path.to_vec();
                    new_path.push(idx);
                    return vec![(new_path, &entry.value)];
                }
            }
        }
        vec![]
    }

    fn index_item(
        &self,
        node: &'a Node,
        idx: isize,
        current_path: &[usize],
    ) -> Vec<(NodePath, &'a Node)> {
        if let NodeValue::Sequence(items) = node.value() {
            let len = items.len() as isize;
            let normalized = if idx < 0 { len + idx } else { idx };

            if normalized >= 0 && (normalized as usize) < items.len() {
                let mut new_path = current_path.to_vec();
                new_path.push(normalized as usize);
                return vec![(new_path, &items[normalized as usize])];
            }
        }
        vec![]
    }

    fn all_children(&self, node: &'a Node, current_path: &[usize]) -> Vec<(NodePath, &'a Node)> {
        match node.value() {
            NodeValue::Mapping(entries) => entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    let mut new_path = current_path.to_vec();
                    new_path.push(idx);
                    (new_path, &entry.value)
                })
                .collect(),
            NodeValue::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(idx, child)| {
                    let mut new_path = current_path.to_vec();
                    new_path.push(idx);
                    (new_path, child)
                })
                .collect(),
            NodeValue::Scalar { .. } => vec![],
        }
    }

    fn slice(
        &self,
        node: &'a Node,
        start: Option<isize>,
        end: Option<isize>,
        current_path: &[usize],
    ) -> Vec<(NodePath, &'a Node)> {
        if let NodeValue::Sequence(items) = node.value() {
            let len = items.len() as isize;

            let start_idx = match start {
                Some(s) if s < 0 => (len + s).max(0) as usize,
                Some(s) => s.min(len) as usize,
                None => 0,
            };
            let end_idx = match end {
                Some(e) if e < 0 => (len + e).max(0) as usize,
                Some(e) => e.min(len) as usize,
                None => len as usize,
            };

            if start_idx <= end_idx {
                return items[start_idx..end_idx]
                    .iter()
                    .enumerate()
                    .map(|(offset, child)| {
                        let mut new_path = current_path.to_vec();
                        new_path.push(start_idx + offset);
                        (new_path, child)
                    })
                    .collect();
            }
        }
        vec![]
    }

    /// Keeps the children whose filter field resolves to a scalar equal to
    /// the filter literal.
    fn filter_children(
        &self,
        node: &'a Node,
        filter: &FilterExpr,
        current_path: &[usize],
    ) -> Vec<(NodePath, &'a Node)> {
        self.all_children(node, current_path)
            .into_iter()
            .filter(|(_, child)| matches_filter(child, filter))
            .collect()
    }

    fn recursive_descent(
        &self,
        node: &'a Node,
        prop: Option<&str>,
        current_path: &[usize],
    ) -> Vec<(NodePath, &'a Node)> {
        let mut results = Vec::new();

        fn walk<'a>(
            node: &'a Node,
            prop: Option<&str>,
            current_path: &[usize],
            results: &mut Vec<(NodePath, &'a Node)>,
        ) {
            match node.value() {
                NodeValue::Mapping(entries) => {
                    for (idx, entry) in entries.iter().enumerate() {
                        let mut child_path = current_path.to_vec();
                        child_path.push(idx);
                        let matched = match prop {
                            Some(name) => entry.key == name,
                            None => true,
                        };
                        if matched {
                            results.push((child_path.clone(), &entry.value));
                        }
                        walk(&entry.value, prop, &child_path, results);
                    }
                }
                NodeValue::Sequence(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        let mut child_path = current_path.to_vec();
                        child_path.push(idx);
                        if prop.is_none() {
                            results.push((child_path.clone(), item));
                        }
                        walk(item, prop, &child_path, results);
                    }
                }
                NodeValue::Scalar { .. } => {}
            }
        }

        walk(node, prop, current_path, &mut results);
        results
    }
}

/// Resolves the filter's field chain inside the candidate and compares the
/// resulting scalar against the literal.
fn matches_filter(candidate: &Node, filter: &FilterExpr) -> bool {
    let mut current = candidate;
    for name in &filter.field {
        let NodeValue::Mapping(entries) = current.value() else {
            return false;
        };
        match entries.iter().find(|e| &e.key == name) {
            Some(entry) => current = &entry.value,
            None => return false,
        }
    }
    current.scalar_value() == Some(filter.value.as_str())
}
