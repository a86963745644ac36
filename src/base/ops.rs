//! Typed edit operations on the document model
//!
//! These are the operations the Patcher composes. Each one keeps the
//! document well-formed: the filter root stays a group, order entries stay
//! unique, and sort/group blocks are replaced whole.

use crate::base::model::{BaseDocument, FilterNode, FilterOp, SortKey, View, ViewType};

impl BaseDocument {
    /// Replace the argument of the existing tag predicate, or insert a new
    /// tag predicate as the first filter entry.
    pub fn set_tag_filter(&mut self, tag: &str) {
        self.upsert_predicate("file.hasTag(", format!("file.hasTag(\"{tag}\")"));
    }

    /// Insert-or-replace policy for the folder predicate, same as tags.
    pub fn set_folder_filter(&mut self, folder: &str) {
        self.upsert_predicate("file.inFolder(", format!("file.inFolder(\"{folder}\")"));
    }

    /// Replace the type of the first view.
    pub fn set_view_type(&mut self, view_type: ViewType) {
        if let Some(view) = self.first_view_mut() {
            view.view_type = view_type;
        }
    }

    fn upsert_predicate(&mut self, marker: &str, predicate: String) {
        let root = self.filters.get_or_insert_with(|| FilterNode::Group {
            op: FilterOp::And,
            children: Vec::new(),
        });
        // A bare predicate root is wrapped so the insert has a list to land in.
        if matches!(root, FilterNode::Predicate(_)) {
            let existing = std::mem::replace(root, FilterNode::Group {
                op: FilterOp::And,
                children: Vec::new(),
            });
            if let FilterNode::Group { children, .. } = root {
                children.push(existing);
            }
        }
        if replace_predicate(root, marker, &predicate) {
            return;
        }
        if let FilterNode::Group { children, .. } = root {
            children.insert(0, FilterNode::Predicate(predicate));
        }
    }
}

/// Depth-first search for a predicate containing `marker`; replaces the
/// first hit.
fn replace_predicate(node: &mut FilterNode, marker: &str, predicate: &str) -> bool {
    match node {
        FilterNode::Predicate(p) => {
            if p.contains(marker) {
                *p = predicate.to_string();
                true
            } else {
                false
            }
        }
        FilterNode::Group { children, .. } => children
            .iter_mut()
            .any(|child| replace_predicate(child, marker, predicate)),
    }
}

impl View {
    /// Append a property reference unless it is already displayed.
    pub fn add_order_entry(&mut self, reference: &str) -> bool {
        if self.order.iter().any(|o| o == reference) {
            return false;
        }
        self.order.push(reference.to_string());
        true
    }

    /// Delete a property reference from the order list if present.
    pub fn remove_order_entry(&mut self, reference: &str) -> bool {
        let before = self.order.len();
        self.order.retain(|o| o != reference);
        self.order.len() != before
    }

    /// Replace the whole sort block with a single key.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = vec![key];
    }

    pub fn set_group_by(&mut self, key: SortKey) {
        self.group_by = Some(key);
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }
}
