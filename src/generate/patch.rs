//! Incremental patching of an existing document
//!
//! One natural-language instruction becomes a set of targeted edits applied
//! in a fixed order. Each edit is independently optional: a step whose
//! trigger or anchor is absent is silently skipped, never an error. Partial
//! application is the intended behavior.

use crate::base::{BaseDocument, SortKey};
use crate::core::Result;
use crate::extract::entities::{
    added_property_names, has_add_cue, has_remove_cue, removed_property_names,
};
use crate::extract::{extract, resolve_property};

/// View-type words never belong in a view's order list.
const VIEW_TYPE_WORDS: &[&str] = &["table", "cards", "card", "list", "map"];

/// Apply one instruction to the current document text.
pub fn patch(current: &str, instruction: &str) -> Result<String> {
    let mut doc = BaseDocument::parse(current)?;
    apply(&mut doc, instruction);
    Ok(doc.render())
}

/// The fixed edit order: tag, folder, view type, add properties, remove
/// properties, sort, group, rename.
fn apply(doc: &mut BaseDocument, instruction: &str) {
    let entities = extract(instruction);

    if let Some(tag) = &entities.tag {
        tracing::debug!(%tag, "patch: tag filter");
        doc.set_tag_filter(tag);
    }

    if let Some(folder) = &entities.folder {
        tracing::debug!(%folder, "patch: folder filter");
        doc.set_folder_filter(folder);
    }

    if let Some(view_type) = entities.view_type {
        tracing::debug!(view_type = view_type.keyword(), "patch: view type");
        doc.set_view_type(view_type);
    }

    // Remove takes precedence: an instruction carrying both cues applies
    // only the removal.
    let removing = has_remove_cue(instruction);

    if has_add_cue(instruction) && !removing {
        if let Some(names) = added_property_names(instruction) {
            if let Some(view) = doc.first_view_mut() {
                for name in &names {
                    let reference = resolve_property(name);
                    if VIEW_TYPE_WORDS.contains(&reference.to_lowercase().as_str()) {
                        continue;
                    }
                    if view.add_order_entry(&reference) {
                        tracing::debug!(%reference, "patch: order entry added");
                    }
                }
            }
        }
    }

    if removing {
        if let Some(names) = removed_property_names(instruction) {
            if let Some(view) = doc.first_view_mut() {
                for name in &names {
                    let reference = resolve_property(name);
                    if view.remove_order_entry(&reference) {
                        tracing::debug!(%reference, "patch: order entry removed");
                    }
                }
            }
        }
    }

    if let Some(sort) = &entities.sort {
        if let Some(view) = doc.first_view_mut() {
            view.set_sort(SortKey {
                property: resolve_property(&sort.property),
                direction: sort.direction,
            });
        }
    }

    if let Some(group) = &entities.group_property {
        if let Some(view) = doc.first_view_mut() {
            view.set_group_by(SortKey {
                property: resolve_property(group),
                direction: crate::base::Direction::Asc,
            });
        }
    }

    if let Some(name) = &entities.rename_to {
        if let Some(view) = doc.first_view_mut() {
            view.rename(name);
        }
    }
}
