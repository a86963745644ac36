//! Fresh document synthesis from extracted entities
//!
//! Used when no template applies. Identical extracted entities always yield
//! identical output text.

use crate::base::{
    BaseDocument, FilterNode, FilterOp, Formula, FormulaExpr, PropertyMeta, SortKey, View,
    ViewType,
};
use crate::extract::{resolve_property, ExtractedEntities};

/// Build a complete document from one instruction's extracted entities.
pub fn synthesize(entities: &ExtractedEntities) -> String {
    build_document(entities).render()
}

fn build_document(entities: &ExtractedEntities) -> BaseDocument {
    let mut doc = BaseDocument::default();

    let mut predicates = Vec::new();
    if let Some(tag) = &entities.tag {
        predicates.push(FilterNode::Predicate(format!("file.hasTag(\"{tag}\")")));
    }
    if let Some(folder) = &entities.folder {
        predicates.push(FilterNode::Predicate(format!("file.inFolder(\"{folder}\")")));
    }
    if predicates.is_empty() {
        // No usable filter in the instruction: restrict to markdown notes.
        predicates.push(FilterNode::Predicate("file.ext == \"md\"".to_string()));
    }
    doc.filters = Some(FilterNode::Group {
        op: FilterOp::And,
        children: predicates,
    });

    let name = entities.rename_to.as_deref().unwrap_or("Results");
    let mut view = View::new(entities.view_type.unwrap_or(ViewType::Table), name);

    if let Some(properties) = &entities.property_list {
        // Requested properties verbatim, after resolution.
        view.order = properties.iter().map(|p| resolve_property(p)).collect();
    } else {
        doc.formulas = vec![
            Formula {
                name: "last_updated".into(),
                expr: FormulaExpr::Inline("file.mtime.relative()".into()),
            },
            Formula {
                name: "word_count".into(),
                expr: FormulaExpr::Inline("(file.size / 5).round(0)".into()),
            },
        ];
        doc.properties = vec![
            PropertyMeta {
                reference: "formula.last_updated".into(),
                display_name: "Updated".into(),
            },
            PropertyMeta {
                reference: "formula.word_count".into(),
                display_name: "~Words".into(),
            },
        ];
        view.order = vec![
            "file.name".into(),
            "formula.word_count".into(),
            "formula.last_updated".into(),
        ];
    }

    if let Some(sort) = &entities.sort {
        view.sort = vec![SortKey {
            property: resolve_property(&sort.property),
            direction: sort.direction,
        }];
    }
    if let Some(group) = &entities.group_property {
        view.group_by = Some(SortKey {
            property: resolve_property(group),
            direction: crate::base::Direction::Asc,
        });
    }

    doc.views = vec![view];
    doc
}
