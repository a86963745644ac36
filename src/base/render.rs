//! Serializer for the document model
//!
//! Reproduces the canonical layout: sections separated by one blank line in
//! the order filters, formulas, summaries, properties, views. Predicates
//! with an embedded double quote are wrapped in single quotes; all other
//! predicates are unquoted.

use crate::base::model::{BaseDocument, FilterNode, Formula, FormulaExpr, SortKey, View};

pub fn render(doc: &BaseDocument) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(filters) = &doc.filters {
        let mut lines = vec!["filters:".to_string()];
        render_filter_group(&mut lines, filters, 2);
        sections.push(lines.join("\n"));
    }

    if !doc.formulas.is_empty() {
        let mut lines = vec!["formulas:".to_string()];
        for formula in &doc.formulas {
            render_formula(&mut lines, formula);
        }
        sections.push(lines.join("\n"));
    }

    if !doc.summaries.is_empty() {
        let mut lines = vec!["summaries:".to_string()];
        for (name, expr) in &doc.summaries {
            lines.push(format!("  {}: {}", name, quote_scalar(expr)));
        }
        sections.push(lines.join("\n"));
    }

    if !doc.properties.is_empty() {
        let mut lines = vec!["properties:".to_string()];
        for meta in &doc.properties {
            lines.push(format!("  {}:", meta.reference));
            lines.push(format!("    displayName: \"{}\"", meta.display_name));
        }
        sections.push(lines.join("\n"));
    }

    if !doc.views.is_empty() {
        let mut lines = vec!["views:".to_string()];
        for (idx, view) in doc.views.iter().enumerate() {
            if idx > 0 {
                lines.push(String::new());
            }
            render_view(&mut lines, view);
        }
        sections.push(lines.join("\n"));
    }

    sections.join("\n\n")
}

fn indent(width: usize) -> String {
    " ".repeat(width)
}

/// Single quotes around embedded double quotes; double quotes around a
/// leading `!` or `/` so the scalar survives a YAML reader.
fn quote_predicate(pred: &str) -> String {
    if pred.contains('"') {
        format!("'{pred}'")
    } else if pred.starts_with('!') || pred.starts_with('/') {
        format!("\"{pred}\"")
    } else {
        pred.to_string()
    }
}

fn quote_scalar(value: &str) -> String {
    if value.contains('"') {
        format!("'{value}'")
    } else {
        value.to_string()
    }
}

fn render_filter_group(lines: &mut Vec<String>, node: &FilterNode, width: usize) {
    match node {
        FilterNode::Group { op, children } => {
            lines.push(format!("{}{}:", indent(width), op.keyword()));
            for child in children {
                render_filter_item(lines, child, width + 2);
            }
        }
        // A bare predicate root still renders as a single-entry list.
        FilterNode::Predicate(pred) => {
            lines.push(format!("{}and:", indent(width)));
            lines.push(format!("{}- {}", indent(width + 2), quote_predicate(pred)));
        }
    }
}

fn render_filter_item(lines: &mut Vec<String>, node: &FilterNode, width: usize) {
    match node {
        FilterNode::Predicate(pred) => {
            lines.push(format!("{}- {}", indent(width), quote_predicate(pred)));
        }
        FilterNode::Group { op, children } => {
            lines.push(format!("{}- {}:", indent(width), op.keyword()));
            for child in children {
                render_filter_item(lines, child, width + 4);
            }
        }
    }
}

fn render_formula(lines: &mut Vec<String>, formula: &Formula) {
    match &formula.expr {
        FormulaExpr::Inline(expr) => {
            if expr.contains('"') {
                lines.push(format!("  {}: '{}'", formula.name, expr));
            } else {
                lines.push(format!("  {}: \"{}\"", formula.name, expr));
            }
        }
        FormulaExpr::Block { chomp, lines: body } => {
            lines.push(format!(
                "  {}: {}",
                formula.name,
                if *chomp { "|-" } else { "|" }
            ));
            for line in body {
                if line.is_empty() {
                    lines.push(String::new());
                } else {
                    lines.push(format!("    {line}"));
                }
            }
        }
    }
}

fn render_sort_key(lines: &mut Vec<String>, key: &SortKey, width: usize) {
    lines.push(format!("{}- property: {}", indent(width), key.property));
    lines.push(format!(
        "{}direction: {}",
        indent(width + 2),
        key.direction.keyword()
    ));
}

fn render_view(lines: &mut Vec<String>, view: &View) {
    lines.push(format!("  - type: {}", view.view_type.keyword()));
    lines.push(format!("    name: \"{}\"", view.name));
    if let Some(limit) = view.limit {
        lines.push(format!("    limit: {limit}"));
    }
    if let Some(value) = &view.coordinates {
        lines.push(format!("    coordinates: {value}"));
    }
    if let Some(value) = &view.marker_icon {
        lines.push(format!("    markerIcon: {value}"));
    }
    if let Some(value) = &view.marker_color {
        lines.push(format!("    markerColor: {value}"));
    }
    if let Some(value) = &view.center {
        lines.push(format!("    center: {value}"));
    }
    if let Some(value) = view.default_zoom {
        lines.push(format!("    defaultZoom: {value}"));
    }
    if let Some(value) = view.max_zoom {
        lines.push(format!("    maxZoom: {value}"));
    }
    if let Some(value) = &view.map_tiles {
        lines.push(format!("    mapTiles: {value}"));
    }
    if let Some(filters) = &view.filters {
        lines.push("    filters:".to_string());
        render_filter_group(lines, filters, 6);
    }
    if !view.order.is_empty() {
        lines.push("    order:".to_string());
        for reference in &view.order {
            lines.push(format!("      - {reference}"));
        }
    }
    if !view.sort.is_empty() {
        lines.push("    sort:".to_string());
        for key in &view.sort {
            render_sort_key(lines, key, 6);
        }
    }
    if let Some(group) = &view.group_by {
        lines.push("    groupBy:".to_string());
        lines.push(format!("      property: {}", group.property));
        lines.push(format!("      direction: {}", group.direction.keyword()));
    }
    if !view.summaries.is_empty() {
        lines.push("    summaries:".to_string());
        for (reference, aggregation) in &view.summaries {
            lines.push(format!("      {reference}: {aggregation}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::model::{Direction, FilterOp, ViewType};
    use crate::base::parse::parse;

    fn sample_doc() -> BaseDocument {
        let mut view = View::new(ViewType::Cards, "Results");
        view.order = vec!["file.name".into(), "formula.word_count".into()];
        view.sort = vec![SortKey {
            property: "file.name".into(),
            direction: Direction::Asc,
        }];
        BaseDocument {
            filters: Some(FilterNode::Group {
                op: FilterOp::And,
                children: vec![
                    FilterNode::Predicate("file.hasTag(\"recipes\")".into()),
                    FilterNode::Predicate("file.inFolder(\"Cooking\")".into()),
                ],
            }),
            formulas: vec![Formula {
                name: "word_count".into(),
                expr: FormulaExpr::Inline("(file.size / 5).round(0)".into()),
            }],
            summaries: Vec::new(),
            properties: vec![crate::base::model::PropertyMeta {
                reference: "formula.word_count".into(),
                display_name: "~Words".into(),
            }],
            views: vec![view],
        }
    }

    #[test]
    fn test_render_layout() {
        let text = sample_doc().render();
        let expected = "filters:\n  and:\n    - 'file.hasTag(\"recipes\")'\n    - 'file.inFolder(\"Cooking\")'\n\nformulas:\n  word_count: \"(file.size / 5).round(0)\"\n\nproperties:\n  formula.word_count:\n    displayName: \"~Words\"\n\nviews:\n  - type: cards\n    name: \"Results\"\n    order:\n      - file.name\n      - formula.word_count\n    sort:\n      - property: file.name\n        direction: ASC";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let doc = sample_doc();
        let text = doc.render();
        let reparsed = parse(&text).unwrap();
        assert_eq!(doc, reparsed);
        assert_eq!(reparsed.render(), text);
    }

    #[test]
    fn test_predicate_quoting() {
        assert_eq!(
            quote_predicate("file.hasTag(\"a\")"),
            "'file.hasTag(\"a\")'"
        );
        assert_eq!(quote_predicate("file.size < 500"), "file.size < 500");
        assert_eq!(
            quote_predicate("!birthday.isEmpty()"),
            "\"!birthday.isEmpty()\""
        );
    }
}
