//! Integration tests for document generation
//!
//! These tests drive the full session pipeline from instruction text to
//! rendered document:
//! - Template fast path (exact description returns the exemplar verbatim)
//! - Keyword routing to curated and extra templates
//! - Fresh synthesis when no template applies
//! - Determinism of the local pipeline

use baseforge::base::{BaseDocument, Direction, FilterNode, ViewType};
use baseforge::catalog::TemplateCatalog;
use baseforge::studio::Session;

// ============================================================================
// Template Routing
// ============================================================================

/// Submitting a template description verbatim must return the exemplar
/// document byte for byte, with no parse and re-render in between.
#[tokio::test]
async fn test_every_description_returns_exemplar_verbatim() {
    let catalog = TemplateCatalog::builtin();
    let entries: Vec<_> = catalog.entries().to_vec();

    for entry in entries {
        let mut session = Session::new(TemplateCatalog::builtin());
        let doc = session.submit(entry.description).await.unwrap();
        assert_eq!(doc, entry.document, "template {} not returned verbatim", entry.id);
    }
}

/// A birthday instruction routes through the keyword map to the birthday
/// template: tag predicate on person, formulas computing remaining days
/// and age, a view ordering those formulas, and an ascending sort on the
/// remaining-days formula.
#[tokio::test]
async fn test_birthday_keyword_routing_end_to_end() {
    let mut session = Session::new(TemplateCatalog::builtin());
    let doc = session
        .submit("Track birthdays of people and show days until and age, sorted by days until ascending")
        .await
        .unwrap();

    assert!(doc.contains("file.hasTag(\"person\")"));

    let parsed = BaseDocument::parse(doc).unwrap();
    assert!(parsed.formulas.iter().any(|f| f.name == "remaining_days"));
    assert!(parsed.formulas.iter().any(|f| f.name == "age"));

    let view = &parsed.views[0];
    assert!(view.order.contains(&"formula.remaining_days".to_string()));
    assert!(view.order.contains(&"formula.age".to_string()));
    assert_eq!(view.sort[0].property, "formula.remaining_days");
    assert_eq!(view.sort[0].direction, Direction::Asc);
}

/// Extra templates are reachable by keyword even though they have no
/// showcase description.
#[tokio::test]
async fn test_extra_template_by_keyword() {
    let mut session = Session::new(TemplateCatalog::builtin());
    let doc = session.submit("show my overdue tasks by priority").await.unwrap();
    assert!(doc.contains("file.hasTag(\"task\")"));
    assert!(doc.contains("name: \"Active Tasks\""));
}

// ============================================================================
// Fresh Synthesis
// ============================================================================

/// Instruction with a tag, folder, and view type that no keyword claims
/// falls through to local synthesis.
#[tokio::test]
async fn test_synthesis_tag_folder_cards() {
    let mut session = Session::new(TemplateCatalog::builtin());
    let doc = session
        .submit("notes with tag #recipes in folder Cooking as cards")
        .await
        .unwrap();

    let parsed = BaseDocument::parse(doc).unwrap();
    let Some(FilterNode::Group { children, .. }) = &parsed.filters else {
        panic!("expected a filter group");
    };
    assert!(children.contains(&FilterNode::Predicate("file.hasTag(\"recipes\")".into())));
    assert!(children.contains(&FilterNode::Predicate("file.inFolder(\"Cooking\")".into())));
    assert_eq!(parsed.views[0].view_type, ViewType::Cards);
    assert!(!parsed.views[0].order.is_empty());
}

/// The same instruction always produces the same document text.
#[tokio::test]
async fn test_synthesis_is_deterministic() {
    let instruction = "notes with tag #quux sorted by modified desc";

    let mut first = Session::new(TemplateCatalog::builtin());
    let a = first.submit(instruction).await.unwrap().to_string();

    let mut second = Session::new(TemplateCatalog::builtin());
    let b = second.submit(instruction).await.unwrap().to_string();

    assert_eq!(a, b);
}

/// Synthesized output must parse back into an equal document.
#[tokio::test]
async fn test_synthesis_round_trips_through_parser() {
    let mut session = Session::new(TemplateCatalog::builtin());
    let doc = session
        .submit("notes with tag #meeting grouped by status")
        .await
        .unwrap();

    let parsed = BaseDocument::parse(doc).unwrap();
    assert_eq!(parsed.render(), doc);
}
