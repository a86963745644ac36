//! Entity extraction from free-form instructions
//!
//! Each field is produced by an independent pure pattern rule; a rule that
//! does not match simply leaves its field unset. Multiple fields may be
//! populated from a single instruction, and identical input always yields
//! identical output.

use crate::base::{Direction, ViewType};
use regex::Regex;
use std::sync::OnceLock;

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid pattern"))
        }
    };
}

/// Optional fields pulled out of one instruction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedEntities {
    /// Tag name without the leading `#`
    pub tag: Option<String>,
    /// Folder name (quoted names may span words)
    pub folder: Option<String>,
    /// Requested view type, if a cue word was present
    pub view_type: Option<ViewType>,
    /// Property names to display, unresolved
    pub property_list: Option<Vec<String>>,
    /// Sort property and direction
    pub sort: Option<SortSpec>,
    /// Property to group by
    pub group_property: Option<String>,
    /// Quoted view name following a rename cue
    pub rename_to: Option<String>,
}

/// A requested sort: property name (unresolved) plus direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub property: String,
    pub direction: Direction,
}

/// Cue words that trigger the Patcher's add-properties step.
pub const ADD_CUES: &[&str] = &["add", "show", "include", "also", "display", "want", "need"];

/// Cue words that trigger the Patcher's remove-properties step.
pub const REMOVE_CUES: &[&str] = &["remove", "hide", "delete", "drop", "without"];

/// Cues the Extractor's property-list rule recognizes.
const PROPERTY_CUES: &[&str] = &["show", "display", "add", "properties"];

const ARTICLES: &[&str] = &["the", "a", "an", "my"];

/// Tokens that never name a property: articles, auxiliary verbs, view-type
/// words, connectives, and the cue verbs themselves.
const NOISE_WORDS: &[&str] = &[
    "the", "a", "an", "my", "me", "i", "of", "to", "for", "on", "at", "all", "some", "please",
    "and", "or", "is", "are", "be", "was", "were", "it", "its", "this", "that", "too",
    "column", "columns", "property", "properties", "field", "fields", "file", "files", "note",
    "notes", "view", "views", "table", "tables", "card", "cards", "list", "lists", "map", "maps",
    "show", "display", "add", "include", "also", "want", "need",
];

/// A token that starts a new clause ends the current property phrase.
const CLAUSE_BREAKERS: &[&str] = &[
    "sort", "sorted", "order", "ordered", "group", "grouped", "grouping", "by", "as", "in",
    "with", "named", "called", "rename", "renamed", "to", "tagged", "tag",
];

/// Run every field rule against one instruction.
pub fn extract(text: &str) -> ExtractedEntities {
    ExtractedEntities {
        tag: extract_tag(text),
        folder: extract_folder(text),
        view_type: extract_view_type(text),
        property_list: property_names_after(text, PROPERTY_CUES),
        sort: extract_sort(text),
        group_property: extract_group(text),
        rename_to: extract_rename(text).map(|(name, _)| name),
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

cached_regex!(tag_literal_re, r"#([A-Za-z0-9_][\w/-]*)");
cached_regex!(tag_phrase_re, r"(?i)\btag(?:ged)?\b(?:\s+to)?\s+([A-Za-z0-9_][\w/-]*)");

fn extract_tag(text: &str) -> Option<String> {
    if let Some(caps) = tag_literal_re().captures(text) {
        return Some(caps[1].to_string());
    }
    tag_phrase_re()
        .captures(text)
        .map(|caps| caps[1].to_string())
}

// ---------------------------------------------------------------------------
// Folder
// ---------------------------------------------------------------------------

cached_regex!(
    folder_re,
    r#"(?i)\bfolder\s+(?:the\s+|a\s+|an\s+|my\s+)?(?:"([^"]+)"|'([^']+)'|([A-Za-z0-9_][\w/-]*))"#
);
cached_regex!(
    in_re,
    r#"(?i)\bin\s+(?:the\s+|a\s+|an\s+|my\s+)?(?:"([^"]+)"|'([^']+)'|([A-Za-z0-9_][\w/-]*))"#
);

fn extract_folder(text: &str) -> Option<String> {
    for re in [folder_re(), in_re()] {
        if let Some(caps) = re.captures(text) {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().trim().to_string());
            // "in folder Cooking" matches the in-rule with "folder" as the
            // name; the folder-rule already ran, so skip that capture.
            if let Some(n) = name {
                if !n.eq_ignore_ascii_case("folder") {
                    return Some(n);
                }
            }
        }
    }
    None
}

/// Span of a quoted folder name, for exclusion from the property-name pool.
fn folder_quoted_span(text: &str) -> Option<(usize, usize)> {
    for re in [folder_re(), in_re()] {
        if let Some(caps) = re.captures(text) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                return Some((m.start(), m.end()));
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// View type
// ---------------------------------------------------------------------------

cached_regex!(view_type_re, r"(?i)\b(cards?|list|map)\b");

fn extract_view_type(text: &str) -> Option<ViewType> {
    let caps = view_type_re().captures(text)?;
    match caps[1].to_lowercase().as_str() {
        "card" | "cards" => Some(ViewType::Cards),
        "list" => Some(ViewType::List),
        "map" => Some(ViewType::Map),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Property names
// ---------------------------------------------------------------------------

cached_regex!(quoted_re, r#""([^"]+)"|'([^']+)'"#);

/// Property names the instruction adds (Patcher step 4).
pub fn added_property_names(text: &str) -> Option<Vec<String>> {
    property_names_after(text, ADD_CUES)
}

/// Property names the instruction removes (Patcher step 5).
pub fn removed_property_names(text: &str) -> Option<Vec<String>> {
    property_names_after(text, REMOVE_CUES)
}

/// True if any add cue appears as a whole word.
pub fn has_add_cue(text: &str) -> bool {
    has_cue(text, ADD_CUES)
}

/// True if any remove cue appears as a whole word.
pub fn has_remove_cue(text: &str) -> bool {
    has_cue(text, REMOVE_CUES)
}

fn has_cue(text: &str, cues: &[&str]) -> bool {
    words_of(text).any(|w| cues.contains(&w.as_str()))
}

fn words_of(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// Extract property names from the phrase following the first cue word.
///
/// Quoted names anywhere in the instruction take priority, except spans
/// already claimed by the folder and rename rules. Otherwise the phrase
/// after the cue is split on commas and "and", each piece is cut at the
/// first clause-breaker token, leading articles are stripped, and
/// noise-stoplist tokens are dropped.
pub fn property_names_after(text: &str, cues: &[&str]) -> Option<Vec<String>> {
    let claimed: Vec<(usize, usize)> = folder_quoted_span(text)
        .into_iter()
        .chain(extract_rename(text).map(|(_, span)| span))
        .collect();

    let quoted: Vec<String> = quoted_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(1).or_else(|| caps.get(2))?;
            if claimed.iter().any(|(s, e)| m.start() >= *s && m.end() <= *e) {
                None
            } else {
                Some(m.as_str().to_string())
            }
        })
        .collect();
    if !quoted.is_empty() {
        return Some(quoted);
    }

    let cue_end = first_cue_end(text, cues)?;
    let phrase = &text[cue_end..];

    let mut names = Vec::new();
    for segment in phrase.split(',') {
        for piece in split_on_and(segment) {
            if let Some(name) = clean_property_piece(&piece) {
                names.push(name);
            }
        }
    }

    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

/// Byte offset just past the earliest whole-word occurrence of any cue.
///
/// Cues are ASCII, so the match is ASCII-case-insensitive against the
/// original text and the returned offset is always a char boundary there.
fn first_cue_end(text: &str, cues: &[&str]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for cue in cues {
        for start in 0..=text.len().saturating_sub(cue.len()) {
            let end = start + cue.len();
            if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
                continue;
            }
            if !text[start..end].eq_ignore_ascii_case(cue) {
                continue;
            }
            let boundary_before = start == 0
                || !text[..start].chars().next_back().is_some_and(|c| c.is_alphanumeric());
            let boundary_after =
                !text[end..].chars().next().is_some_and(|c| c.is_alphanumeric());
            if boundary_before && boundary_after {
                best = Some(best.map_or(end, |b| b.min(end)));
                break;
            }
        }
    }
    best
}

fn split_on_and(segment: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = Vec::new();
    for word in segment.split_whitespace() {
        if word.eq_ignore_ascii_case("and") {
            if !current.is_empty() {
                pieces.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(word);
        }
    }
    if !current.is_empty() {
        pieces.push(current.join(" "));
    }
    pieces
}

/// Cut a piece at the first clause breaker, strip articles and noise words.
fn clean_property_piece(piece: &str) -> Option<String> {
    let mut kept = Vec::new();
    for raw in piece.split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != '_');
        if token.is_empty() {
            continue;
        }
        let lower = token.to_lowercase();
        if CLAUSE_BREAKERS.contains(&lower.as_str()) {
            break;
        }
        if kept.is_empty() && ARTICLES.contains(&lower.as_str()) {
            continue;
        }
        if NOISE_WORDS.contains(&lower.as_str()) {
            continue;
        }
        kept.push(token.to_string());
    }
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

// ---------------------------------------------------------------------------
// Sort / group
// ---------------------------------------------------------------------------

cached_regex!(sort_re, r"(?i)\b(?:sort|order)(?:ed)?\s+by\s+");
cached_regex!(group_re, r"(?i)\bgroup(?:ed)?\s+by\s+");
cached_regex!(desc_re, r"(?i)\bdesc(?:ending)?\b");

const SORT_STOPS: &[&str] = &[
    "asc", "ascending", "desc", "descending", "and", "then", "group", "grouped", "sort",
    "sorted", "in", "as", "with",
];

fn extract_sort(text: &str) -> Option<SortSpec> {
    // Last match wins when several sort phrases appear.
    let m = sort_re().find_iter(text).last()?;
    let property = property_phrase_after(&text[m.end()..])?;
    let direction = if desc_re().is_match(text) {
        Direction::Desc
    } else {
        Direction::Asc
    };
    Some(SortSpec { property, direction })
}

fn extract_group(text: &str) -> Option<String> {
    let m = group_re().find_iter(text).last()?;
    property_phrase_after(&text[m.end()..])
}

/// Collect the property tokens at the head of a phrase, stopping at
/// direction words, connectives, and clause starts.
fn property_phrase_after(rest: &str) -> Option<String> {
    let mut tokens = Vec::new();
    for raw in rest.split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != '_');
        if token.is_empty() {
            break;
        }
        let lower = token.to_lowercase();
        if SORT_STOPS.contains(&lower.as_str()) {
            break;
        }
        if tokens.is_empty() && ARTICLES.contains(&lower.as_str()) {
            continue;
        }
        tokens.push(token.to_string());
        // A trailing comma ends the phrase.
        if raw.ends_with(',') {
            break;
        }
    }
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

// ---------------------------------------------------------------------------
// Rename
// ---------------------------------------------------------------------------

cached_regex!(
    rename_re,
    r#"(?i)\b(?:rename|name|call)(?:ed)?\b(?:\s+(?:it|the|this|to|as|view|base|query|document)){0,3}\s+(?:"([^"]+)"|'([^']+)')"#
);

/// Quoted rename target plus the span of the quoted text, so the
/// property-name rule can exclude it.
fn extract_rename(text: &str) -> Option<(String, (usize, usize))> {
    let caps = rename_re().captures(text)?;
    let m = caps.get(1).or_else(|| caps.get(2))?;
    Some((m.as_str().to_string(), (m.start(), m.end())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_literal() {
        assert_eq!(extract_tag("notes tagged #recipes"), Some("recipes".into()));
        assert_eq!(extract_tag("show #work-log items"), Some("work-log".into()));
    }

    #[test]
    fn test_tag_phrase() {
        assert_eq!(extract_tag("notes tagged recipes"), Some("recipes".into()));
        assert_eq!(extract_tag("tag to project"), Some("project".into()));
        assert_eq!(extract_tag("change the tag to travel"), Some("travel".into()));
    }

    #[test]
    fn test_tag_absent() {
        assert_eq!(extract_tag("show everything"), None);
    }

    #[test]
    fn test_folder_word() {
        assert_eq!(
            extract_folder("notes tagged #recipes in folder Cooking as cards"),
            Some("Cooking".into())
        );
        assert_eq!(extract_folder("notes in Projects"), Some("Projects".into()));
    }

    #[test]
    fn test_folder_quoted() {
        assert_eq!(
            extract_folder("everything in \"Daily Notes\""),
            Some("Daily Notes".into())
        );
        assert_eq!(
            extract_folder("folder 'Meeting Minutes' please"),
            Some("Meeting Minutes".into())
        );
    }

    #[test]
    fn test_folder_article_skipped() {
        assert_eq!(extract_folder("notes in the Archive"), Some("Archive".into()));
    }

    #[test]
    fn test_view_type_cues() {
        assert_eq!(extract_view_type("as cards"), Some(ViewType::Cards));
        assert_eq!(extract_view_type("a card gallery"), Some(ViewType::Cards));
        assert_eq!(extract_view_type("make it a list"), Some(ViewType::List));
        assert_eq!(extract_view_type("plot on a map"), Some(ViewType::Map));
        assert_eq!(extract_view_type("plain table please"), None);
    }

    #[test]
    fn test_view_type_whole_word_only() {
        // "cardigan" and "listless" must not trigger
        assert_eq!(extract_view_type("my cardigan inventory"), None);
        assert_eq!(extract_view_type("listless notes"), None);
    }

    #[test]
    fn test_property_list_quoted_priority() {
        let names = property_names_after("show \"author\" and \"pages\"", PROPERTY_CUES);
        assert_eq!(names, Some(vec!["author".into(), "pages".into()]));
    }

    #[test]
    fn test_property_list_cue_split() {
        let names = property_names_after("show name, size and folder", PROPERTY_CUES);
        assert_eq!(
            names,
            Some(vec!["name".into(), "size".into(), "folder".into()])
        );
    }

    #[test]
    fn test_property_list_noise_dropped() {
        let names =
            property_names_after("display the author and the due date columns", PROPERTY_CUES);
        assert_eq!(names, Some(vec!["author".into(), "due date".into()]));
    }

    #[test]
    fn test_property_list_clause_cut() {
        let names = property_names_after("show name and size sorted by size desc", PROPERTY_CUES);
        assert_eq!(names, Some(vec!["name".into(), "size".into()]));
    }

    #[test]
    fn test_property_list_after_multibyte_text() {
        // Multibyte characters before the cue must not shift the phrase
        // offset (lowercasing "İ" changes its byte length).
        let names = property_names_after("İİ show é", PROPERTY_CUES);
        assert_eq!(names, Some(vec!["é".into()]));

        let e = extract("Çalışma notes: show name and size");
        assert_eq!(e.property_list, Some(vec!["name".into(), "size".into()]));
    }

    #[test]
    fn test_property_list_absent() {
        assert_eq!(property_names_after("group by status", PROPERTY_CUES), None);
    }

    #[test]
    fn test_rename_quote_not_a_property() {
        let names = property_names_after("rename the view to \"Budget\"", PROPERTY_CUES);
        assert_eq!(names, None);
    }

    #[test]
    fn test_sort_basic() {
        let sort = extract_sort("sorted by size").unwrap();
        assert_eq!(sort.property, "size");
        assert_eq!(sort.direction, Direction::Asc);
    }

    #[test]
    fn test_sort_desc_token_anywhere() {
        let sort = extract_sort("sort by size, descending please").unwrap();
        assert_eq!(sort.property, "size");
        assert_eq!(sort.direction, Direction::Desc);
    }

    #[test]
    fn test_sort_multiword_property() {
        let sort = extract_sort("sorted by days until ascending").unwrap();
        assert_eq!(sort.property, "days until");
        assert_eq!(sort.direction, Direction::Asc);
    }

    #[test]
    fn test_sort_last_match_wins() {
        let sort = extract_sort("sort by name, no wait, sort by size").unwrap();
        assert_eq!(sort.property, "size");
    }

    #[test]
    fn test_order_by() {
        let sort = extract_sort("ordered by priority then name").unwrap();
        assert_eq!(sort.property, "priority");
    }

    #[test]
    fn test_group() {
        assert_eq!(extract_group("grouped by status"), Some("status".into()));
        assert_eq!(extract_group("group by the category"), Some("category".into()));
        assert_eq!(extract_group("sort by name"), None);
    }

    #[test]
    fn test_rename() {
        let e = extract("rename the view to \"Budget 2026\"");
        assert_eq!(e.rename_to, Some("Budget 2026".into()));

        let e = extract("call it 'My Projects'");
        assert_eq!(e.rename_to, Some("My Projects".into()));
    }

    #[test]
    fn test_rename_requires_quote() {
        let e = extract("rename the view to Budget");
        assert_eq!(e.rename_to, None);
    }

    #[test]
    fn test_cue_detection() {
        assert!(has_add_cue("also show the author"));
        assert!(has_remove_cue("drop the size column"));
        assert!(!has_remove_cue("dropbox sync notes"));
        assert!(!has_add_cue("group by status"));
    }

    #[test]
    fn test_multiple_fields_one_instruction() {
        let e = extract("notes tagged #recipes in folder Cooking as cards sorted by modified desc");
        assert_eq!(e.tag, Some("recipes".into()));
        assert_eq!(e.folder, Some("Cooking".into()));
        assert_eq!(e.view_type, Some(ViewType::Cards));
        let sort = e.sort.unwrap();
        assert_eq!(sort.property, "modified");
        assert_eq!(sort.direction, Direction::Desc);
    }

    #[test]
    fn test_deterministic() {
        let a = extract("notes tagged #x in Docs as list");
        let b = extract("notes tagged #x in Docs as list");
        assert_eq!(a, b);
    }
}
