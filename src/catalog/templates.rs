//! The built-in template catalog
//!
//! Six curated exemplar documents paired with descriptions (the fast-path
//! showcase entries), three extra documents reachable only through keyword
//! routing, and the ordered keyword map itself. The catalog is built once
//! at startup and passed into the session as immutable configuration.

use crate::extract::{ClassifierEntry, KeywordClassifier};

/// One curated exemplar: id, card label, description, document text.
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub document: &'static str,
}

/// Keyword trigger set routing to a template id.
#[derive(Debug, Clone)]
struct KeywordRoute {
    keywords: &'static [&'static str],
    template: &'static str,
}

/// The fixed catalog of exemplar documents plus the keyword routing table.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    entries: Vec<TemplateEntry>,
    extras: Vec<(&'static str, &'static str)>,
    routes: Vec<KeywordRoute>,
}

impl TemplateCatalog {
    /// Build the built-in catalog.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                TemplateEntry {
                    id: "progress",
                    label: "Project Progress Bar",
                    description: "Show all notes tagged #project with a visual progress bar based on a 'progress' property (0\u{2013}100).",
                    document: PROGRESS,
                },
                TemplateEntry {
                    id: "ratings",
                    label: "Star Ratings Table",
                    description: "Display notes tagged #review with a visual 5-star rating derived from a 'rating' property (1\u{2013}10).",
                    document: RATINGS,
                },
                TemplateEntry {
                    id: "map",
                    label: "Travel Trip Map",
                    description: "Plot notes tagged #travel that live in a Travel folder on an interactive map using location coordinates.",
                    document: MAP,
                },
                TemplateEntry {
                    id: "birthday",
                    label: "Birthday Tracker",
                    description: "Track birthdays of notes tagged #person and compute remaining days and current age.",
                    document: BIRTHDAY,
                },
                TemplateEntry {
                    id: "cleaner",
                    label: "Vault Cleaner",
                    description: "Find orphan notes with no tags, no outgoing links, and small file size \u{2014} candidates for cleanup.",
                    document: CLEANER,
                },
                TemplateEntry {
                    id: "summary",
                    label: "Content Summary",
                    description: "Aggregate notes in a folder with custom summary formulas \u{2014} averages, counts, and totals.",
                    document: SUMMARY,
                },
            ],
            extras: vec![("task", TASK), ("reading", READING), ("daily", DAILY)],
            routes: vec![
                KeywordRoute {
                    keywords: &["progress", "bar", "percent", "completion", "track progress"],
                    template: "progress",
                },
                KeywordRoute {
                    keywords: &["star", "rating", "review", "score", "rate"],
                    template: "ratings",
                },
                KeywordRoute {
                    keywords: &["map", "travel", "trip", "location", "geo", "coordinate"],
                    template: "map",
                },
                KeywordRoute {
                    keywords: &["birthday", "age", "person", "anniversary", "born"],
                    template: "birthday",
                },
                KeywordRoute {
                    keywords: &["clean", "orphan", "untagged", "unused", "empty", "messy", "vault cleaner"],
                    template: "cleaner",
                },
                KeywordRoute {
                    keywords: &["summary", "aggregate", "count", "total", "overview", "content"],
                    template: "summary",
                },
                KeywordRoute {
                    keywords: &["task", "todo", "due", "overdue", "priority"],
                    template: "task",
                },
                KeywordRoute {
                    keywords: &["book", "reading", "library", "article", "read"],
                    template: "reading",
                },
                KeywordRoute {
                    keywords: &["daily", "journal", "diary", "day"],
                    template: "daily",
                },
            ],
        }
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    /// Exact description match, used for the byte-for-byte fast path.
    pub fn by_description(&self, text: &str) -> Option<&TemplateEntry> {
        self.entries.iter().find(|e| e.description == text)
    }

    /// Document text for a template id, checking curated entries first,
    /// then the keyword-only extras.
    pub fn document_for(&self, id: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.document)
            .or_else(|| {
                self.extras
                    .iter()
                    .find(|(extra_id, _)| *extra_id == id)
                    .map(|(_, doc)| *doc)
            })
    }

    /// Classifier over the ordered keyword map. Registration order encodes
    /// priority, so it must match the route table exactly.
    pub fn classifier(&self) -> KeywordClassifier {
        KeywordClassifier::new(
            self.routes
                .iter()
                .map(|route| ClassifierEntry::new(route.template, route.keywords))
                .collect(),
        )
    }
}

const PROGRESS: &str = r#"filters:
  and:
    - file.hasTag("project")
    - 'file.ext == "md"'

formulas:
  percent: "(progress / 100 * 100).round(1)"
  bar: |
    if(progress,
      "▐".repeat((progress / 10).round(0)) +
      "░".repeat(10 - (progress / 10).round(0)),
      "░".repeat(10)
    )
  status_label: |
    if(progress >= 100, "Done",
      if(progress >= 50, "In Progress",
        if(progress > 0, "Started", "Not Started")))

properties:
  formula.percent:
    displayName: "Completion %"
  formula.bar:
    displayName: "Progress"
  formula.status_label:
    displayName: "Status"

views:
  - type: table
    name: "Project Tracker"
    order:
      - file.name
      - formula.status_label
      - formula.percent
      - formula.bar
    groupBy:
      property: formula.status_label
      direction: ASC
    summaries:
      progress: Average"#;

const RATINGS: &str = r#"filters:
  and:
    - file.hasTag("review")

formulas:
  stars: |
    if(rating.isEmpty() || rating < 1 || rating > 10,
      "11111".split("").map(icon("star-off")),
      "11111".split("").slice(0, number(rating / 2).floor()).map(icon("star"))
      + if(number(rating / 2) - number(rating / 2).floor() >= 0.5,
          [icon("star-half")], [])
    )
  score_label: 'if(rating, rating.toFixed(1) + " / 10", "—")'

properties:
  formula.stars:
    displayName: "Rating"
  formula.score_label:
    displayName: "Score"

views:
  - type: table
    name: "Reviews"
    order:
      - file.name
      - category
      - formula.stars
      - formula.score_label
    summaries:
      rating: Average"#;

const MAP: &str = r#"filters:
  and:
    - file.hasTag("travel")
    - file.inFolder("Travel")

formulas:
  trip_year: 'if(date, date(date).format("YYYY"), "")'
  days_ago: 'if(date, (today() - date(date)).days.round(0).toString() + " days ago", "")'

properties:
  formula.trip_year:
    displayName: "Year"
  formula.days_ago:
    displayName: "When"

views:
  - type: map
    name: "Trip Map"
    coordinates: note.location
    markerIcon: note.icon
    markerColor: note.color
    defaultZoom: 4
    maxZoom: 18

  - type: table
    name: "Trip List"
    order:
      - file.name
      - location
      - formula.trip_year
      - formula.days_ago"#;

const BIRTHDAY: &str = r#"filters:
  and:
    - file.hasTag("person")
    - "!birthday.isEmpty()"

formulas:
  remaining_days: |-
    ((number(
      date(today().format("YYYY") + "-" + birthday.format("MM-DD")) +
      if(date(today().format("YYYY") + "-" + birthday.format("MM-DD")) < today(), "1y", "0y")
    ) - number(today())) / 86400000).round()
  age: |-
    if(birthday.format("MM-DD") <= today().format("MM-DD"),
      today() - birthday,
      today() - (birthday + duration("1 year")))
  upcoming: |
    if(formula.remaining_days <= 7, "This week!",
      if(formula.remaining_days <= 30, "This month", ""))

properties:
  formula.remaining_days:
    displayName: "Days Until"
  formula.age:
    displayName: "Age"
  formula.upcoming:
    displayName: "Soon?"

views:
  - type: table
    name: "Birthdays"
    order:
      - file.name
      - birthday
      - formula.age
      - formula.remaining_days
      - formula.upcoming
    sort:
      - property: formula.remaining_days
        direction: ASC"#;

const CLEANER: &str = r#"filters:
  and:
    - 'file.ext == "md"'
    - file.tags.isEmpty()
    - file.links.isEmpty()

formulas:
  word_estimate: '(file.size / 5).round(0)'
  age_days: '(now() - file.ctime).days.round(0)'
  last_touched: 'file.mtime.relative()'

properties:
  formula.word_estimate:
    displayName: "~Words"
  formula.age_days:
    displayName: "Age (days)"
  formula.last_touched:
    displayName: "Last Modified"

views:
  - type: table
    name: "Orphan Notes"
    order:
      - file.name
      - file.folder
      - formula.word_estimate
      - formula.age_days
      - formula.last_touched
    summaries:
      formula.word_estimate: Sum

  - type: table
    name: "Tiny Notes"
    filters:
      and:
        - 'file.size < 500'
    order:
      - file.name
      - file.size
      - formula.last_touched"#;

const SUMMARY: &str = r#"filters:
  and:
    - file.inFolder("Projects")
    - 'file.ext == "md"'

formulas:
  last_updated: 'file.mtime.relative()'
  link_count: 'file.links.length'
  tag_count: 'file.tags.length'

summaries:
  avg_links: 'values.filter(value.isType("number")).mean().round(1)'

properties:
  formula.last_updated:
    displayName: "Updated"
  formula.link_count:
    displayName: "Links"
  formula.tag_count:
    displayName: "Tags"

views:
  - type: table
    name: "Content Overview"
    order:
      - file.name
      - status
      - formula.link_count
      - formula.tag_count
      - formula.last_updated
    summaries:
      formula.link_count: avg_links
      formula.tag_count: Sum
    groupBy:
      property: status
      direction: ASC

  - type: list
    name: "Quick List"
    order:
      - file.name
      - status"#;

const TASK: &str = r#"filters:
  and:
    - file.hasTag("task")
    - 'file.ext == "md"'

formulas:
  days_until_due: 'if(due, (date(due) - today()).days, "")'
  is_overdue: 'if(due, date(due) < today() && status != "done", false)'
  priority_label: |
    if(priority == 1, "High",
      if(priority == 2, "Medium", "Low"))

properties:
  formula.days_until_due:
    displayName: "Days Until Due"
  formula.priority_label:
    displayName: "Priority"

views:
  - type: table
    name: "Active Tasks"
    filters:
      and:
        - 'status != "done"'
    order:
      - file.name
      - status
      - formula.priority_label
      - due
      - formula.days_until_due
    groupBy:
      property: status
      direction: ASC
    summaries:
      formula.days_until_due: Average

  - type: table
    name: "Completed"
    filters:
      and:
        - 'status == "done"'
    order:
      - file.name
      - completed_date"#;

const READING: &str = r#"filters:
  or:
    - file.hasTag("book")
    - file.hasTag("article")

formulas:
  reading_time: 'if(pages, (pages * 2).toString() + " min", "")'
  status_icon: |
    if(status == "reading", icon("book-open"),
      if(status == "done", icon("check-circle"), icon("bookmark")))
  year_read: 'if(finished_date, date(finished_date).year, "")'

properties:
  formula.status_icon:
    displayName: ""
  formula.reading_time:
    displayName: "Est. Time"

views:
  - type: table
    name: "Reading List"
    filters:
      and:
        - 'status == "to-read"'
    order:
      - file.name
      - author
      - pages
      - formula.reading_time

  - type: cards
    name: "Library"
    order:
      - cover
      - file.name
      - author
      - formula.status_icon
    filters:
      not:
        - 'status == "dropped"'"#;

const DAILY: &str = r#"filters:
  and:
    - file.inFolder("Daily Notes")
    - '/^\d{4}-\d{2}-\d{2}$/.matches(file.basename)'

formulas:
  word_estimate: '(file.size / 5).round(0)'
  day_of_week: 'date(file.basename).format("dddd")'

properties:
  formula.day_of_week:
    displayName: "Day"
  formula.word_estimate:
    displayName: "~Words"

views:
  - type: table
    name: "Recent Notes"
    limit: 30
    order:
      - file.name
      - formula.day_of_week
      - formula.word_estimate
      - file.mtime"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::BaseDocument;

    #[test]
    fn test_catalog_shape() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.entries().len(), 6);
        assert!(catalog.document_for("progress").is_some());
        assert!(catalog.document_for("task").is_some());
        assert!(catalog.document_for("nope").is_none());
    }

    #[test]
    fn test_description_lookup_is_exact() {
        let catalog = TemplateCatalog::builtin();
        let entry = catalog.entries()[3].clone();
        assert_eq!(catalog.by_description(entry.description).unwrap().id, entry.id);
        assert!(catalog.by_description("track birthdays").is_none());
    }

    #[test]
    fn test_every_template_parses() {
        let catalog = TemplateCatalog::builtin();
        let mut ids: Vec<&str> = catalog.entries().iter().map(|e| e.id).collect();
        ids.extend(["task", "reading", "daily"]);
        for id in ids {
            let text = catalog.document_for(id).unwrap();
            let doc = BaseDocument::parse(text)
                .unwrap_or_else(|e| panic!("template {id} failed to parse: {e}"));
            assert!(!doc.views.is_empty(), "template {id} has no views");
        }
    }

    #[test]
    fn test_classifier_routes_birthday() {
        let catalog = TemplateCatalog::builtin();
        let classifier = catalog.classifier();
        assert_eq!(
            classifier.classify("track birthdays and ages of friends"),
            Some("birthday")
        );
    }

    #[test]
    fn test_classifier_routes_extras() {
        let catalog = TemplateCatalog::builtin();
        let classifier = catalog.classifier();
        assert_eq!(classifier.classify("overdue todo items"), Some("task"));
        assert_eq!(classifier.classify("my reading list of books"), Some("reading"));
    }

    #[test]
    fn test_classifier_no_route() {
        let catalog = TemplateCatalog::builtin();
        assert_eq!(catalog.classifier().classify("xyzzy"), None);
    }
}
