//! Data model for a Bases query document
//!
//! All collections are ordered `Vec`s: entry order is meaningful and must
//! survive a parse -> render round trip.

/// The central artifact: filters, formulas, properties, views, summaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseDocument {
    pub filters: Option<FilterNode>,
    pub formulas: Vec<Formula>,
    /// Document-level summary formulas (name -> expression).
    pub summaries: Vec<(String, String)>,
    pub properties: Vec<PropertyMeta>,
    pub views: Vec<View>,
}

/// Boolean tree over predicate strings.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Group {
        op: FilterOp,
        children: Vec<FilterNode>,
    },
    Predicate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    And,
    Or,
    Not,
}

impl FilterOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            FilterOp::And => "and",
            FilterOp::Or => "or",
            FilterOp::Not => "not",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "and" => Some(FilterOp::And),
            "or" => Some(FilterOp::Or),
            "not" => Some(FilterOp::Not),
            _ => None,
        }
    }
}

/// A named computed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub name: String,
    pub expr: FormulaExpr,
}

/// Formula expressions are either a single line or a literal block scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    Inline(String),
    Block {
        /// True for `|-` (strip final newline), false for `|`.
        chomp: bool,
        lines: Vec<String>,
    },
}

/// Display metadata for a property reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMeta {
    pub reference: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Table,
    Cards,
    List,
    Map,
}

impl ViewType {
    pub fn keyword(&self) -> &'static str {
        match self {
            ViewType::Table => "table",
            ViewType::Cards => "cards",
            ViewType::List => "list",
            ViewType::Map => "map",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "table" => Some(ViewType::Table),
            "cards" => Some(ViewType::Cards),
            "list" => Some(ViewType::List),
            "map" => Some(ViewType::Map),
            _ => None,
        }
    }
}

impl Default for ViewType {
    fn default() -> Self {
        ViewType::Table
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "ASC" => Some(Direction::Asc),
            "DESC" => Some(Direction::Desc),
            _ => None,
        }
    }
}

/// One sort or group key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub property: String,
    pub direction: Direction,
}

/// One named presentation of the filtered results.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub view_type: ViewType,
    pub name: String,
    pub limit: Option<u32>,
    /// Per-view filter override.
    pub filters: Option<FilterNode>,
    /// Ordered property references to display.
    pub order: Vec<String>,
    pub sort: Vec<SortKey>,
    pub group_by: Option<SortKey>,
    /// Per-view summaries (property reference -> aggregation identifier).
    pub summaries: Vec<(String, String)>,
    // Map-only settings
    pub coordinates: Option<String>,
    pub marker_icon: Option<String>,
    pub marker_color: Option<String>,
    pub center: Option<String>,
    pub default_zoom: Option<u32>,
    pub max_zoom: Option<u32>,
    pub map_tiles: Option<String>,
}

impl View {
    pub fn new(view_type: ViewType, name: impl Into<String>) -> Self {
        Self {
            view_type,
            name: name.into(),
            limit: None,
            filters: None,
            order: Vec::new(),
            sort: Vec::new(),
            group_by: None,
            summaries: Vec::new(),
            coordinates: None,
            marker_icon: None,
            marker_color: None,
            center: None,
            default_zoom: None,
            max_zoom: None,
            map_tiles: None,
        }
    }
}

impl BaseDocument {
    /// Parse a document from its text form.
    pub fn parse(text: &str) -> crate::core::Result<Self> {
        crate::base::parse::parse(text)
    }

    /// Serialize back to the canonical text form.
    pub fn render(&self) -> String {
        crate::base::render::render(self)
    }

    /// The view the Patcher edits.
    pub fn first_view_mut(&mut self) -> Option<&mut View> {
        self.views.first_mut()
    }
}
