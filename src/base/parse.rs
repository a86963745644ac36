//! Line-based reader for the constrained document format
//!
//! Reads exactly the shapes the synthesizer, the patcher, and the template
//! catalog produce: top-level `filters`/`formulas`/`summaries`/`properties`/
//! `views`, literal block scalars (`|`, `|-`) for formulas, and the view
//! sub-blocks (`order`, `sort`, `groupBy`, `summaries`, per-view `filters`).

use crate::base::model::{
    BaseDocument, Direction, FilterNode, FilterOp, Formula, FormulaExpr, PropertyMeta, SortKey,
    View, ViewType,
};
use crate::core::{ForgeError, Result};

pub fn parse(text: &str) -> Result<BaseDocument> {
    let lines: Vec<&str> = text.lines().collect();
    let mut doc = BaseDocument::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            i += 1;
            continue;
        }
        if indent_of(line) != 0 {
            return Err(err(i, "unexpected indentation at top level"));
        }
        match line.trim_end() {
            "filters:" => {
                let (node, next) = parse_filter_group(&lines, i + 1, 2)?;
                doc.filters = Some(node);
                i = next;
            }
            "formulas:" => i = parse_formulas(&lines, i + 1, &mut doc.formulas)?,
            "summaries:" => i = parse_string_map(&lines, i + 1, 2, &mut doc.summaries)?,
            "properties:" => i = parse_properties(&lines, i + 1, &mut doc.properties)?,
            "views:" => i = parse_views(&lines, i + 1, &mut doc.views)?,
            other => return Err(err(i, format!("unknown top-level key: {other}"))),
        }
    }

    Ok(doc)
}

fn err(line: usize, msg: impl std::fmt::Display) -> ForgeError {
    ForgeError::Parse(format!("line {}: {}", line + 1, msg))
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Strip one layer of matching surrounding quotes.
fn unquote(value: &str) -> String {
    let v = value.trim();
    if v.len() >= 2
        && ((v.starts_with('"') && v.ends_with('"')) || (v.starts_with('\'') && v.ends_with('\'')))
    {
        v[1..v.len() - 1].to_string()
    } else {
        v.to_string()
    }
}

/// Split `key: value` at the first colon.
fn split_key(body: &str) -> Option<(&str, &str)> {
    let pos = body.find(':')?;
    Some((body[..pos].trim(), body[pos + 1..].trim()))
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Parse a boolean group whose `and:`/`or:`/`not:` header sits at `indent`.
fn parse_filter_group(lines: &[&str], mut i: usize, indent: usize) -> Result<(FilterNode, usize)> {
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    if i >= lines.len() {
        return Err(err(i, "expected a filter group"));
    }
    let line = lines[i];
    if indent_of(line) != indent || !line.trim_end().ends_with(':') {
        return Err(err(i, "expected and:/or:/not: group header"));
    }
    let word = line.trim().trim_end_matches(':');
    let op = FilterOp::from_keyword(word)
        .ok_or_else(|| err(i, format!("unknown filter combinator: {word}")))?;
    let (children, next) = parse_filter_items(lines, i + 1, indent + 2)?;
    Ok((FilterNode::Group { op, children }, next))
}

fn parse_filter_items(
    lines: &[&str],
    mut i: usize,
    item_indent: usize,
) -> Result<(Vec<FilterNode>, usize)> {
    let mut children = Vec::new();
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            break;
        }
        if indent_of(line) != item_indent || !line[item_indent..].starts_with("- ") {
            break;
        }
        let item = line[item_indent + 2..].trim();
        if let Some(op) = item.strip_suffix(':').and_then(FilterOp::from_keyword) {
            let (grandchildren, next) = parse_filter_items(lines, i + 1, item_indent + 4)?;
            children.push(FilterNode::Group {
                op,
                children: grandchildren,
            });
            i = next;
        } else {
            children.push(FilterNode::Predicate(unquote(item)));
            i += 1;
        }
    }
    Ok((children, i))
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

fn parse_formulas(lines: &[&str], mut i: usize, out: &mut Vec<Formula>) -> Result<usize> {
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() || indent_of(line) != 2 {
            break;
        }
        let (name, value) =
            split_key(&line[2..]).ok_or_else(|| err(i, "expected `name: expression`"))?;
        if value == "|" || value == "|-" {
            let chomp = value == "|-";
            let (block, next) = collect_block(lines, i + 1);
            out.push(Formula {
                name: name.to_string(),
                expr: FormulaExpr::Block {
                    chomp,
                    lines: block,
                },
            });
            i = next;
        } else {
            out.push(Formula {
                name: name.to_string(),
                expr: FormulaExpr::Inline(unquote(value)),
            });
            i += 1;
        }
    }
    Ok(i)
}

/// Collect a literal block scalar indented by four spaces.
fn collect_block(lines: &[&str], mut i: usize) -> (Vec<String>, usize) {
    let mut block = Vec::new();
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            // Keep interior blank lines, stop at a section separator.
            let mut k = i + 1;
            while k < lines.len() && lines[k].trim().is_empty() {
                k += 1;
            }
            if k < lines.len() && indent_of(lines[k]) >= 4 {
                block.push(String::new());
                i += 1;
                continue;
            }
            break;
        }
        if indent_of(line) < 4 {
            break;
        }
        block.push(line[4..].to_string());
        i += 1;
    }
    (block, i)
}

// ---------------------------------------------------------------------------
// Properties / summaries
// ---------------------------------------------------------------------------

fn parse_properties(lines: &[&str], mut i: usize, out: &mut Vec<PropertyMeta>) -> Result<usize> {
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() || indent_of(line) != 2 {
            break;
        }
        let reference = line
            .trim()
            .strip_suffix(':')
            .ok_or_else(|| err(i, "expected a property reference"))?
            .to_string();
        i += 1;
        let mut display_name = String::new();
        if i < lines.len() && indent_of(lines[i]) == 4 {
            if let Some(("displayName", value)) = split_key(lines[i].trim_start()) {
                display_name = unquote(value);
                i += 1;
            }
        }
        out.push(PropertyMeta {
            reference,
            display_name,
        });
    }
    Ok(i)
}

fn parse_string_map(
    lines: &[&str],
    mut i: usize,
    indent: usize,
    out: &mut Vec<(String, String)>,
) -> Result<usize> {
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() || indent_of(line) != indent {
            break;
        }
        let (key, value) =
            split_key(line.trim_start()).ok_or_else(|| err(i, "expected `key: value`"))?;
        out.push((key.to_string(), unquote(value)));
        i += 1;
    }
    Ok(i)
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

fn parse_views(lines: &[&str], mut i: usize, out: &mut Vec<View>) -> Result<usize> {
    while i < lines.len() {
        if lines[i].trim().is_empty() {
            // Blank lines separate view items; a following top-level key
            // (or end of input) ends the section.
            let mut k = i + 1;
            while k < lines.len() && lines[k].trim().is_empty() {
                k += 1;
            }
            if k >= lines.len() || indent_of(lines[k]) == 0 {
                return Ok(i);
            }
            i = k;
            continue;
        }
        let line = lines[i];
        if indent_of(line) != 2 || !line[2..].starts_with("- ") {
            return Ok(i);
        }

        let mut view = View::new(ViewType::Table, "");
        i = apply_view_key(lines, i, &line[4..], &mut view)?;
        while i < lines.len() {
            let body = lines[i];
            if body.trim().is_empty() {
                break;
            }
            let ind = indent_of(body);
            if ind < 4 {
                break;
            }
            if ind != 4 {
                return Err(err(i, "unexpected indentation inside view"));
            }
            i = apply_view_key(lines, i, &body[4..], &mut view)?;
        }
        out.push(view);
    }
    Ok(i)
}

/// Parse one `key: value` line of a view (advancing past any sub-block)
/// and store it. `i` is the index of the line holding `entry`.
fn apply_view_key(lines: &[&str], i: usize, entry: &str, view: &mut View) -> Result<usize> {
    let (key, value) = split_key(entry).ok_or_else(|| err(i, "expected `key: value` in view"))?;
    match key {
        "type" => {
            view.view_type = ViewType::from_keyword(value)
                .ok_or_else(|| err(i, format!("unknown view type: {value}")))?;
            Ok(i + 1)
        }
        "name" => {
            view.name = unquote(value);
            Ok(i + 1)
        }
        "limit" => {
            view.limit = Some(parse_number(value, i)?);
            Ok(i + 1)
        }
        "coordinates" => {
            view.coordinates = Some(value.to_string());
            Ok(i + 1)
        }
        "markerIcon" => {
            view.marker_icon = Some(value.to_string());
            Ok(i + 1)
        }
        "markerColor" => {
            view.marker_color = Some(value.to_string());
            Ok(i + 1)
        }
        "center" => {
            view.center = Some(value.to_string());
            Ok(i + 1)
        }
        "defaultZoom" => {
            view.default_zoom = Some(parse_number(value, i)?);
            Ok(i + 1)
        }
        "maxZoom" => {
            view.max_zoom = Some(parse_number(value, i)?);
            Ok(i + 1)
        }
        "mapTiles" => {
            view.map_tiles = Some(unquote(value));
            Ok(i + 1)
        }
        "filters" => {
            let (node, next) = parse_filter_group(lines, i + 1, 6)?;
            view.filters = Some(node);
            Ok(next)
        }
        "order" => {
            let mut next = i + 1;
            while next < lines.len() {
                let line = lines[next];
                if line.trim().is_empty() || indent_of(line) != 6 || !line[6..].starts_with("- ") {
                    break;
                }
                view.order.push(line[8..].trim().to_string());
                next += 1;
            }
            Ok(next)
        }
        "sort" => {
            let (keys, next) = parse_sort_list(lines, i + 1)?;
            view.sort = keys;
            Ok(next)
        }
        "groupBy" => {
            let (group, next) = parse_group_by(lines, i + 1)?;
            view.group_by = Some(group);
            Ok(next)
        }
        "summaries" => {
            let mut next = i + 1;
            while next < lines.len() {
                let line = lines[next];
                if line.trim().is_empty() || indent_of(line) != 6 {
                    break;
                }
                let (k, v) =
                    split_key(line.trim_start()).ok_or_else(|| err(next, "expected summary"))?;
                view.summaries.push((k.to_string(), unquote(v)));
                next += 1;
            }
            Ok(next)
        }
        other => Err(err(i, format!("unknown view key: {other}"))),
    }
}

fn parse_sort_list(lines: &[&str], mut i: usize) -> Result<(Vec<SortKey>, usize)> {
    let mut keys = Vec::new();
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() || indent_of(line) != 6 || !line[6..].starts_with("- ") {
            break;
        }
        let (key, property) =
            split_key(line[8..].trim()).ok_or_else(|| err(i, "expected `- property: name`"))?;
        if key != "property" {
            return Err(err(i, format!("unexpected sort key: {key}")));
        }
        let mut direction = Direction::Asc;
        i += 1;
        if i < lines.len() && indent_of(lines[i]) == 8 {
            if let Some(("direction", value)) = split_key(lines[i].trim_start()) {
                direction = Direction::from_keyword(value)
                    .ok_or_else(|| err(i, format!("unknown direction: {value}")))?;
                i += 1;
            }
        }
        keys.push(SortKey {
            property: property.to_string(),
            direction,
        });
    }
    Ok((keys, i))
}

fn parse_group_by(lines: &[&str], mut i: usize) -> Result<(SortKey, usize)> {
    let start = i;
    let mut property = None;
    let mut direction = Direction::Asc;
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() || indent_of(line) != 6 {
            break;
        }
        let (key, value) =
            split_key(line.trim_start()).ok_or_else(|| err(i, "expected groupBy field"))?;
        match key {
            "property" => property = Some(value.to_string()),
            "direction" => {
                direction = Direction::from_keyword(value)
                    .ok_or_else(|| err(i, format!("unknown direction: {value}")))?;
            }
            other => return Err(err(i, format!("unknown groupBy key: {other}"))),
        }
        i += 1;
    }
    let property = property.ok_or_else(|| err(start, "groupBy without a property"))?;
    Ok((SortKey {
        property,
        direction,
    }, i))
}

fn parse_number(value: &str, i: usize) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|_| err(i, format!("expected a number, got {value}")))
}
