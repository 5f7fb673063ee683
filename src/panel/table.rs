//! Tabular node rendering.
//!
//! Projects a homogeneous resource list into column-aligned text rows. Widths
//! are measured in terminal columns, counting East-Asian wide characters as
//! two, so rows align character-for-character in a fixed-width font.

use crate::error::AppError;
use crate::models::Resource;
use crate::panel::node::{Node, NodeParams};
use chrono::{DateTime, Utc};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Column separator between cells.
const SEPARATOR: &str = " | ";

/// Render a resource list as header, separator and one data row per
/// resource. Each data node's params carry the originating resource.
///
/// A column naming a field that holds a keyed object fails with
/// `UnsupportedColumn`; that is a panel misconfiguration, not user input.
pub fn render(resources: &[Resource], columns: &[&str]) -> Result<Vec<Node>, AppError> {
    let now = Utc::now();
    let values: Vec<Value> = resources.iter().map(Resource::to_value).collect();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(resources.len());
    for value in &values {
        let mut cells = Vec::with_capacity(columns.len());
        for column in columns {
            cells.push(cell_text(value.get(*column), column, now)?);
        }
        rows.push(cells);
    }

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| visual_width(&row[i]))
                .chain([visual_width(column), 1])
                .max()
                .unwrap_or(1)
        })
        .collect();

    let mut nodes = Vec::with_capacity(resources.len() + 2);

    let header = columns
        .iter()
        .enumerate()
        .map(|(i, column)| pad_right(column, widths[i]))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    nodes.push(Node::text(header));

    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    nodes.push(Node::text(rule));

    for ((row, value), resource) in rows.iter().zip(&values).zip(resources) {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                // numbers read better right-aligned
                if value.get(columns[i]).map(Value::is_number) == Some(true) {
                    pad_left(cell, widths[i])
                } else {
                    pad_right(cell, widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        nodes.push(Node::with_params(
            line,
            NodeParams::with_resource(resource.clone()),
        ));
    }

    Ok(nodes)
}

/// Stringify one field for display.
///
/// Lists of objects carrying a `name` flatten to the joined names; scalar
/// lists join as-is; timestamps (`*_at` columns in RFC 3339 form) render as
/// relative ages; keyed objects cannot be flattened.
fn cell_text(field: Option<&Value>, column: &str, now: DateTime<Utc>) -> Result<String, AppError> {
    let Some(field) = field else {
        return Ok(String::new());
    };
    match field {
        Value::Null => Ok(String::new()),
        Value::String(s) => {
            if column.ends_with("_at") {
                if let Ok(then) = DateTime::parse_from_rfc3339(s) {
                    return Ok(relative_age(then.with_timezone(&Utc), now));
                }
            }
            Ok(s.clone())
        }
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(obj) => match obj.get("name").and_then(|n| n.as_str()) {
                        Some(name) => parts.push(name.to_string()),
                        None => return Err(AppError::unsupported_column(column)),
                    },
                    Value::String(s) => parts.push(s.clone()),
                    Value::Number(n) => parts.push(n.to_string()),
                    Value::Bool(b) => parts.push(b.to_string()),
                    _ => return Err(AppError::unsupported_column(column)),
                }
            }
            Ok(parts.join(", "))
        }
        Value::Object(_) => Err(AppError::unsupported_column(column)),
    }
}

/// Terminal-column width of a string (CJK wide characters count as 2).
fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(visual_width(s));
    format!("{}{}", s, " ".repeat(fill))
}

fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(visual_width(s));
    format!("{}{}", " ".repeat(fill), s)
}

/// Compact relative age, e.g. `5m`, `3h`, `2d`.
fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..=59 => "now".to_string(),
        60..=3_599 => format!("{}m", secs / 60),
        3_600..=86_399 => format!("{}h", secs / 3_600),
        86_400..=2_591_999 => format!("{}d", secs / 86_400),
        2_592_000..=31_535_999 => format!("{}mo", secs / 2_592_000),
        _ => format!("{}y", secs / 31_536_000),
    }
}
