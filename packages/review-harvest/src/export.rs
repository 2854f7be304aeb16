//! CSV export and import of extracted rows.
//!
//! List-valued columns are written as list literals (`[6, 8]`,
//! `['6: marginally above', '8: accept']`) so they survive a round trip
//! through a single text cell.

use serde_json::{Number, Value};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{HarvestError, Result};
use crate::pipeline::{Decision, DecisionType, ExtractedRow};

/// Conventional table file name inside an output directory.
pub const RATINGS_FILE_NAME: &str = "ratings_data.csv";

/// Columns always written, in order.
pub const BASE_COLUMNS: [&str; 13] = [
    "submission_id",
    "submission_number",
    "primary_area",
    "num_reviews",
    "ratings",
    "confidences",
    "soundness",
    "presentation",
    "contribution",
    "avg_rating",
    "min_rating",
    "max_rating",
    "avg_confidence",
];

/// Columns appended when decisions are available.
pub const DECISION_COLUMNS: [&str; 2] = ["decision", "decision_type"];

/// Render values as a list literal.
pub fn format_list_literal(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(format_scalar).collect();
    format!("[{}]", items.join(", "))
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => quote(&other.to_string()),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Parse a list literal written by [`format_list_literal`].
///
/// Also accepts double-quoted strings. An empty cell is an empty list.
pub fn parse_list_literal(text: &str) -> std::result::Result<Vec<Value>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| format!("not a list literal: {}", text))?;

    let mut values = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let value = if first == '\'' || first == '"' {
            chars.next();
            let mut s = String::new();
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some('n') => s.push('\n'),
                        Some('r') => s.push('\r'),
                        Some('t') => s.push('\t'),
                        Some(escaped) => s.push(escaped),
                        None => return Err("dangling escape".to_string()),
                    },
                    Some(c) if c == first => break,
                    Some(c) => s.push(c),
                    None => return Err("unterminated string".to_string()),
                }
            }
            Value::String(s)
        } else {
            let mut token = String::new();
            while let Some(c) = chars.next_if(|c| *c != ',') {
                token.push(c);
            }
            parse_bare(token.trim())?
        };
        values.push(value);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            Some(',') | None => {}
            Some(c) => return Err(format!("unexpected character {:?}", c)),
        }
    }
    Ok(values)
}

fn parse_bare(token: &str) -> std::result::Result<Value, String> {
    match token {
        "True" => Ok(Value::Bool(true)),
        "False" => Ok(Value::Bool(false)),
        "None" => Ok(Value::Null),
        _ => {
            if let Ok(i) = token.parse::<i64>() {
                return Ok(Value::Number(i.into()));
            }
            token
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("unrecognised token: {}", token))
        }
    }
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn float_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:?}", v)).unwrap_or_default()
}

/// Write rows as CSV to any writer.
pub fn write_rows<W: Write>(
    writer: W,
    rows: &[ExtractedRow],
    include_decisions: bool,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
    if include_decisions {
        header.extend(DECISION_COLUMNS);
    }
    csv.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.submission_id.clone().unwrap_or_default(),
            opt_cell(row.submission_number),
            row.primary_area.clone(),
            row.num_reviews.to_string(),
            format_list_literal(&row.ratings),
            format_list_literal(&row.confidences),
            format_list_literal(&row.soundness),
            format_list_literal(&row.presentation),
            format_list_literal(&row.contribution),
            float_cell(row.avg_rating),
            opt_cell(row.min_rating),
            opt_cell(row.max_rating),
            float_cell(row.avg_confidence),
        ];
        if include_decisions {
            record.push(opt_cell(row.decision));
            record.push(opt_cell(row.decision_type));
        }
        csv.write_record(&record)?;
    }

    csv.flush().map_err(|e| HarvestError::Csv(e.into()))?;
    Ok(())
}

/// Write rows to a CSV file, replacing it.
pub fn write_rows_csv(
    path: impl AsRef<Path>,
    rows: &[ExtractedRow],
    include_decisions: bool,
) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| HarvestError::io(path, e))?;
    write_rows(std::io::BufWriter::new(file), rows, include_decisions)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote ratings table");
    Ok(())
}

/// Rows read back from a table, plus whether it had decision columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingsTable {
    pub rows: Vec<ExtractedRow>,
    pub has_decisions: bool,
}

struct Columns {
    headers: csv::StringRecord,
}

impl Columns {
    fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
        let index = self.headers.iter().position(|h| h == name)?;
        record.get(index).map(str::trim)
    }

    fn text(&self, record: &csv::StringRecord, name: &str) -> Option<String> {
        self.get(record, name)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn parsed<T: std::str::FromStr>(
        &self,
        record: &csv::StringRecord,
        name: &str,
    ) -> Result<Option<T>> {
        match self.get(record, name).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(cell) => cell.parse().map(Some).map_err(|_| invalid(name, cell)),
        }
    }

    /// Integer cell; accepts a float with a zero fraction such as `6.0`.
    fn integer(&self, record: &csv::StringRecord, name: &str) -> Result<Option<i64>> {
        match self.get(record, name).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(cell) => cell
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    cell.parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0)
                        .map(|f| f as i64)
                })
                .map(Some)
                .ok_or_else(|| invalid(name, cell)),
        }
    }

    fn list(&self, record: &csv::StringRecord, name: &str) -> Result<Vec<Value>> {
        let cell = self.get(record, name).unwrap_or("");
        parse_list_literal(cell).map_err(|_| invalid(name, cell))
    }
}

fn invalid(column: &str, value: &str) -> HarvestError {
    HarvestError::InvalidCell {
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Read rows from CSV. Decision columns are optional.
pub fn read_rows<R: Read>(reader: R) -> Result<RatingsTable> {
    let mut csv = csv::Reader::from_reader(reader);
    let columns = Columns {
        headers: csv.headers()?.clone(),
    };
    let has_decisions = columns.headers.iter().any(|h| h == "decision");

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        rows.push(ExtractedRow {
            submission_id: columns.text(&record, "submission_id"),
            submission_number: columns.integer(&record, "submission_number")?,
            primary_area: columns
                .text(&record, "primary_area")
                .unwrap_or_else(|| crate::pipeline::NOT_AVAILABLE.to_string()),
            num_reviews: columns
                .integer(&record, "num_reviews")?
                .map(|n| n.max(0) as usize)
                .unwrap_or(0),
            ratings: columns.list(&record, "ratings")?,
            confidences: columns.list(&record, "confidences")?,
            soundness: columns.list(&record, "soundness")?,
            presentation: columns.list(&record, "presentation")?,
            contribution: columns.list(&record, "contribution")?,
            avg_rating: columns.parsed(&record, "avg_rating")?,
            min_rating: columns.integer(&record, "min_rating")?,
            max_rating: columns.integer(&record, "max_rating")?,
            avg_confidence: columns.parsed(&record, "avg_confidence")?,
            decision: columns.parsed::<Decision>(&record, "decision")?,
            decision_type: columns.parsed::<DecisionType>(&record, "decision_type")?,
        });
    }

    Ok(RatingsTable {
        rows,
        has_decisions,
    })
}

/// Read a CSV file written by [`write_rows_csv`].
pub fn read_rows_csv(path: impl AsRef<Path>) -> Result<RatingsTable> {
    let path = path.as_ref();
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(HarvestError::MissingInput {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(HarvestError::io(path, e)),
    };
    read_rows(std::io::BufReader::new(file))
}
