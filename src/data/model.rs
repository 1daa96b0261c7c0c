use std::fmt;
use std::path::PathBuf;

use super::coerce::Coercion;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
///
/// Delimited text yields only `Text` and `Null` until numeric coercion runs;
/// spreadsheets hand over their native cell types directly.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date/time rendered as text for simplicity.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, used when plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Label used for categorical axes and legends.
    pub fn label(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Bool,
    /// More than one non-null kind (e.g. a spreadsheet column of numbers and text).
    Mixed,
    /// Every cell is null.
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
            ColumnKind::Bool => "bool",
            ColumnKind::Mixed => "mixed",
            ColumnKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    /// Current (normalized once the loader has run) name.
    pub name: String,
    /// Header exactly as it appeared in the source file.
    pub original_name: String,
    pub cells: Vec<CellValue>,
    /// Outcome of numeric coercion; `None` until coercion has run.
    pub coercion: Option<Coercion>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let name = name.into();
        Self {
            original_name: name.clone(),
            name,
            cells,
            coercion: None,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        let mut kind: Option<ColumnKind> = None;
        for cell in &self.cells {
            let this = match cell {
                CellValue::Null => continue,
                CellValue::Integer(_) => ColumnKind::Integer,
                CellValue::Float(_) => ColumnKind::Float,
                CellValue::Bool(_) => ColumnKind::Bool,
                CellValue::Text(_) | CellValue::Date(_) => ColumnKind::Text,
            };
            kind = Some(match kind {
                None => this,
                Some(k) if k == this => k,
                Some(ColumnKind::Integer) if this == ColumnKind::Float => ColumnKind::Float,
                Some(ColumnKind::Float) if this == ColumnKind::Integer => ColumnKind::Float,
                Some(_) => return ColumnKind::Mixed,
            });
        }
        kind.unwrap_or(ColumnKind::Empty)
    }
}

// ---------------------------------------------------------------------------
// Table – one loaded source file
// ---------------------------------------------------------------------------

/// An ordered set of equally long columns loaded from a single source file.
#[derive(Debug, Clone)]
pub struct Table {
    /// Display name, e.g. "Print Sales Data".
    pub name: String,
    pub source: PathBuf,
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl Table {
    /// Build a table from header names and row-major records.
    ///
    /// Callers guarantee no record is longer than `headers`; short records are
    /// padded with `Null`.
    pub fn from_rows(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let row_count = rows.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|h| Column::new(h, Vec::with_capacity(row_count)))
            .collect();

        for mut row in rows {
            row.resize(columns.len(), CellValue::Null);
            for (col, cell) in columns.iter_mut().zip(row) {
                col.cells.push(cell);
            }
        }

        Table {
            name: name.into(),
            source: source.into(),
            columns,
            row_count,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn original_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.original_name.as_str()).collect()
    }

    /// First column carrying `name`. Duplicate names resolve to the earliest.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.column(n).is_some())
    }

    /// Names that occur on more than one column, in first-seen order.
    pub fn duplicate_column_names(&self) -> Vec<String> {
        let mut dups: Vec<String> = Vec::new();
        for (i, col) in self.columns.iter().enumerate() {
            let seen_before = self.columns[..i].iter().any(|c| c.name == col.name);
            if seen_before && !dups.contains(&col.name) {
                dups.push(col.name.clone());
            }
        }
        dups
    }

    /// The first `n` rows, row-major, for previews.
    pub fn head(&self, n: usize) -> Vec<Vec<&CellValue>> {
        (0..self.row_count.min(n))
            .map(|row| self.columns.iter().map(|c| &c.cells[row]).collect())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// DatasetBundle – the four tables the dashboard works on
// ---------------------------------------------------------------------------

/// The four tables, always in this order. Read-only once built.
#[derive(Debug, Clone)]
pub struct DatasetBundle {
    pub ad_revenue: Table,
    pub city_readiness: Table,
    pub digital_pilot: Table,
    pub print_sales: Table,
}

impl DatasetBundle {
    pub fn tables(&self) -> [&Table; 4] {
        [
            &self.ad_revenue,
            &self.city_readiness,
            &self.digital_pilot,
            &self.print_sales,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn from_rows_pads_short_records() {
        let table = Table::from_rows(
            "t",
            "t.csv",
            vec!["a".into(), "b".into()],
            vec![vec![text("1"), text("2")], vec![text("3")]],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns[1].cells, vec![text("2"), CellValue::Null]);
    }

    #[test]
    fn column_kind_widens_int_to_float() {
        let col = Column::new(
            "x",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.5)],
        );
        assert_eq!(col.kind(), ColumnKind::Float);

        let mixed = Column::new("y", vec![CellValue::Integer(1), text("a")]);
        assert_eq!(mixed.kind(), ColumnKind::Mixed);

        let empty = Column::new("z", vec![CellValue::Null]);
        assert_eq!(empty.kind(), ColumnKind::Empty);
    }

    #[test]
    fn duplicate_names_resolve_to_first_column() {
        let mut table = Table::from_rows(
            "t",
            "t.csv",
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![text("1"), text("2"), text("3")]],
        );
        table.columns[2].name = "a".into();

        assert_eq!(table.duplicate_column_names(), vec!["a".to_string()]);
        assert_eq!(table.column("a").map(|c| &c.cells[0]), Some(&text("1")));
    }

    #[test]
    fn head_is_row_major_and_bounded() {
        let table = Table::from_rows(
            "t",
            "t.csv",
            vec!["a".into(), "b".into()],
            vec![
                vec![text("1"), text("2")],
                vec![text("3"), text("4")],
                vec![text("5"), text("6")],
            ],
        );
        let head = table.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head[1], vec![&text("3"), &text("4")]);
        assert_eq!(table.head(10).len(), 3);
    }
}
