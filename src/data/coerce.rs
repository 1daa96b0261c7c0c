use std::fmt;

use super::model::{CellValue, Column, ColumnKind, Table};

// ---------------------------------------------------------------------------
// Best-effort numeric coercion
// ---------------------------------------------------------------------------

/// What happened to a column during numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    /// Every non-null cell was already a number.
    AlreadyNumeric,
    /// Text cells were parsed; the column is now of the given kind.
    Converted(ColumnKind),
    /// The cell at `row` could not be read as a number, so the column was
    /// left exactly as loaded.
    LeftAsText { row: usize, value: String },
    /// The column has no non-null cells.
    Empty,
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::AlreadyNumeric => write!(f, "numeric"),
            Coercion::Converted(kind) => write!(f, "converted to {kind}"),
            Coercion::LeftAsText { row, value } => {
                write!(f, "kept as text (row {row}: {value:?})")
            }
            Coercion::Empty => write!(f, "empty"),
        }
    }
}

enum Parsed {
    Int(i64),
    Float(f64),
    Null,
}

fn parse_cell(cell: &CellValue) -> Option<Parsed> {
    match cell {
        CellValue::Null => Some(Parsed::Null),
        CellValue::Integer(i) => Some(Parsed::Int(*i)),
        CellValue::Float(v) => Some(Parsed::Float(*v)),
        CellValue::Text(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(Parsed::Int(i))
            } else {
                s.parse::<f64>().ok().map(Parsed::Float)
            }
        }
        CellValue::Bool(_) | CellValue::Date(_) => None,
    }
}

/// Try to turn every cell of `column` into a number.
///
/// All or nothing: the first cell that does not parse leaves the whole column
/// untouched. Integers are widened to floats when any cell needs a float.
pub fn coerce_column(column: &mut Column) -> Coercion {
    let mut parsed = Vec::with_capacity(column.cells.len());
    let mut any_float = false;
    let mut any_text = false;
    let mut any_value = false;

    for (row, cell) in column.cells.iter().enumerate() {
        match parse_cell(cell) {
            Some(p) => {
                any_float |= matches!(p, Parsed::Float(_));
                any_value |= !matches!(p, Parsed::Null);
                any_text |= matches!(cell, CellValue::Text(_));
                parsed.push(p);
            }
            None => {
                let outcome = Coercion::LeftAsText {
                    row,
                    value: cell.to_string(),
                };
                column.coercion = Some(outcome.clone());
                return outcome;
            }
        }
    }

    let outcome = if !any_value {
        Coercion::Empty
    } else if !any_text && column.kind() != ColumnKind::Mixed {
        Coercion::AlreadyNumeric
    } else {
        column.cells = parsed
            .into_iter()
            .map(|p| match p {
                Parsed::Int(i) if any_float => CellValue::Float(i as f64),
                Parsed::Int(i) => CellValue::Integer(i),
                Parsed::Float(v) => CellValue::Float(v),
                Parsed::Null => CellValue::Null,
            })
            .collect();
        Coercion::Converted(column.kind())
    };

    column.coercion = Some(outcome.clone());
    outcome
}

/// Coerce every column of `table`; row count and order never change.
pub fn coerce_table(table: &mut Table) {
    for col in &mut table.columns {
        match coerce_column(col) {
            Coercion::LeftAsText { row, value } => log::debug!(
                "{}: column '{}' kept as text, row {row} is {value:?}",
                table.name,
                col.name
            ),
            outcome => log::trace!("{}: column '{}' {outcome}", table.name, col.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Text(v.to_string())).collect()
    }

    #[test]
    fn one_bad_cell_keeps_column_as_text() {
        let mut col = Column::new("copies", texts(&["10", "20", "N/A"]));
        let outcome = coerce_column(&mut col);

        assert_eq!(
            outcome,
            Coercion::LeftAsText {
                row: 2,
                value: "N/A".into()
            }
        );
        assert_eq!(col.cells, texts(&["10", "20", "N/A"]));
        assert_eq!(col.kind(), ColumnKind::Text);
        assert_eq!(col.coercion, Some(outcome));
    }

    #[test]
    fn integers_and_nulls_convert() {
        let mut col = Column::new(
            "users",
            vec![
                CellValue::Text("10".into()),
                CellValue::Null,
                CellValue::Text(" 30 ".into()),
            ],
        );
        assert_eq!(
            coerce_column(&mut col),
            Coercion::Converted(ColumnKind::Integer)
        );
        assert_eq!(
            col.cells,
            vec![CellValue::Integer(10), CellValue::Null, CellValue::Integer(30)]
        );
    }

    #[test]
    fn mixed_int_float_widens() {
        let mut col = Column::new("revenue", texts(&["1", "2.5", "1e3"]));
        assert_eq!(coerce_column(&mut col), Coercion::Converted(ColumnKind::Float));
        assert_eq!(
            col.cells,
            vec![
                CellValue::Float(1.0),
                CellValue::Float(2.5),
                CellValue::Float(1000.0)
            ]
        );
    }

    #[test]
    fn native_numbers_are_left_alone() {
        let cells = vec![CellValue::Float(1.5), CellValue::Integer(2)];
        let mut col = Column::new("score", cells.clone());
        assert_eq!(coerce_column(&mut col), Coercion::AlreadyNumeric);
        assert_eq!(col.cells, cells);
    }

    #[test]
    fn spreadsheet_number_and_numeric_text_mix_converts() {
        let mut col = Column::new(
            "net",
            vec![CellValue::Integer(5), CellValue::Text("6".into())],
        );
        assert_eq!(
            coerce_column(&mut col),
            Coercion::Converted(ColumnKind::Integer)
        );
        assert_eq!(col.cells, vec![CellValue::Integer(5), CellValue::Integer(6)]);
    }

    #[test]
    fn bool_and_dates_block_coercion() {
        let mut col = Column::new("flag", vec![CellValue::Integer(1), CellValue::Bool(true)]);
        assert!(matches!(
            coerce_column(&mut col),
            Coercion::LeftAsText { row: 1, .. }
        ));
        assert_eq!(col.cells[1], CellValue::Bool(true));

        let mut col = Column::new(
            "month",
            vec![
                CellValue::Text("1".into()),
                CellValue::Date("2024-01-01".into()),
            ],
        );
        assert!(matches!(
            coerce_column(&mut col),
            Coercion::LeftAsText { row: 1, .. }
        ));
        assert_eq!(col.cells[0], CellValue::Text("1".into()));
        assert_eq!(col.cells[1], CellValue::Date("2024-01-01".into()));
    }

    #[test]
    fn all_null_is_empty() {
        let mut col = Column::new("blank", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(coerce_column(&mut col), Coercion::Empty);
    }

    #[test]
    fn table_row_count_is_preserved() {
        let mut table = Table::from_rows(
            "t",
            "t.csv",
            vec!["city".into(), "users".into()],
            vec![texts(&["Pune", "10"]), texts(&["Delhi", "x"]), texts(&["Agra", "3"])],
        );
        coerce_table(&mut table);

        assert_eq!(table.len(), 3);
        assert!(table.columns.iter().all(|c| c.cells.len() == 3));
        assert_eq!(table.columns[0].cells[2], CellValue::Text("Agra".into()));
        assert_eq!(table.columns[1].cells[1], CellValue::Text("x".into()));
    }
}
