//! In-memory tables of named columns
//!
//! This is the shape spreadsheet data takes once a front end has loaded it.
//! Nothing here touches the filesystem.

use crate::mt::preserving::is_symbolic_only;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Free text, a candidate for translation
    Text(String),
    /// A numeric literal, kept verbatim and never translated
    Number(String),
    /// No value
    Empty,
}

impl Cell {
    /// Classify a raw field: blank → `Empty`, numeric → `Number`, anything else → `Text`
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Cell::Empty
        } else if is_numeric_literal(field) {
            Cell::Number(field.to_string())
        } else {
            Cell::Text(field.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Raw field value for writing back out; `Empty` renders as ""
    pub fn as_field(&self) -> &str {
        match self {
            Cell::Text(s) | Cell::Number(s) => s,
            Cell::Empty => "",
        }
    }

    /// Non-text cells are always symbolic-only
    pub fn is_symbolic_only(&self) -> bool {
        match self {
            Cell::Text(text) => is_symbolic_only(text),
            _ => true,
        }
    }
}

fn is_numeric_literal(field: &str) -> bool {
    let trimmed = field.trim();
    !trimmed.is_empty()
        && trimmed.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false)
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: &str, cells: Vec<Cell>) -> Self {
        Self {
            name: name.to_string(),
            cells,
        }
    }
}

/// A rectangular table; every column has `row_count` cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header row and data rows
    ///
    /// Short rows are padded with `Empty`; fields beyond the header are dropped.
    pub fn from_rows(headers: &[String], rows: &[Vec<String>]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let cells = rows
                    .iter()
                    .map(|row| row.get(i).map(|f| Cell::from_field(f)).unwrap_or(Cell::Empty))
                    .collect();
                Column::new(name, cells)
            })
            .collect();

        Self {
            columns,
            row_count: rows.len(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Add a column, or overwrite the cells of an existing column with the same name
    ///
    /// Cells are padded or truncated to the table's row count. The first column
    /// added to an empty table sets the row count.
    pub fn set_column(&mut self, name: &str, mut cells: Vec<Cell>) {
        if self.columns.is_empty() {
            self.row_count = cells.len();
        }
        cells.resize(self.row_count, Cell::Empty);

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.cells = cells,
            None => self.columns.push(Column::new(name, cells)),
        }
    }

    /// A new table holding only the named columns, in the order given
    ///
    /// Unknown names are skipped.
    pub fn select(&self, names: &[String]) -> Table {
        let mut selected = Table {
            columns: Vec::new(),
            row_count: self.row_count,
        };
        for name in names {
            if let Some(column) = self.column(name) {
                if !selected.has_column(name) {
                    selected.columns.push(column.clone());
                }
            }
        }
        selected
    }

    /// Rows as raw fields, in column order
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.row_count).map(move |row| {
            self.columns
                .iter()
                .map(|column| column.cells[row].as_field())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let headers = vec!["key".to_string(), "text".to_string()];
        let rows = vec![
            vec!["greeting".to_string(), "Hello {name}".to_string()],
            vec!["count".to_string()],
            vec!["price".to_string(), "12.50".to_string(), "extra".to_string()],
        ];
        Table::from_rows(&headers, &rows)
    }

    #[test]
    fn test_cell_from_field() {
        assert_eq!(Cell::from_field(""), Cell::Empty);
        assert_eq!(Cell::from_field("42"), Cell::Number("42".to_string()));
        assert_eq!(Cell::from_field(" -1.5e3 "), Cell::Number(" -1.5e3 ".to_string()));
        assert_eq!(Cell::from_field("NaN"), Cell::Text("NaN".to_string()));
        assert_eq!(Cell::from_field("inf"), Cell::Text("inf".to_string()));
        assert_eq!(Cell::from_field(" "), Cell::Text(" ".to_string()));
        assert_eq!(Cell::from_field("Save"), Cell::Text("Save".to_string()));
    }

    #[test]
    fn test_from_rows_pads_and_truncates() {
        let table = sample();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.headers(), vec!["key", "text"]);
        let text = table.column("text").unwrap();
        assert_eq!(text.cells[1], Cell::Empty);
        assert_eq!(text.cells[2], Cell::Number("12.50".to_string()));
    }

    #[test]
    fn test_set_column_appends_and_replaces() {
        let mut table = sample();
        table.set_column("text_hi", vec![Cell::from("a")]);
        assert_eq!(table.headers(), vec!["key", "text", "text_hi"]);
        assert_eq!(table.column("text_hi").unwrap().cells.len(), 3);

        table.set_column("text_hi", vec![Cell::from("b"), Cell::from("c"), Cell::Empty]);
        assert_eq!(table.headers(), vec!["key", "text", "text_hi"]);
        assert_eq!(table.column("text_hi").unwrap().cells[1], Cell::from("c"));
    }

    #[test]
    fn test_set_column_on_empty_table() {
        let mut table = Table::new();
        table.set_column("a", vec![Cell::from("x"), Cell::from("y")]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let table = sample();
        let selected = table.select(&["text".to_string(), "missing".to_string(), "key".to_string()]);
        assert_eq!(selected.headers(), vec!["text", "key"]);
        assert_eq!(selected.row_count(), 3);
    }

    #[test]
    fn test_rows_render_fields() {
        let table = sample();
        let rows: Vec<Vec<&str>> = table.rows().collect();
        assert_eq!(rows[0], vec!["greeting", "Hello {name}"]);
        assert_eq!(rows[1], vec!["count", ""]);
        assert_eq!(rows[2], vec!["price", "12.50"]);
    }
}
