/// A loaded CSV held column-major: column names plus raw string cells.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub column_data: Vec<Vec<String>>, // column_data[col_idx][row_idx]
    pub row_count: usize,
}

impl DataTable {
    /// Look up a column by name, ignoring case and treating spaces,
    /// underscores, dots and dashes as equivalent.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let want = normalize_header(name);
        self.columns.iter().position(|c| normalize_header(c) == want)
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&str> {
        self.column_data.get(col)?.get(row).map(|s| s.as_str())
    }
}

/// Normalize a header for tolerant matching, so "Sepal Length",
/// "sepal_length" and "sepal.length" all refer to the same column.
pub fn normalize_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace([' ', '_', '.', '-'], "")
}
