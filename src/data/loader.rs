use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::data::table::DataTable;

/// Errors raised while loading and validating data files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("missing required column {column:?}")]
    MissingColumn { column: String },
    #[error("row {row}: malformed value {value:?} in column {column:?}")]
    MalformedNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("{}: no usable data rows", path.display())]
    Empty { path: PathBuf },
}

/// Read a file as text, falling back to a latin1 interpretation when
/// the bytes are not valid UTF-8.
fn read_to_text(path: &Path) -> Result<String, DataError> {
    let content = std::fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(content) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    })
}

/// Load a CSV into a column-major table.
///
/// With `named_headers` the file is treated as headerless and the given
/// names become the columns (the abalone file has no header row);
/// otherwise the first row is the header. Ragged rows are padded with
/// empty cells.
pub fn read_table(path: &Path, named_headers: Option<&[&str]>) -> Result<DataTable, DataError> {
    let text = read_to_text(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => all_rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(_) => continue,
        }
    }

    let (columns, data_rows): (Vec<String>, &[Vec<String>]) = match named_headers {
        Some(names) => (names.iter().map(|s| s.to_string()).collect(), &all_rows[..]),
        None => {
            if all_rows.is_empty() {
                return Err(DataError::Empty {
                    path: path.to_path_buf(),
                });
            }
            let columns = all_rows[0].iter().map(|s| s.trim().to_string()).collect();
            (columns, &all_rows[1..])
        }
    };

    if data_rows.is_empty() {
        return Err(DataError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut column_data: Vec<Vec<String>> = vec![Vec::with_capacity(data_rows.len()); columns.len()];
    for row in data_rows {
        for (col_idx, col_data) in column_data.iter_mut().enumerate() {
            if col_idx < row.len() {
                col_data.push(row[col_idx].clone());
            } else {
                col_data.push(String::new());
            }
        }
    }

    Ok(DataTable {
        columns,
        column_data,
        row_count: data_rows.len(),
    })
}

/// Deserialize every CSV row into `T`. Structural failures (missing
/// columns, wrong arity) are hard errors; value-level validation is the
/// caller's job, which is why raw record types keep string fields.
pub fn read_records<T: DeserializeOwned>(path: &Path, has_headers: bool) -> Result<Vec<T>, DataError> {
    let text = read_to_text(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<T>().enumerate() {
        let record = result.map_err(|source| DataError::Csv { row: i + 1, source })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(DataError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn read_table_with_header_row() {
        let file = write_csv("a,b\n1,2\n3,4\n");
        let table = read_table(file.path(), None).unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.row_count, 2);
        assert_eq!(table.cell(1, 1), Some("4"));
    }

    #[test]
    fn read_table_with_named_headers() {
        let file = write_csv("M,0.45\nF,0.53\n");
        let table = read_table(file.path(), Some(&["sex", "length"])).unwrap();
        assert_eq!(table.columns, vec!["sex", "length"]);
        assert_eq!(table.row_count, 2);
        assert_eq!(table.cell(0, 0), Some("M"));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let file = write_csv("a,b,c\n1,2\n");
        let table = read_table(file.path(), None).unwrap();
        assert_eq!(table.cell(2, 0), Some(""));
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_csv("a,b\n");
        assert!(matches!(
            read_table(file.path(), None),
            Err(DataError::Empty { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_table(Path::new("/definitely/not/here.csv"), None).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn read_records_positional() {
        let file = write_csv("M,0.45\nF,0.53\n");
        let rows: Vec<(String, String)> = read_records(file.path(), false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "M");
    }

    #[test]
    fn read_records_by_header_ignores_extra_columns() {
        #[derive(serde::Deserialize)]
        struct Row {
            name: String,
            value: String,
        }
        let file = write_csv("extra,name,value\nx,foo,1\ny,bar,2\n");
        let rows: Vec<Row> = read_records(file.path(), true).unwrap();
        assert_eq!(rows[1].name, "bar");
        assert_eq!(rows[1].value, "2");
    }
}
