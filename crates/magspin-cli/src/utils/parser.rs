use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Matrix cannot be empty")]
    EmptyMatrix,

    #[error("Row {row} has {found} entries but row 1 has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Entry '{entry}' in row {row} is not a number")]
    InvalidEntry { entry: String, row: usize },
}

/// Parses a dense matrix written row by row, e.g. `"1,0,0; 0,1,0; 0,0,1"`.
///
/// Any rectangular shape is accepted here; shape requirements are enforced by the
/// operation that consumes the matrix.
pub fn parse_matrix(input: &str) -> Result<DMatrix<f64>, ParseError> {
    let rows: Vec<&str> = input
        .split(';')
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .collect();
    if rows.is_empty() {
        return Err(ParseError::EmptyMatrix);
    }

    let mut values = Vec::new();
    let mut expected = 0;
    for (index, row) in rows.iter().enumerate() {
        let entries = row
            .split(',')
            .map(str::trim)
            .map(|entry| {
                entry.parse::<f64>().map_err(|_| ParseError::InvalidEntry {
                    entry: entry.to_string(),
                    row: index + 1,
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        if index == 0 {
            expected = entries.len();
        } else if entries.len() != expected {
            return Err(ParseError::RaggedRow {
                row: index + 1,
                expected,
                found: entries.len(),
            });
        }
        values.extend(entries);
    }

    Ok(DMatrix::from_row_slice(rows.len(), expected, &values))
}
