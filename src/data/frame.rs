use std::fmt;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes, which is
/// what CSV and Feather uploads round-trip through.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Guess the narrowest type for a raw text field.
    pub fn parse_str(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Interpret the value as an `f64` for model features.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(*b as i64 as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame – the in-memory table
// ---------------------------------------------------------------------------

/// An ordered set of named columns of equal length.
///
/// Invariants (checked by [`Frame::from_columns`]):
/// * every column has the same number of rows
/// * column names are unique
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Vec<CellValue>>,
}

impl Frame {
    /// Build a frame, validating the column invariants.
    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<CellValue>>) -> Result<Frame> {
        if names.len() != columns.len() {
            bail!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            );
        }
        if let Some(first) = columns.first() {
            for (name, col) in names.iter().zip(&columns) {
                if col.len() != first.len() {
                    bail!(
                        "column '{name}' has {} rows, expected {}",
                        col.len(),
                        first.len()
                    );
                }
            }
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                bail!("duplicate column name '{name}'");
            }
        }
        Ok(Frame { names, columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column values by name.
    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate `(name, values)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[CellValue])> {
        self.names
            .iter()
            .map(|n| n.as_str())
            .zip(self.columns.iter().map(|c| c.as_slice()))
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        &self.columns[col][row]
    }

    /// A new frame containing the given rows, in the given order, with a
    /// fresh contiguous index. Row identity is not preserved.
    pub fn take_rows(&self, indices: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|col| indices.iter().map(|&i| col[i].clone()).collect())
            .collect();
        Frame {
            names: self.names.clone(),
            columns,
        }
    }

    /// The first `n` rows (fewer if the frame is shorter).
    pub fn head(&self, n: usize) -> Frame {
        let indices: Vec<usize> = (0..self.n_rows().min(n)).collect();
        self.take_rows(&indices)
    }

    /// Append a column. Fails if the name already exists or the length does
    /// not match the current row count.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<CellValue>) -> Result<Frame> {
        let name = name.into();
        if self.names.contains(&name) {
            bail!("duplicate column name '{name}'");
        }
        if !self.columns.is_empty() && values.len() != self.n_rows() {
            bail!(
                "column '{name}' has {} rows, expected {}",
                values.len(),
                self.n_rows()
            );
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(self)
    }

    /// Undo an accidental row/column transposition: swap the axes, promote
    /// the first resulting row to be the header, and drop it from the data.
    ///
    /// For a frame of C columns and R rows the result has R columns (named
    /// from the original first column's values) and C-1 rows. The original
    /// column names are discarded.
    pub fn transposed_with_header(&self) -> Result<Frame> {
        if self.n_cols() < 2 {
            bail!("cannot promote a header from a table with fewer than 2 columns");
        }
        let names: Vec<String> = self.columns[0].iter().map(|v| v.to_string()).collect();
        let columns: Vec<Vec<CellValue>> = (0..self.n_rows())
            .map(|row| {
                self.columns[1..]
                    .iter()
                    .map(|col| col[row].clone())
                    .collect()
            })
            .collect();
        Frame::from_columns(names, columns)
    }
}
