//! Whitespace-separated column files.
//!
//! The first line names the columns; every following line is one event.
//! A cell holds either a number or a bracketed, comma-separated array with no
//! embedded spaces, such as `[1.5,2,3e2]` or `[]`. Blank lines and lines
//! starting with `#` are ignored.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use queryflow::Observable;

use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Value(f64),
    Array(Vec<f64>),
}

impl Cell {
    pub fn observable(&self) -> Observable<'_, f64> {
        match self {
            Cell::Value(x)  => Observable::Value(*x),
            Cell::Array(xs) => Observable::Array(xs),
        }
    }

    pub fn scalar(&self) -> Option<f64> {
        match self {
            &Cell::Value(x) => Some(x),
            Cell::Array(_)  => None,
        }
    }
}

impl FromStr for Cell {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        let number = |x: &str| x.parse::<f64>().map_err(|e| format!("'{x}': {e}"));
        match s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Some("")    => Ok(Cell::Array(vec![])),
            Some(inner) => inner.split(',').map(number).collect::<std::result::Result<_, _>>().map(Cell::Array),
            None        => number(s).map(Cell::Value),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    pub fn columns(&self) -> &[String] { &self.columns }

    /// Position of the column called `name`.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.columns.iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::Config(format!("no column named '{name}'")))
    }

    pub fn rows(&self) -> &[Vec<Cell>] { &self.rows }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut lines = text.lines()
            .enumerate()
            .map(|(n, line)| (n + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let columns = match lines.next() {
            Some((_, header)) => header.split_whitespace().map(String::from).collect::<Vec<_>>(),
            None => return Err(Error::Parse { line: 0, message: "missing header line".into() }),
        };

        let rows = lines
            .map(|(line, text)| {
                let row = text.split_whitespace()
                    .map(|cell| cell.parse::<Cell>().map_err(|message| Error::Parse { line, message }))
                    .collect::<Result<Vec<_>>>()?;
                if row.len() != columns.len() {
                    return Err(Error::Parse {
                        line,
                        message: format!("expected {} cells, found {}", columns.len(), row.len()),
                    });
                }
                Ok(row)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(columns = columns.len(), rows = rows.len(), "read table");
        Ok(Self { columns, rows })
    }
}
