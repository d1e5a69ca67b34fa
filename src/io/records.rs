//! Forward-only CSV record source. The header row names the columns; each data
//! row becomes a `Record` that keeps the original column order.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use tracing::debug;

use crate::error::{Error, Result};

/// One input row: column names paired with raw string values, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// First value stored under `name`, if the column exists.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Single-pass iterator over the data rows of a CSV source.
///
/// Yields `(row, Record)` where `row` is the 1-based data row number (the
/// header is not counted). Values are passed through untrimmed.
pub struct RecordReader<R: Read> {
    headers: StringRecord,
    rows: StringRecordsIntoIter<R>,
    row: usize,
}

impl RecordReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening CSV input: {:?}", path);
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        Ok(Self {
            headers,
            rows: csv_reader.into_records(),
            row: 0,
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<(usize, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.rows.next()?;
        self.row += 1;
        let row = self.row;
        Some(
            next.map(|values| {
                let record = self
                    .headers
                    .iter()
                    .zip(values.iter())
                    .collect::<Record>();
                (row, record)
            })
            .map_err(|e| Error::Input {
                row,
                message: e.to_string(),
            }),
        )
    }
}
