use std::fmt;

use polars::prelude::{BooleanChunked, DataFrame, NamedFrom, Series};

use crate::error::{Result, StageError};

/// A DataFrame paired with one `i64` label per row.
///
/// Polars frames carry no row index, so the labels live alongside the frame. Filters keep the
/// labels of the surviving rows and [`crate::stages::ResetIndex`] regenerates them.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
    index: Vec<i64>,
}

impl Table {
    /// Wraps a frame, labelling its rows `0..height`.
    pub fn new(frame: DataFrame) -> Self {
        let index = range_index(frame.height());
        Self { frame, index }
    }

    /// Wraps a frame with explicit row labels.
    pub fn with_index(frame: DataFrame, index: Vec<i64>) -> Result<Self> {
        if index.len() != frame.height() {
            return Err(StageError::IndexLength {
                labels: index.len(),
                rows: frame.height(),
            });
        }
        Ok(Self { frame, index })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn into_parts(self) -> (DataFrame, Vec<i64>) {
        (self.frame, self.index)
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    /// Replaces the frame while keeping the current row labels.
    pub(crate) fn replace_frame(&self, frame: DataFrame) -> Result<Self> {
        Self::with_index(frame, self.index.clone())
    }

    /// Keeps the rows where `mask` is true. Null entries drop the row.
    pub(crate) fn filter(&self, mask: &BooleanChunked) -> Result<Self> {
        let frame = self.frame.filter(mask)?;
        let index = self
            .index
            .iter()
            .zip(mask)
            .filter_map(|(label, keep)| keep.unwrap_or(false).then_some(*label))
            .collect();
        Self::with_index(frame, index)
    }

    /// Relabels rows `0..height`, returning the previous labels as an `Int64` series.
    pub(crate) fn reset_index(&self, name: &str) -> (Self, Series) {
        let old = Series::new(name.into(), self.index.as_slice());
        (Self::new(self.frame.clone()), old)
    }
}

impl From<DataFrame> for Table {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.frame.equals_missing(&other.frame)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

fn range_index(len: usize) -> Vec<i64> {
    (0..len as i64).collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    #[test]
    fn new_labels_rows_from_zero() -> PolarsResult<()> {
        let table = Table::new(df!("a" => [4i64, 5, 6])?);
        assert_eq!(table.index(), &[0, 1, 2]);
        assert_eq!(table.shape(), (3, 1));
        Ok(())
    }

    #[test]
    fn with_index_rejects_length_mismatch() -> PolarsResult<()> {
        let err = Table::with_index(df!("a" => [1i64, 2])?, vec![7]).unwrap_err();
        assert!(matches!(err, StageError::IndexLength { labels: 1, rows: 2 }));
        Ok(())
    }

    #[test]
    fn filter_keeps_surviving_labels() -> PolarsResult<()> {
        let table = Table::with_index(df!("a" => [1i64, 2, 3])?, vec![10, 20, 30]).unwrap();
        let mask = BooleanChunked::new("mask".into(), &[Some(true), None, Some(true)]);
        let filtered = table.filter(&mask).unwrap();
        assert_eq!(filtered.index(), &[10, 30]);
        assert_eq!(filtered.height(), 2);
        Ok(())
    }
}
