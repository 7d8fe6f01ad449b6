use std::collections::HashMap;

use polars::prelude::{Column, DataFrame};
use serde::Deserialize;

use crate::check::{check_columns, duplicate_names};
use crate::error::{Result, StageError};
use crate::stage::Stage;
use crate::table::Table;

/// Removes existing columns. Remaining columns keep their order.
#[derive(Debug, Clone)]
pub struct DropCols {
    fields: Vec<String>,
}

impl DropCols {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Stage for DropCols {
    fn name(&self) -> &'static str {
        "drop_cols"
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn op(&self, table: &Table) -> Result<Table> {
        let keep: Vec<&str> = table
            .column_names()
            .into_iter()
            .filter(|name| !self.fields.iter().any(|field| field == name))
            .collect();

        // Selecting nothing would also drop the rows.
        if keep.is_empty() {
            return table.replace_frame(DataFrame::empty_with_height(table.height()));
        }

        let frame = table.frame().select(keep)?;
        table.replace_frame(frame)
    }
}

/// New column names for [`RenameCols`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnNames {
    /// One name per column, in column order.
    Positional(Vec<String>),
    /// Old name to new name. Keys that are not columns are ignored.
    Mapping(HashMap<String, String>),
}

/// Renames columns, either through a mapping or positionally.
///
/// Renames are applied simultaneously, so a mapping can swap two names.
#[derive(Debug, Clone)]
pub struct RenameCols {
    names: ColumnNames,
}

impl RenameCols {
    pub fn new(names: ColumnNames) -> Self {
        Self { names }
    }

    pub fn mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(ColumnNames::Mapping(
            pairs
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        ))
    }

    pub fn positional<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ColumnNames::Positional(
            names.into_iter().map(Into::into).collect(),
        ))
    }
}

impl Stage for RenameCols {
    fn name(&self) -> &'static str {
        "rename_cols"
    }

    fn op(&self, table: &Table) -> Result<Table> {
        let current = table.column_names();
        let renamed: Vec<String> = match &self.names {
            ColumnNames::Mapping(map) => current
                .iter()
                .map(|name| map.get(*name).cloned().unwrap_or_else(|| name.to_string()))
                .collect(),
            ColumnNames::Positional(names) => {
                if names.len() != current.len() {
                    return Err(StageError::ColumnCountMismatch {
                        actual: current.len(),
                        provided: names.len(),
                    });
                }
                names.clone()
            }
        };

        let duplicates = duplicate_names(renamed.iter().map(String::as_str));
        if !duplicates.is_empty() {
            return Err(StageError::DuplicateColumns { names: duplicates });
        }
        if renamed.is_empty() {
            return Ok(table.clone());
        }

        let columns: Vec<Column> = table
            .frame()
            .get_columns()
            .iter()
            .zip(&renamed)
            .map(|(column, name)| column.clone().with_name(name.as_str().into()))
            .collect();
        table.replace_frame(DataFrame::new(columns)?)
    }
}

/// Reorders columns. The new order must name every column exactly once.
#[derive(Debug, Clone)]
pub struct ReorderCols {
    order: Vec<String>,
}

impl ReorderCols {
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
        }
    }
}

impl Stage for ReorderCols {
    fn name(&self) -> &'static str {
        "reorder_cols"
    }

    fn op(&self, table: &Table) -> Result<Table> {
        if self.order.len() != table.width() {
            return Err(StageError::ColumnCountMismatch {
                actual: table.width(),
                provided: self.order.len(),
            });
        }
        check_columns(table, &self.order)?;

        let duplicates = duplicate_names(self.order.iter().map(String::as_str));
        if !duplicates.is_empty() {
            return Err(StageError::DuplicateColumns { names: duplicates });
        }
        if self.order.is_empty() {
            return Ok(table.clone());
        }

        let frame = table
            .frame()
            .select(self.order.iter().map(String::as_str))?;
        table.replace_frame(frame)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    fn table() -> PolarsResult<Table> {
        Ok(Table::new(df!(
            "a" => [1i64, 2, 3],
            "b" => ["x", "y", "z"],
            "c" => [0.5f64, 1.5, 2.5]
        )?))
    }

    #[test]
    fn mapping_rename_swaps_names() -> PolarsResult<()> {
        let out = RenameCols::mapping([("a", "b"), ("b", "a")])
            .apply(&table()?)
            .unwrap();
        assert_eq!(out.column_names(), ["b", "a", "c"]);
        assert_eq!(out.frame().column("b")?.i64()?.get(0), Some(1));
        Ok(())
    }

    #[test]
    fn mapping_rename_ignores_absent_keys() -> PolarsResult<()> {
        let out = RenameCols::mapping([("zzz", "q")]).apply(&table()?).unwrap();
        assert_eq!(out, table()?);
        Ok(())
    }

    #[test]
    fn rename_rejects_duplicate_results() -> PolarsResult<()> {
        let err = RenameCols::positional(["x", "x", "y"])
            .apply(&table()?)
            .unwrap_err();
        assert!(matches!(err, StageError::DuplicateColumns { .. }));

        let err = RenameCols::mapping([("a", "c")]).apply(&table()?).unwrap_err();
        assert!(matches!(err, StageError::DuplicateColumns { .. }));
        Ok(())
    }

    #[test]
    fn reorder_requires_a_permutation() -> PolarsResult<()> {
        let err = ReorderCols::new(["a", "b", "d"]).apply(&table()?).unwrap_err();
        assert!(matches!(err, StageError::MissingColumns { .. }));

        let err = ReorderCols::new(["a", "a", "b"]).apply(&table()?).unwrap_err();
        assert!(matches!(err, StageError::DuplicateColumns { .. }));
        Ok(())
    }

    #[test]
    fn dropping_every_column_keeps_rows_and_labels() -> PolarsResult<()> {
        let input = Table::with_index(df!("a" => [1i64, 2, 3])?, vec![5, 6, 7]).unwrap();
        let out = DropCols::new(["a"]).apply(&input).unwrap();
        assert_eq!(out.shape(), (3, 0));
        assert_eq!(out.index(), &[5, 6, 7]);
        Ok(())
    }
}
