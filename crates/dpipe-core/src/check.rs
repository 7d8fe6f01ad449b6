use std::collections::BTreeSet;

use crate::error::{Result, StageError};
use crate::table::Table;

/// Checks that every required column is present in `table`.
///
/// The error lists every missing column, not just the first one found.
pub fn check_columns<I, S>(table: &Table, columns: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let missing: BTreeSet<String> = columns
        .into_iter()
        .filter(|name| !table.has_column(name.as_ref()))
        .map(|name| name.as_ref().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StageError::MissingColumns { missing })
    }
}

/// Returns the names that occur more than once in `names`.
pub(crate) fn duplicate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    names
        .into_iter()
        .filter(|name| !seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    fn table() -> PolarsResult<Table> {
        Ok(Table::new(df!("col_a" => [1i64, 2], "col_b" => [2i64, 4])?))
    }

    #[test]
    fn present_columns_pass() -> PolarsResult<()> {
        assert!(check_columns(&table()?, ["col_a", "col_b"]).is_ok());
        assert!(check_columns(&table()?, Vec::<String>::new()).is_ok());
        Ok(())
    }

    #[test]
    fn reports_every_missing_column() -> PolarsResult<()> {
        let err = check_columns(&table()?, ["col_c", "col_a", "col_d"]).unwrap_err();
        match &err {
            StageError::MissingColumns { missing } => {
                let names: Vec<&str> = missing.iter().map(String::as_str).collect();
                assert_eq!(names, ["col_c", "col_d"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.to_string(), "Missing columns: {col_c, col_d}.");
        Ok(())
    }

    #[test]
    fn finds_duplicates() {
        let dups = duplicate_names(["x", "y", "x", "z", "y"]);
        assert_eq!(dups.into_iter().collect::<Vec<_>>(), ["x", "y"]);
    }
}
