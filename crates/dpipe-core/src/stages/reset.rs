use crate::error::Result;
use crate::stage::Stage;
use crate::table::Table;

const DEFAULT_LABEL_COLUMN: &str = "index";
const FALLBACK_LABEL_COLUMN: &str = "level_0";

/// Replaces row labels with `0..height`.
///
/// With `drop(false)` the previous labels are kept as a new leading column, named `index`
/// (or `level_0` when `index` is already a column) unless [`ResetIndex::label_name`] overrides it.
#[derive(Debug, Clone)]
pub struct ResetIndex {
    drop: bool,
    label_name: Option<String>,
}

impl Default for ResetIndex {
    fn default() -> Self {
        Self {
            drop: true,
            label_name: None,
        }
    }
}

impl ResetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the previous labels are discarded.
    pub fn drop(mut self, drop: bool) -> Self {
        self.drop = drop;
        self
    }

    /// Column name for the previous labels when they are kept.
    pub fn label_name(mut self, name: impl Into<String>) -> Self {
        self.label_name = Some(name.into());
        self
    }

    fn label_column(&self, table: &Table) -> &str {
        match &self.label_name {
            Some(name) => name.as_str(),
            None if table.has_column(DEFAULT_LABEL_COLUMN) => FALLBACK_LABEL_COLUMN,
            None => DEFAULT_LABEL_COLUMN,
        }
    }
}

impl Stage for ResetIndex {
    fn name(&self) -> &'static str {
        "reset_index"
    }

    fn op(&self, table: &Table) -> Result<Table> {
        let (reset, labels) = table.reset_index(self.label_column(table));
        if self.drop {
            return Ok(reset);
        }

        let mut frame = reset.into_frame();
        frame.insert_column(0, labels)?;
        Ok(Table::new(frame))
    }
}
