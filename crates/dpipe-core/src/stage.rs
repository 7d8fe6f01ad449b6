use std::fmt;
use std::sync::Arc;

use crate::check::check_columns;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::table::Table;

pub type BoxedStage = Arc<dyn Stage>;

/// A single table transformation with a validate-then-execute contract.
///
/// Implementors supply [`Stage::op`]; [`Stage::apply`] runs [`Stage::check`] first and never
/// calls `op` on a table that fails it.
pub trait Stage: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Primary column this stage reads.
    fn field(&self) -> Option<&str> {
        None
    }

    /// Additional columns this stage reads.
    fn fields(&self) -> &[String] {
        &[]
    }

    /// Every column that must exist before the stage runs.
    fn required_columns(&self) -> Vec<&str> {
        self.field()
            .into_iter()
            .chain(self.fields().iter().map(String::as_str))
            .collect()
    }

    fn check(&self, table: &Table) -> Result<()> {
        check_columns(table, self.required_columns())
    }

    fn op(&self, table: &Table) -> Result<Table>;

    fn apply(&self, table: &Table) -> Result<Table> {
        self.check(table)?;
        self.op(table)
    }

    /// The stages this value contributes when composed.
    fn into_stages(self) -> Vec<BoxedStage>
    where
        Self: Sized + 'static,
    {
        vec![Arc::new(self)]
    }

    /// Composes `self` and `next` into a pipeline running `self` first.
    ///
    /// Pipelines on either side contribute their members, so `a.then(b).then(c)` and
    /// `a.then(b.then(c))` both run `[a, b, c]`.
    fn then<S>(self, next: S) -> Pipeline
    where
        Self: Sized + 'static,
        S: Stage + 'static,
    {
        let mut stages = self.into_stages();
        stages.extend(next.into_stages());
        Pipeline::new(stages)
    }
}
