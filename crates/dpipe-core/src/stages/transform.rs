use std::fmt;
use std::sync::Arc;

use polars::prelude::{AnyValue, BooleanChunked, NamedFrom, Series};

use crate::engine::{default_engine, evaluate, ExprEngine};
use crate::error::Result;
use crate::stage::Stage;
use crate::table::Table;

/// Maps one cell value to its replacement.
pub type MapFn = Arc<dyn Fn(&AnyValue<'_>) -> AnyValue<'static> + Send + Sync>;

/// Decides whether the row holding a cell value is kept.
pub type PredicateFn = Arc<dyn Fn(&AnyValue<'_>) -> bool + Send + Sync>;

/// Replaces an existing column element-wise with the output of a function.
#[derive(Clone)]
pub struct TransformCol {
    field: String,
    func: MapFn,
}

impl TransformCol {
    pub fn new<F>(field: impl Into<String>, func: F) -> Self
    where
        F: Fn(&AnyValue<'_>) -> AnyValue<'static> + Send + Sync + 'static,
    {
        Self {
            field: field.into(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for TransformCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformCol")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

impl Stage for TransformCol {
    fn name(&self) -> &'static str {
        "transform_col"
    }

    fn field(&self) -> Option<&str> {
        Some(self.field.as_str())
    }

    fn op(&self, table: &Table) -> Result<Table> {
        let source = table.frame().column(&self.field)?.as_materialized_series();
        if source.is_empty() {
            return Ok(table.clone());
        }

        let mut values = Vec::with_capacity(source.len());
        for idx in 0..source.len() {
            values.push((self.func)(&source.get(idx)?));
        }
        let mapped = Series::from_any_values(self.field.as_str().into(), &values, false)?;

        let mut frame = table.frame().clone();
        frame.with_column(mapped)?;
        table.replace_frame(frame)
    }
}

/// Assigns a new or existing column from a string expression.
///
/// The target column does not need to exist, so the precondition check is skipped. Existing
/// columns keep their position; new columns are appended.
#[derive(Debug, Clone)]
pub struct ExprAssign {
    field: String,
    expr: String,
    engine: Arc<dyn ExprEngine>,
}

impl ExprAssign {
    pub fn new(field: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expr: expr.into(),
            engine: default_engine(),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn ExprEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }
}

impl Stage for ExprAssign {
    fn name(&self) -> &'static str {
        "expr_assign"
    }

    fn field(&self) -> Option<&str> {
        Some(self.field.as_str())
    }

    /// The target column may not exist yet, so nothing is required up front.
    fn required_columns(&self) -> Vec<&str> {
        Vec::new()
    }

    fn op(&self, table: &Table) -> Result<Table> {
        let values = evaluate(self.engine.as_ref(), table.frame(), &self.expr)?;
        let mut frame = table.frame().clone();
        frame.with_column(values.with_name(self.field.as_str().into()))?;
        table.replace_frame(frame)
    }
}

/// Keeps the rows whose value in an existing column satisfies a predicate.
///
/// Row order and row labels are preserved.
#[derive(Clone)]
pub struct Filter {
    field: String,
    predicate: PredicateFn,
}

impl Filter {
    pub fn new<F>(field: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&AnyValue<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            field: field.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

impl Stage for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn field(&self) -> Option<&str> {
        Some(self.field.as_str())
    }

    fn op(&self, table: &Table) -> Result<Table> {
        let source = table.frame().column(&self.field)?.as_materialized_series();

        let mut keep = Vec::with_capacity(source.len());
        for idx in 0..source.len() {
            keep.push((self.predicate)(&source.get(idx)?));
        }
        let mask = BooleanChunked::new(self.field.as_str().into(), &keep);

        table.filter(&mask)
    }
}
