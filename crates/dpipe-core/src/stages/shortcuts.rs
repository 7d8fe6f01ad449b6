use std::sync::Arc;

use polars::prelude::DataType;

use crate::engine::{default_engine, evaluate, ExprEngine};
use crate::error::{Result, StageError};
use crate::stage::Stage;
use crate::table::Table;

/// Shortcut for filtering on a comparison against one column.
///
/// `QuickEval::new("a", ">1")` keeps the rows where `a>1` holds. The comparison may reference
/// other columns too (`QuickEval::new("a", ">b")`). Row labels are preserved.
#[derive(Debug, Clone)]
pub struct QuickEval {
    field: String,
    expr: String,
    engine: Arc<dyn ExprEngine>,
}

impl QuickEval {
    pub fn new(field: impl Into<String>, expr: impl AsRef<str>) -> Self {
        let field = field.into();
        let expr = format!("{}{}", field, expr.as_ref());
        Self {
            field,
            expr,
            engine: default_engine(),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn ExprEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// The full boolean expression, column name included.
    pub fn expr(&self) -> &str {
        &self.expr
    }
}

impl Stage for QuickEval {
    fn name(&self) -> &'static str {
        "quick_eval"
    }

    fn field(&self) -> Option<&str> {
        Some(self.field.as_str())
    }

    fn op(&self, table: &Table) -> Result<Table> {
        let mask = evaluate(self.engine.as_ref(), table.frame(), &self.expr)?;
        if mask.dtype() != &DataType::Boolean {
            return Err(StageError::NotAMask {
                expr: self.expr.clone(),
                dtype: mask.dtype().clone(),
            });
        }
        table.filter(mask.bool()?)
    }
}
