use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use polars::prelude::{DataFrame, Expr, IntoLazy, Operator, Series};
use polars::sql::sql_expr;

use crate::error::{Result, StageError};

const EVAL_COLUMN: &str = "__dpipe_eval__";

/// Evaluates string expressions over the columns of a frame.
///
/// Implementations return exactly one value per row of `frame`.
pub trait ExprEngine: Send + Sync + fmt::Debug {
    fn eval(&self, frame: &DataFrame, expr: &str) -> Result<Series>;
}

/// Expression engine backed by polars' SQL expression parser.
///
/// Columns are referenced by name (`a + 1`, `b != 'x'`, `a > b`). Scalar results are broadcast
/// to the frame height. `/` always divides to a float, integer operands included. Conditions are
/// combined with `AND` / `OR`; the bitwise `&` and `|` operators are rejected because SQL binds
/// them tighter than comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlEngine;

impl ExprEngine for SqlEngine {
    fn eval(&self, frame: &DataFrame, expr: &str) -> Result<Series> {
        if let Some(operator) = bitwise_operator(expr) {
            return Err(StageError::UnsupportedOperator {
                expr: expr.to_string(),
                operator,
            });
        }
        let parsed = sql_expr(expr)?.map_expr(true_division);
        let evaluated = frame
            .clone()
            .lazy()
            .select([parsed.alias(EVAL_COLUMN)])
            .collect()?;
        let series = evaluated
            .column(EVAL_COLUMN)?
            .as_materialized_series()
            .clone();

        let expected = frame.height();
        match series.len() {
            len if len == expected => Ok(series),
            1 => Ok(series.new_from_index(0, expected)),
            found => Err(StageError::EvalLength {
                expr: expr.to_string(),
                expected,
                found,
            }),
        }
    }
}

/// Runs `engine` and enforces one value per row of `frame`.
pub(crate) fn evaluate(engine: &dyn ExprEngine, frame: &DataFrame, expr: &str) -> Result<Series> {
    let series = engine.eval(frame, expr)?;
    if series.len() != frame.height() {
        return Err(StageError::EvalLength {
            expr: expr.to_string(),
            expected: frame.height(),
            found: series.len(),
        });
    }
    Ok(series)
}

fn true_division(expr: Expr) -> Expr {
    match expr {
        Expr::BinaryExpr {
            left,
            op: Operator::Divide,
            right,
        } => Expr::BinaryExpr {
            left,
            op: Operator::TrueDivide,
            right,
        },
        other => other,
    }
}

/// First `&` or `|` outside a string literal. `||` is string concatenation.
fn bitwise_operator(expr: &str) -> Option<char> {
    let mut quoted = false;
    let mut chars = expr.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => quoted = !quoted,
            '&' if !quoted => return Some('&'),
            '|' if !quoted => {
                if chars.next_if_eq(&'|').is_none() {
                    return Some('|');
                }
            }
            _ => {}
        }
    }
    None
}

static DEFAULT_ENGINE: Lazy<Arc<dyn ExprEngine>> = Lazy::new(|| Arc::new(SqlEngine));

/// The engine used by stages built without an explicit one.
pub fn default_engine() -> Arc<dyn ExprEngine> {
    Arc::clone(&DEFAULT_ENGINE)
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    #[test]
    fn evaluates_arithmetic_over_columns() -> PolarsResult<()> {
        let frame = df!("a" => [1i64, 2, 3], "b" => [10i64, 20, 30])?;
        let out = SqlEngine.eval(&frame, "a + b").unwrap();
        let values: Vec<Option<i64>> = out.i64()?.into_iter().collect();
        assert_eq!(values, [Some(11), Some(22), Some(33)]);
        Ok(())
    }

    #[test]
    fn broadcasts_scalars() -> PolarsResult<()> {
        let frame = df!("a" => [1i64, 2, 3])?;
        let out = SqlEngine.eval(&frame, "1").unwrap();
        assert_eq!(out.len(), 3);
        Ok(())
    }

    #[test]
    fn comparisons_yield_masks() -> PolarsResult<()> {
        let frame = df!("b" => ["a", "b", "a"])?;
        let out = SqlEngine.eval(&frame, "b != 'a'").unwrap();
        let values: Vec<Option<bool>> = out.bool()?.into_iter().collect();
        assert_eq!(values, [Some(false), Some(true), Some(false)]);
        Ok(())
    }

    #[test]
    fn integer_division_yields_floats() -> PolarsResult<()> {
        let frame = df!("a" => [1i64, 2, 3])?;
        let out = SqlEngine.eval(&frame, "a / 2").unwrap();
        let values: Vec<Option<f64>> = out.f64()?.into_iter().collect();
        assert_eq!(values, [Some(0.5), Some(1.0), Some(1.5)]);
        Ok(())
    }

    #[test]
    fn bitwise_operators_are_rejected() -> PolarsResult<()> {
        let frame = df!("a" => [1i64, 2, 3])?;
        let err = SqlEngine.eval(&frame, "a > 1 & a < 3").unwrap_err();
        assert!(matches!(err, StageError::UnsupportedOperator { operator: '&', .. }));
        let err = SqlEngine.eval(&frame, "a < 2 | a > 2").unwrap_err();
        assert!(matches!(err, StageError::UnsupportedOperator { operator: '|', .. }));

        let out = SqlEngine.eval(&frame, "a > 1 AND a < 3").unwrap();
        let values: Vec<Option<bool>> = out.bool()?.into_iter().collect();
        assert_eq!(values, [Some(false), Some(true), Some(false)]);
        Ok(())
    }

    #[test]
    fn pipes_inside_literals_are_allowed() -> PolarsResult<()> {
        let frame = df!("b" => ["x|y", "z"])?;
        let out = SqlEngine.eval(&frame, "b = 'x|y'").unwrap();
        let values: Vec<Option<bool>> = out.bool()?.into_iter().collect();
        assert_eq!(values, [Some(true), Some(false)]);
        Ok(())
    }

    #[test]
    fn unknown_columns_surface_engine_errors() -> PolarsResult<()> {
        let frame = df!("a" => [1i64])?;
        let err = SqlEngine.eval(&frame, "missing + 1").unwrap_err();
        assert!(matches!(err, StageError::Polars(_)));
        Ok(())
    }
}
