//! Built-in pipeline stages.
//!
//! - [`TransformCol`], [`ExprAssign`], [`Filter`]: per-column transformations.
//! - [`ResetIndex`]: row label reset.
//! - [`DropCols`], [`RenameCols`], [`ReorderCols`]: column layout changes.
//! - [`QuickEval`]: expression filter shortcut.
//! - [`LogShape`], [`Log`]: logging taps that pass the table through unchanged.

mod columns;
mod logs;
mod reset;
mod shortcuts;
mod transform;

pub use columns::{ColumnNames, DropCols, RenameCols, ReorderCols};
pub use logs::{Log, LogShape};
pub use reset::ResetIndex;
pub use shortcuts::QuickEval;
pub use transform::{ExprAssign, Filter, MapFn, PredicateFn, TransformCol};
