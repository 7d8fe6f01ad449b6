//! Minimal composable DataFrame pipelines.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s. Applying it threads a [`Table`] through
//! every stage; each stage checks that the columns it declares exist before it runs.
//!
//! ```no_run
//! use dpipe_core::stages::{ExprAssign, QuickEval, ResetIndex};
//! use dpipe_core::{Stage, Table};
//! use polars::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = Table::new(df!("a" => [1i64, 2, 3, 4, -1])?);
//! let pipeline = QuickEval::new("a", ">2")
//!     .then(ExprAssign::new("b", "a * 2"))
//!     .then(ResetIndex::new());
//! let out = pipeline.apply(&table)?;
//! assert_eq!(out.shape(), (2, 2));
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod stage;
pub mod stages;
pub mod table;

pub use check::check_columns;
pub use config::{PipelineConfig, StageConfig};
pub use engine::{default_engine, ExprEngine, SqlEngine};
pub use error::{ConfigError, Result, StageError};
pub use pipeline::{boxed, Pipeline};
pub use stage::{BoxedStage, Stage};
pub use table::Table;
