//! Declarative pipelines loaded from TOML.
//!
//! ```toml
//! name = "example"
//!
//! [[stages]]
//! stage = "log_shape"
//! msg = "Initial shape:"
//!
//! [[stages]]
//! stage = "expr_assign"
//! field = "b"
//! expr = "a + 1"
//!
//! [[stages]]
//! stage = "rename_cols"
//! names = { a = "x" }
//! ```
//!
//! Stages that take Rust closures ([`crate::stages::TransformCol`], [`crate::stages::Filter`])
//! can only be built in code.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::engine::{default_engine, ExprEngine};
use crate::error::ConfigError;
use crate::pipeline::Pipeline;
use crate::stage::BoxedStage;
use crate::stages::{
    ColumnNames, DropCols, ExprAssign, Log, LogShape, QuickEval, RenameCols, ReorderCols,
    ResetIndex,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageConfig {
    ExprAssign {
        field: String,
        expr: String,
    },
    QuickEval {
        field: String,
        expr: String,
    },
    ResetIndex {
        #[serde(default = "default_drop")]
        drop: bool,
        #[serde(default)]
        name: Option<String>,
    },
    DropCols {
        fields: Vec<String>,
    },
    RenameCols {
        names: ColumnNames,
    },
    ReorderCols {
        order: Vec<String>,
    },
    LogShape {
        #[serde(default)]
        msg: String,
    },
    Log {
        #[serde(default)]
        msg: String,
    },
}

fn default_drop() -> bool {
    true
}

impl StageConfig {
    pub fn build(&self, engine: &Arc<dyn ExprEngine>) -> BoxedStage {
        match self {
            StageConfig::ExprAssign { field, expr } => {
                Arc::new(ExprAssign::new(field, expr).with_engine(Arc::clone(engine)))
            }
            StageConfig::QuickEval { field, expr } => {
                Arc::new(QuickEval::new(field, expr).with_engine(Arc::clone(engine)))
            }
            StageConfig::ResetIndex { drop, name } => {
                let stage = ResetIndex::new().drop(*drop);
                match name {
                    Some(name) => Arc::new(stage.label_name(name)),
                    None => Arc::new(stage),
                }
            }
            StageConfig::DropCols { fields } => Arc::new(DropCols::new(fields)),
            StageConfig::RenameCols { names } => Arc::new(RenameCols::new(names.clone())),
            StageConfig::ReorderCols { order } => Arc::new(ReorderCols::new(order)),
            StageConfig::LogShape { msg } => Arc::new(LogShape::new(msg)),
            StageConfig::Log { msg } => Arc::new(Log::new(msg)),
        }
    }
}

impl PipelineConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Builds the pipeline using the default expression engine.
    pub fn build(&self) -> Pipeline {
        self.build_with_engine(default_engine())
    }

    pub fn build_with_engine(&self, engine: Arc<dyn ExprEngine>) -> Pipeline {
        self.stages.iter().map(|stage| stage.build(&engine)).collect()
    }
}

impl FromStr for PipelineConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
