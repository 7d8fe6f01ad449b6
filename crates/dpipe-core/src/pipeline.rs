use std::ops::Add;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Result, StageError};
use crate::stage::{BoxedStage, Stage};
use crate::table::Table;

/// An ordered sequence of stages applied one after another.
///
/// Each stage receives the previous stage's output. The first failing stage aborts the run and
/// its error is returned unchanged. An empty pipeline returns its input.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<BoxedStage>,
}

impl Pipeline {
    pub fn new(stages: Vec<BoxedStage>) -> Self {
        Self { stages }
    }

    pub fn push<S: Stage + 'static>(&mut self, stage: S) {
        self.stages.extend(stage.into_stages());
    }

    pub fn stages(&self) -> &[BoxedStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Names of the member stages, in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }
}

impl Stage for Pipeline {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn check(&self, _table: &Table) -> Result<()> {
        Err(StageError::Unsupported {
            stage: "pipeline",
            operation: "check",
        })
    }

    fn op(&self, _table: &Table) -> Result<Table> {
        Err(StageError::Unsupported {
            stage: "pipeline",
            operation: "op",
        })
    }

    fn apply(&self, table: &Table) -> Result<Table> {
        let mut current = table.clone();
        for (position, stage) in self.stages.iter().enumerate() {
            current = stage.apply(&current)?;
            let (rows, columns) = current.shape();
            trace!(position, stage = stage.name(), rows, columns, "stage applied");
        }
        Ok(current)
    }

    fn into_stages(self) -> Vec<BoxedStage> {
        self.stages
    }
}

impl FromIterator<BoxedStage> for Pipeline {
    fn from_iter<I: IntoIterator<Item = BoxedStage>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S: Stage + 'static> Add<S> for Pipeline {
    type Output = Pipeline;

    fn add(self, rhs: S) -> Pipeline {
        self.then(rhs)
    }
}

/// Wraps a stage for storage in a [`Pipeline`].
pub fn boxed<S: Stage + 'static>(stage: S) -> BoxedStage {
    Arc::new(stage)
}
