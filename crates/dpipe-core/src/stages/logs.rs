use tracing::info;

use crate::error::Result;
use crate::stage::Stage;
use crate::table::Table;

/// Logs a message followed by the table's `(rows, columns)` shape.
#[derive(Debug, Clone, Default)]
pub struct LogShape {
    msg: String,
}

impl LogShape {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl Stage for LogShape {
    fn name(&self) -> &'static str {
        "log_shape"
    }

    fn op(&self, table: &Table) -> Result<Table> {
        let (rows, columns) = table.shape();
        let line = format!("{} ({rows}, {columns})", self.msg);
        info!(rows, columns, "{}", line.trim_start());
        Ok(table.clone())
    }
}

/// Logs a fixed message.
#[derive(Debug, Clone, Default)]
pub struct Log {
    msg: String,
}

impl Log {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl Stage for Log {
    fn name(&self) -> &'static str {
        "log"
    }

    fn op(&self, table: &Table) -> Result<Table> {
        info!("{}", self.msg);
        Ok(table.clone())
    }
}
