use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct StageDescriptor {
    pub code: &'static str,
    pub checks_columns: bool,
    pub configurable: bool,
    pub description: &'static str,
}

static STAGES: Lazy<Vec<StageDescriptor>> = Lazy::new(|| {
    vec![
        StageDescriptor {
            code: "transform_col",
            checks_columns: true,
            configurable: false,
            description: "Replace a column element-wise with a function",
        },
        StageDescriptor {
            code: "expr_assign",
            checks_columns: false,
            configurable: true,
            description: "Assign a new or existing column from an expression",
        },
        StageDescriptor {
            code: "filter",
            checks_columns: true,
            configurable: false,
            description: "Keep rows whose column value satisfies a predicate",
        },
        StageDescriptor {
            code: "reset_index",
            checks_columns: false,
            configurable: true,
            description: "Relabel rows from zero, optionally keeping the old labels",
        },
        StageDescriptor {
            code: "drop_cols",
            checks_columns: true,
            configurable: true,
            description: "Remove columns",
        },
        StageDescriptor {
            code: "rename_cols",
            checks_columns: false,
            configurable: true,
            description: "Rename columns by mapping or position",
        },
        StageDescriptor {
            code: "reorder_cols",
            checks_columns: false,
            configurable: true,
            description: "Reorder all columns",
        },
        StageDescriptor {
            code: "quick_eval",
            checks_columns: true,
            configurable: true,
            description: "Keep rows matching `<field><expr>`",
        },
        StageDescriptor {
            code: "log_shape",
            checks_columns: false,
            configurable: true,
            description: "Log a message with the table shape",
        },
        StageDescriptor {
            code: "log",
            checks_columns: false,
            configurable: true,
            description: "Log a message",
        },
    ]
});

pub fn all_stage_descriptors() -> &'static [StageDescriptor] {
    STAGES.as_slice()
}

pub fn find_stage_descriptor(code: &str) -> Option<&'static StageDescriptor> {
    STAGES.iter().find(|descriptor| descriptor.code == code)
}
