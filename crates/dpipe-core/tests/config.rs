use anyhow::Result;
use dpipe_core::registry::{all_stage_descriptors, find_stage_descriptor};
use dpipe_core::stages::{ColumnNames, ExprAssign, QuickEval, ResetIndex};
use dpipe_core::{ConfigError, PipelineConfig, Stage, StageConfig, Table};
use polars::prelude::*;

const EXAMPLE: &str = r#"
name = "quick_eval_example"

[[stages]]
stage = "log_shape"
msg = "Initial shape:"

[[stages]]
stage = "quick_eval"
field = "a"
expr = ">2"

[[stages]]
stage = "expr_assign"
field = "b"
expr = "a * 2"

[[stages]]
stage = "reset_index"
drop = false

[[stages]]
stage = "rename_cols"
names = { b = "doubled" }

[[stages]]
stage = "reorder_cols"
order = ["doubled", "index", "a"]

[[stages]]
stage = "log"
msg = "Done."
"#;

#[test]
fn parses_every_stage_kind() -> Result<()> {
    let config: PipelineConfig = EXAMPLE.parse()?;
    assert_eq!(config.name.as_deref(), Some("quick_eval_example"));
    assert_eq!(config.stages.len(), 7);
    assert_eq!(
        config.stages[3],
        StageConfig::ResetIndex {
            drop: false,
            name: None
        }
    );
    match &config.stages[4] {
        StageConfig::RenameCols {
            names: ColumnNames::Mapping(map),
        } => assert_eq!(map.get("b").map(String::as_str), Some("doubled")),
        other => panic!("unexpected stage: {other:?}"),
    }
    Ok(())
}

#[test]
fn positional_names_parse_as_a_list() -> Result<()> {
    let config: PipelineConfig = r#"
        [[stages]]
        stage = "rename_cols"
        names = ["x", "y"]
    "#
    .parse()?;
    assert_eq!(
        config.stages,
        [StageConfig::RenameCols {
            names: ColumnNames::Positional(vec!["x".into(), "y".into()]),
        }]
    );
    Ok(())
}

#[test]
fn configured_pipeline_matches_hand_built_one() -> Result<()> {
    let input = Table::new(df!("a" => [1i64, 2, 3, 4, -1])?);

    let configured = EXAMPLE.parse::<PipelineConfig>()?.build().apply(&input)?;

    let hand_built = QuickEval::new("a", ">2")
        .then(ExprAssign::new("b", "a * 2"))
        .then(ResetIndex::new().drop(false))
        .apply(&input)?;

    assert_eq!(configured.column_names(), ["doubled", "index", "a"]);
    assert!(configured
        .frame()
        .column("doubled")?
        .as_materialized_series()
        .equals(hand_built.frame().column("b")?.as_materialized_series()));
    assert_eq!(configured.index(), hand_built.index());
    Ok(())
}

#[test]
fn reset_index_defaults_to_dropping_labels() -> Result<()> {
    let config: PipelineConfig = "[[stages]]\nstage = \"reset_index\"\n".parse()?;
    assert_eq!(
        config.stages,
        [StageConfig::ResetIndex {
            drop: true,
            name: None
        }]
    );
    Ok(())
}

#[test]
fn unknown_stage_kinds_fail_to_parse() {
    let err = "[[stages]]\nstage = \"explode\"\n"
        .parse::<PipelineConfig>()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_files_report_the_path() {
    let err = PipelineConfig::from_path("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("does/not/exist.toml"));
}

#[test]
fn configured_stages_are_registered() -> Result<()> {
    let pipeline = EXAMPLE.parse::<PipelineConfig>()?.build();
    for name in pipeline.stage_names() {
        let descriptor = find_stage_descriptor(name).expect("stage registered");
        assert!(descriptor.configurable, "{name} should be configurable");
    }
    assert_eq!(all_stage_descriptors().len(), 10);
    Ok(())
}
