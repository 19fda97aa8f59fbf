//! Script runner behind the `tree-edit` binary.
//!
//! A script is a JSON array. Each entry is one of:
//! - an operation object, applied as its own transaction;
//! - an array of operation objects, applied as one transaction;
//! - `"undo"`, `"redo"` or `"clear"`, acting on the history.

use serde_json::Value;
use thiserror::Error;

use crate::codec::json::{from_json, ops_from_json};
use crate::editor::{Editor, EditorOptions};
use crate::op::EditError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("step {step}: {source}")]
    Edit { step: usize, source: EditError },
    #[error("{0}")]
    Script(String),
}

/// Run `script_json` against `doc_json` and return the resulting document,
/// pretty-printed.
pub fn run_script(doc_json: &str, script_json: &str) -> Result<String, CliError> {
    run_script_with_options(doc_json, script_json, EditorOptions::default())
}

pub fn run_script_with_options(
    doc_json: &str,
    script_json: &str,
    options: EditorOptions,
) -> Result<String, CliError> {
    let doc: Value = serde_json::from_str(doc_json)?;
    let script: Value = serde_json::from_str(script_json)?;
    let steps = script
        .as_array()
        .ok_or_else(|| CliError::Script("script must be a JSON array".into()))?;

    let mut editor = Editor::with_options(doc, options);
    for (step, entry) in steps.iter().enumerate() {
        run_step(&mut editor, entry).map_err(|source| CliError::Edit { step, source })?;
    }
    Ok(serde_json::to_string_pretty(editor.doc())?)
}

fn run_step(editor: &mut Editor, entry: &Value) -> Result<(), EditError> {
    match entry {
        Value::String(cmd) => match cmd.as_str() {
            "undo" => {
                if !editor.undo()? {
                    log::info!("undo: nothing to undo");
                }
            }
            "redo" => {
                if !editor.redo()? {
                    log::info!("redo: nothing to redo");
                }
            }
            "clear" => editor.clear_history(),
            other => return Err(EditError::InvalidOp(format!("unknown command `{other}`"))),
        },
        Value::Array(_) => editor.execute(ops_from_json(entry)?)?,
        Value::Object(_) => editor.execute(vec![from_json(entry)?])?,
        _ => {
            return Err(EditError::InvalidOp(
                "script entry must be an operation, an array of operations or a command".into(),
            ))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryOptions;

    fn run(doc: &str, script: &str) -> Value {
        let out = run_script(doc, script).unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn single_ops() {
        let v = run(
            r#"{"name":"A","items":[1,2,3]}"#,
            r#"[{"op":"set","address":"name","value":"B"},
                {"op":"splice","address":"items","start":0,"deleteCount":1}]"#,
        );
        assert_eq!(v, serde_json::json!({"name": "B", "items": [2, 3]}));
    }

    #[test]
    fn grouped_ops_undo_together() {
        let v = run(
            r#"{"a":1,"b":1}"#,
            r#"[[{"op":"set","address":"a","value":2},{"op":"set","address":"b","value":2}],"undo"]"#,
        );
        assert_eq!(v, serde_json::json!({"a": 1, "b": 1}));
    }

    #[test]
    fn undo_redo_and_clear() {
        let script = r#"[
            {"op":"set","address":"n","value":1},
            {"op":"set","address":"n","value":2},
            "undo", "undo", "redo",
            "clear", "undo"
        ]"#;
        assert_eq!(run(r#"{"n":0}"#, script), serde_json::json!({"n": 1}));
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        assert_eq!(run(r#"[1]"#, r#"["undo","redo"]"#), serde_json::json!([1]));
    }

    #[test]
    fn capacity_option() {
        let options = EditorOptions {
            history: HistoryOptions { capacity: 1 },
        };
        let script = r#"[
            {"op":"set","address":"n","value":1},
            {"op":"set","address":"n","value":2},
            "undo", "undo"
        ]"#;
        let out = run_script_with_options(r#"{"n":0}"#, script, options).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v, serde_json::json!({"n": 1}));
    }

    #[test]
    fn failing_step_reports_index() {
        let err = run_script(
            r#"{"a":1}"#,
            r#"[{"op":"set","address":"a","value":2},{"op":"set","address":"missing","value":0}]"#,
        )
        .unwrap_err();
        match err {
            CliError::Edit { step, source } => {
                assert_eq!(step, 1);
                assert!(matches!(source, EditError::AddressNotFound(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_input() {
        assert!(matches!(run_script("{", "[]"), Err(CliError::Json(_))));
        assert!(matches!(run_script("{}", "{}"), Err(CliError::Script(_))));
        assert!(matches!(run_script("{}", r#"["jump"]"#), Err(CliError::Edit { .. })));
        assert!(matches!(run_script("{}", "[42]"), Err(CliError::Edit { .. })));
    }
}
