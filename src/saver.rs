//! Persistence of pipeline outputs and derived documents.
//!
//! Every file is pretty-printed UTF-8 JSON with 2-space indentation;
//! non-ASCII characters are written literally.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::ImportError;

/// Fallback file written when a run produced no outputs at all.
pub const RUN_RESPONSE_FILE: &str = "run_response.json";

/// Remove leftovers from a previous run and recreate the directory.
pub fn reset_dir(dir: &Path) -> Result<(), ImportError> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Serialize `value` as pretty JSON into `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ImportError> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body)?;
    Ok(())
}

/// Persist every pipeline output under `dir`, one file per output or per
/// list element, and return the written paths in output order.
///
/// A string output is parsed as JSON first; one that does not parse is kept
/// verbatim under a `raw` wrapper instead of aborting the save. A non-empty
/// array whose every element is an object becomes one numbered file per
/// element.
pub fn save_outputs(dir: &Path, outputs: &Map<String, Value>) -> Result<Vec<PathBuf>, ImportError> {
    let mut saved = Vec::new();
    for (name, value) in outputs {
        let safe_name = sanitize_filename(name);
        let value = normalize_output(value);

        if let Some(objects) = as_object_list(&value) {
            for (index, object) in objects.iter().enumerate() {
                let path = dir.join(format!("{safe_name}_{index}.json"));
                write_json(&path, object)?;
                info!("Saved {}", path.display());
                saved.push(path);
            }
        } else {
            let path = dir.join(format!("{safe_name}.json"));
            write_json(&path, &value)?;
            info!("Saved {}", path.display());
            saved.push(path);
        }
    }
    Ok(saved)
}

/// Write the full response document as the diagnostic fallback file.
pub fn save_run_response(dir: &Path, response: &Value) -> Result<PathBuf, ImportError> {
    let path = dir.join(RUN_RESPONSE_FILE);
    write_json(&path, response)?;
    Ok(path)
}

/// Write each collected log object as `item_<i>.json`, 0-indexed in
/// collection order.
pub fn save_objects(dir: &Path, objects: &[Value]) -> Result<Vec<PathBuf>, ImportError> {
    let mut saved = Vec::new();
    for (index, object) in objects.iter().enumerate() {
        let path = dir.join(format!("item_{index}.json"));
        write_json(&path, object)?;
        info!("Saved item JSON: {}", path.display());
        saved.push(path);
    }
    Ok(saved)
}

/// Reduce an output name to a filesystem-safe token. Every character outside
/// `[A-Za-z0-9_.-]` becomes an underscore; an empty name gets a generic one.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "output".to_string()
    } else {
        sanitized
    }
}

/// Parse embedded JSON strings; anything that fails to parse is kept
/// verbatim under a `raw` wrapper.
fn normalize_output(value: &Value) -> Value {
    match value {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|_| {
            warn!("Output is not JSON, wrapping as raw text");
            json!({ "raw": text })
        }),
        other => other.clone(),
    }
}

/// The elements of `value` when it is a non-empty array of objects.
fn as_object_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            Some(items)
        }
        _ => None,
    }
}
