//! JSON export of the current view model.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};

use crate::data::ViewModel;

/// Build the export document: a summary block plus the full view model.
pub fn to_json(view: &ViewModel) -> Result<Value> {
    let summary = json!({
        "total_barrels": view.barrel_cards.len(),
        "active": view.healthy_count(),
        "offline": view.offline_count(),
        "total_requests": view.total_requests(),
    });

    let mut export = serde_json::Map::new();
    export.insert("summary".to_string(), summary);
    if let Value::Object(fields) = serde_json::to_value(view)? {
        export.extend(fields);
    }
    Ok(Value::Object(export))
}

/// Write the export document to `path`.
pub fn write_view(view: &ViewModel, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&to_json(view)?)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
