use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

// ---------------------------------------------------------------------------
// CSV export of aggregate tables
// ---------------------------------------------------------------------------

/// Serialize an aggregate table to CSV text.  Columns and row order mirror
/// the on-screen table exactly; the header row comes from the field names.
pub fn table_to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("serializing CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .context("flushing CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// Ask for a target path and write the table there.  Returns the chosen path,
/// or `None` when the user cancels the dialog.
pub fn save_table_dialog<T: Serialize>(rows: &[T], default_name: &str) -> Result<Option<PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save CSV")
        .set_file_name(default_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return Ok(None);
    };

    let csv = table_to_csv(rows)?;
    std::fs::write(&path, csv).with_context(|| format!("writing {}", path.display()))?;
    Ok(Some(path))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
