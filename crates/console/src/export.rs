//! Class timetable export.
//!
//! The server renders the document; the console only downloads it.

use std::path::{Path, PathBuf};

use timetable_client::TimetableApi;
use timetable_core::types::DbId;

use crate::error::ConsoleResult;

/// `timetable_class_{id}.pdf`.
pub fn export_file_name(class_id: DbId) -> String {
    format!("timetable_class_{class_id}.pdf")
}

/// Download the export for `class_id` into `dir`, returning the written path.
pub async fn export_class(api: &TimetableApi, class_id: DbId, dir: &Path) -> ConsoleResult<PathBuf> {
    let bytes = api.download_export(class_id).await?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(class_id));
    tokio::fs::write(&path, &bytes).await?;

    tracing::info!(
        class_id,
        path = %path.display(),
        bytes = bytes.len(),
        "Exported timetable"
    );
    Ok(path)
}
