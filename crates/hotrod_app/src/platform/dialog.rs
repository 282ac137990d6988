use std::path::PathBuf;

use hotrod_engine::{DialogFilter, FileDialog};

/// The platform's open-file dialog. `pick_file` only ever allows one selection.
pub struct NativeDialog;

impl FileDialog for NativeDialog {
    fn show_open(&self, filter: &DialogFilter) -> Vec<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter.name.as_str(), &filter.extensions[..])
            .pick_file()
            .into_iter()
            .collect()
    }
}
