use std::path::PathBuf;

use hotrod_core::{HostToUi, UiToHost};
use hotrod_logging::{hotrod_info, hotrod_warn};

use crate::link::HostEnvelope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl DialogFilter {
    pub fn json() -> Self {
        Self {
            name: "JSON".to_string(),
            extensions: vec!["json".to_string()],
        }
    }
}

/// A native, modal "open existing file" dialog.
pub trait FileDialog {
    /// Blocks until the user picks or cancels. Cancel is an empty result.
    fn show_open(&self, filter: &DialogFilter) -> Vec<PathBuf>;
}

/// Host-side handler for `get-file` requests.
pub struct FileDialogBroker<D> {
    dialog: D,
    filter: DialogFilter,
}

impl<D: FileDialog> FileDialogBroker<D> {
    pub fn new(dialog: D, filter: DialogFilter) -> Self {
        Self { dialog, filter }
    }

    /// Runs the dialog and answers the requester that sent `envelope`.
    pub fn handle(&self, envelope: HostEnvelope) {
        let HostEnvelope { request, reply_to } = envelope;
        match request {
            UiToHost::GetFile { request_id } => {
                let mut paths = self.dialog.show_open(&self.filter);
                // Single selection only, whatever the backend allows.
                paths.truncate(1);
                match paths.first() {
                    Some(path) => hotrod_info!("get-file {} selected {:?}", request_id, path),
                    None => hotrod_info!("get-file {} cancelled", request_id),
                }
                if reply_to
                    .send(HostToUi::GetFileReply { request_id, paths })
                    .is_err()
                {
                    hotrod_warn!("get-file {} requester is gone; reply dropped", request_id);
                }
            }
        }
    }
}
