//! Hotrod engine: file IO, the host/UI link and the effect-executing UI loop.
mod decode;
mod dialog;
mod engine;
mod link;
mod manifest;
mod read;
mod watcher;

pub use decode::{decode_utf8, strip_bom, DecodeError};
pub use dialog::{DialogFilter, FileDialog, FileDialogBroker};
pub use engine::{PortSink, UiEngine, UiEngineSettings};
pub use link::{HostEnvelope, HostPort, LinkClosed, ReplyTo};
pub use manifest::{parse_manifest, ManifestReader, MANIFEST_FILENAME};
pub use read::{read_file_record, resolve_target};
pub use watcher::{changed_asset, ReloadWatcher, WatchSet};
