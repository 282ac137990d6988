//! Hotrod core: pure file-fetch state machine and the typed messages that
//! cross the host/UI boundary.
mod effect;
mod msg;
mod policy;
mod record;
mod state;
mod update;
mod wire;

pub use effect::{Effect, ReadTarget};
pub use msg::Msg;
pub use policy::{BusyPolicy, DialogCallStyle, FetcherConfig, ManifestTrigger};
pub use record::{extension_of, file_name_of, FileError, FileErrorKind, FileRecord, ManifestRecord};
pub use state::{AppState, FetchPhase, FetcherView, RequestId, MAX_QUEUED};
pub use update::update;
pub use wire::{HostToUi, InboundPort, OutboundPort, UiToHost};
