use serde::{Deserialize, Serialize};

/// When the manifest is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ManifestTrigger {
    /// Read whenever the UI loads or reloads, and on explicit request.
    #[default]
    OnLoad,
    /// Read only on an explicit `fetchPackageJson`.
    OnDemand,
}

/// What happens to a file request that arrives while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BusyPolicy {
    /// Run it after the current request delivers.
    #[default]
    Queue,
    /// Answer it at once with a `busy` error.
    Reject,
}

/// How `get-file-reply` travels back to the requesting UI process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DialogCallStyle {
    /// Request/immediate-return: the host answers on a reply slot owned by
    /// the request.
    #[default]
    Invoke,
    /// The host posts the reply as an event on the UI's inbound stream.
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetcherConfig {
    pub manifest_trigger: ManifestTrigger,
    pub busy_policy: BusyPolicy,
}
