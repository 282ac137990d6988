use crate::{AppState, BusyPolicy, Effect, FileError, ManifestTrigger, Msg, OutboundPort};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UiLoaded => match state.config().manifest_trigger {
            ManifestTrigger::OnLoad => vec![Effect::ReadManifest],
            ManifestTrigger::OnDemand => Vec::new(),
        },
        Msg::ManifestRequested => vec![Effect::ReadManifest],
        Msg::ManifestLoaded(record) => vec![Effect::Deliver(OutboundPort::PackageJson(record))],
        Msg::FetchFileRequested { path } => {
            if state.is_idle() {
                vec![state.begin_fetch(path)]
            } else {
                match state.config().busy_policy {
                    BusyPolicy::Queue if state.queue_full() => {
                        vec![Effect::Deliver(OutboundPort::FileError(FileError::busy()))]
                    }
                    BusyPolicy::Queue => {
                        state.enqueue(path);
                        Vec::new()
                    }
                    BusyPolicy::Reject => {
                        vec![Effect::Deliver(OutboundPort::FileError(FileError::busy()))]
                    }
                }
            }
        }
        Msg::DialogReplied { request_id, paths } => {
            // Replies for anything but the request in flight are stale.
            if !state.awaiting_dialog(request_id) {
                return (state, Vec::new());
            }
            match paths.into_iter().next() {
                Some(path) => vec![state.start_reading(request_id, path)],
                None => state.deliver(OutboundPort::FileError(FileError::cancelled())),
            }
        }
        Msg::DialogUnavailable { request_id } => {
            if !state.awaiting_dialog(request_id) {
                return (state, Vec::new());
            }
            state.deliver(OutboundPort::FileError(FileError::host_unavailable()))
        }
        Msg::FileRead { request_id, result } => {
            if !state.awaiting_read(request_id) {
                return (state, Vec::new());
            }
            let port = match result {
                Ok(record) => OutboundPort::File(record),
                Err(error) => OutboundPort::FileError(error),
            };
            state.deliver(port)
        }
    };

    (state, effects)
}
