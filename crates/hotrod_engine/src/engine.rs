use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use hotrod_core::{
    update, AppState, DialogCallStyle, Effect, FetcherConfig, HostToUi, InboundPort, Msg,
    OutboundPort, RequestId, UiToHost,
};
use hotrod_logging::{hotrod_debug, hotrod_error, hotrod_info, hotrod_warn};
use tokio::sync::{mpsc, oneshot};

use crate::link::{HostEnvelope, HostPort, ReplyTo};
use crate::manifest::{ManifestReader, MANIFEST_FILENAME};
use crate::read::{read_file_record, resolve_target};

/// The embedded UI component's outbound side.
pub trait PortSink: Send + Sync {
    fn send(&self, port: OutboundPort);
    /// Throw away the rendered UI and load it again.
    fn reload(&self);
}

#[derive(Debug, Clone)]
pub struct UiEngineSettings {
    pub install_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub fetcher: FetcherConfig,
    pub call_style: DialogCallStyle,
}

impl UiEngineSettings {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        let install_dir = install_dir.into();
        Self {
            manifest_path: install_dir.join(MANIFEST_FILENAME),
            install_dir,
            fetcher: FetcherConfig::default(),
            call_style: DialogCallStyle::default(),
        }
    }
}

enum UiInput {
    Port(InboundPort),
    Shutdown,
}

/// Handle to the UI process: one thread with its own single-threaded runtime.
pub struct UiEngine {
    input_tx: mpsc::UnboundedSender<UiInput>,
    host_tx: mpsc::UnboundedSender<HostToUi>,
    thread: Option<JoinHandle<()>>,
}

impl UiEngine {
    pub fn spawn(
        settings: UiEngineSettings,
        host: Arc<dyn HostPort>,
        ports: Arc<dyn PortSink>,
    ) -> io::Result<Self> {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (host_tx, host_rx) = mpsc::unbounded_channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let event_tx = host_tx.clone();
        let thread = thread::Builder::new()
            .name("hotrod-ui".to_string())
            .spawn(move || {
                let (results_tx, results_rx) = mpsc::unbounded_channel();
                let ui_loop = UiLoop {
                    state: AppState::new(settings.fetcher),
                    settings,
                    host,
                    ports,
                    event_tx,
                    results_tx,
                };
                runtime.block_on(ui_loop.run(input_rx, host_rx, results_rx));
            })?;

        Ok(Self {
            input_tx,
            host_tx,
            thread: Some(thread),
        })
    }

    /// Forwards a message from the UI component. False once the loop is gone.
    pub fn send_port(&self, port: InboundPort) -> bool {
        self.input_tx.send(UiInput::Port(port)).is_ok()
    }

    /// Asks the UI process to reload its surface. False once the loop is gone.
    pub fn reload(&self) -> bool {
        self.host_tx.send(HostToUi::Reload).is_ok()
    }

    pub fn is_alive(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
            && !self.input_tx.is_closed()
    }

    /// Stops the loop and waits for the thread to finish.
    pub fn close(mut self) {
        let _ = self.input_tx.send(UiInput::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                hotrod_error!("UI process ended with a panic");
            }
        }
    }
}

impl Drop for UiEngine {
    fn drop(&mut self) {
        let _ = self.input_tx.send(UiInput::Shutdown);
    }
}

struct UiLoop {
    state: AppState,
    settings: UiEngineSettings,
    host: Arc<dyn HostPort>,
    ports: Arc<dyn PortSink>,
    /// Our own inbound stream, handed to the host for event-style replies.
    event_tx: mpsc::UnboundedSender<HostToUi>,
    /// Completed IO posts its message back here.
    results_tx: mpsc::UnboundedSender<Msg>,
}

impl UiLoop {
    async fn run(
        mut self,
        mut input_rx: mpsc::UnboundedReceiver<UiInput>,
        mut host_rx: mpsc::UnboundedReceiver<HostToUi>,
        mut results_rx: mpsc::UnboundedReceiver<Msg>,
    ) {
        hotrod_info!("UI process started");
        self.dispatch(Msg::UiLoaded);

        loop {
            let msg = tokio::select! {
                input = input_rx.recv() => match input {
                    Some(UiInput::Port(port)) => port_msg(port),
                    Some(UiInput::Shutdown) | None => break,
                },
                Some(event) = host_rx.recv() => self.host_msg(event),
                Some(msg) = results_rx.recv() => msg,
            };
            self.dispatch(msg);
        }

        hotrod_info!("UI process stopped");
    }

    fn host_msg(&self, event: HostToUi) -> Msg {
        match event {
            HostToUi::GetFileReply { request_id, paths } => {
                Msg::DialogReplied { request_id, paths }
            }
            HostToUi::Reload => {
                hotrod_info!("Reloading UI");
                self.ports.reload();
                Msg::UiLoaded
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        hotrod_debug!("UI msg {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::Deliver(port) => {
                hotrod_info!("Sending {} to UI", port.port_name());
                self.ports.send(port);
            }
            Effect::RequestDialog { request_id } => self.request_dialog(request_id),
            Effect::ReadFile { request_id, target } => {
                let path = resolve_target(&self.settings.install_dir, &target);
                let results_tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let result = read_file_record(&path).await;
                    if let Err(err) = &result {
                        hotrod_warn!("Request {} read failed: {}", request_id, err);
                    }
                    let _ = results_tx.send(Msg::FileRead { request_id, result });
                });
            }
            Effect::ReadManifest => {
                let reader = ManifestReader::new(self.settings.manifest_path.clone());
                let results_tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let record = reader.read().await;
                    let _ = results_tx.send(Msg::ManifestLoaded(record));
                });
            }
        }
    }

    fn request_dialog(&self, request_id: RequestId) {
        let request = UiToHost::GetFile { request_id };
        hotrod_info!("get-file {} sent ({:?})", request_id, self.settings.call_style);
        match self.settings.call_style {
            DialogCallStyle::Invoke => {
                let (reply_tx, reply_rx) = oneshot::channel();
                let envelope = HostEnvelope {
                    request,
                    reply_to: ReplyTo::Invoke(reply_tx),
                };
                if self.host.send(envelope).is_err() {
                    self.host_unavailable(request_id);
                    return;
                }
                let results_tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let msg = match reply_rx.await {
                        Ok(HostToUi::GetFileReply { request_id, paths }) => {
                            Msg::DialogReplied { request_id, paths }
                        }
                        Ok(HostToUi::Reload) | Err(_) => Msg::DialogUnavailable { request_id },
                    };
                    let _ = results_tx.send(msg);
                });
            }
            DialogCallStyle::Event => {
                let envelope = HostEnvelope {
                    request,
                    reply_to: ReplyTo::Event(self.event_tx.clone()),
                };
                if self.host.send(envelope).is_err() {
                    self.host_unavailable(request_id);
                }
            }
        }
    }

    fn host_unavailable(&self, request_id: RequestId) {
        hotrod_warn!("get-file {} could not reach the host", request_id);
        let _ = self.results_tx.send(Msg::DialogUnavailable { request_id });
    }
}

fn port_msg(port: InboundPort) -> Msg {
    match port {
        InboundPort::FetchFile { path } => Msg::FetchFileRequested { path },
        InboundPort::FetchPackageJson => Msg::ManifestRequested,
    }
}
