use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use anyhow::{anyhow, Context};
use hotrod_core::InboundPort;
use hotrod_engine::{
    DialogFilter, FileDialog, FileDialogBroker, HostEnvelope, HostPort, LinkClosed, PortSink,
    ReloadWatcher, UiEngine, UiEngineSettings, WatchSet,
};
use hotrod_logging::{hotrod_debug, hotrod_error, hotrod_info, hotrod_warn};

use super::config::{self, ShellConfig, WindowConfig};
use super::dialog::NativeDialog;
use super::lifecycle::{AllClosed, Lifecycle};
use super::logging::{self, LogDestination};
use super::navigation::{redirect_navigation, ExternalOpener, SystemOpener};
use super::surface::{self, TerminalSurface};

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::Both);

    let install_dir = install_dir()?;
    let config = config::load(&install_dir);
    let (events_tx, events_rx) = mpsc::channel::<HostEvent>();

    let _watcher = start_watcher(&config, &install_dir, events_tx.clone());
    surface::spawn_input_reader(events_tx.clone()).context("starting UI surface input")?;

    let ports: Arc<dyn PortSink> = Arc::new(TerminalSurface);
    let mut shell = HostShell::new(
        config,
        &install_dir,
        NativeDialog,
        SystemOpener,
        ports,
        events_tx,
    );
    shell.create_window().context("creating the UI process")?;
    shell.run(events_rx);

    hotrod_info!("Hotrod shell exiting");
    Ok(())
}

fn install_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locating the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("executable {:?} has no parent directory", exe))
}

fn start_watcher(
    config: &ShellConfig,
    install_dir: &Path,
    events: mpsc::Sender<HostEvent>,
) -> Option<ReloadWatcher> {
    if !config.live_reload {
        return None;
    }
    let watch_set = WatchSet::resolve(&config.project_root(install_dir), &config.watched_assets);
    if watch_set.is_empty() {
        hotrod_info!("No watched assets; live reload off");
        return None;
    }
    let on_change = move |path: PathBuf| {
        let _ = events.send(HostEvent::AssetChanged(path));
    };
    match ReloadWatcher::start(watch_set, on_change) {
        Ok(watcher) => Some(watcher),
        Err(err) => {
            hotrod_warn!("Live reload disabled: {}", err);
            None
        }
    }
}

/// Everything the host loop reacts to.
#[derive(Debug)]
pub enum HostEvent {
    /// A request from the UI process.
    Ui(HostEnvelope),
    /// A message from the UI component for the UI process.
    Port(InboundPort),
    WindowClosed,
    Activate,
    WillNavigate(String),
    AssetChanged(PathBuf),
    Quit,
}

/// The UI process's view of the host: requests queue on the host loop.
struct HostMailbox(mpsc::Sender<HostEvent>);

impl HostPort for HostMailbox {
    fn send(&self, envelope: HostEnvelope) -> Result<(), LinkClosed> {
        self.0.send(HostEvent::Ui(envelope)).map_err(|_| LinkClosed)
    }
}

pub struct HostShell<D, O> {
    window_config: WindowConfig,
    settings: UiEngineSettings,
    lifecycle: Lifecycle<UiEngine>,
    broker: FileDialogBroker<D>,
    opener: O,
    ports: Arc<dyn PortSink>,
    events: mpsc::Sender<HostEvent>,
}

impl<D: FileDialog, O: ExternalOpener> HostShell<D, O> {
    pub fn new(
        config: ShellConfig,
        install_dir: &Path,
        dialog: D,
        opener: O,
        ports: Arc<dyn PortSink>,
        events: mpsc::Sender<HostEvent>,
    ) -> Self {
        Self {
            settings: config.engine_settings(install_dir),
            lifecycle: Lifecycle::new(config.keep_alive()),
            window_config: config.window,
            broker: FileDialogBroker::new(dialog, DialogFilter::json()),
            opener,
            ports,
            events,
        }
    }

    /// Starts a fresh UI process for the window.
    pub fn create_window(&mut self) -> io::Result<()> {
        let window = &self.window_config;
        hotrod_info!(
            "Creating window {:?} {}x{} (icon {:?})",
            window.title,
            window.width,
            window.height,
            window.icon
        );
        let host = Arc::new(HostMailbox(self.events.clone()));
        let engine = UiEngine::spawn(self.settings.clone(), host, self.ports.clone())?;
        if let Some(previous) = self.lifecycle.window_created(engine) {
            previous.close();
        }
        Ok(())
    }

    pub fn run(mut self, events: mpsc::Receiver<HostEvent>) {
        while let Ok(event) = events.recv() {
            if self.handle(event).is_break() {
                break;
            }
        }
        if let Some(window) = self.lifecycle.window_closed() {
            window.close();
        }
    }

    pub fn handle(&mut self, event: HostEvent) -> ControlFlow<()> {
        match event {
            HostEvent::Ui(envelope) => self.answer_request(envelope),
            HostEvent::Port(port) => self.forward_port(port),
            HostEvent::WindowClosed => return self.close_window(),
            HostEvent::Activate => self.activate(),
            HostEvent::WillNavigate(target) => match redirect_navigation(&self.opener, &target) {
                Ok(url) => hotrod_info!("Opened {} externally", url),
                Err(err) => hotrod_warn!("Navigation blocked: {}", err),
            },
            HostEvent::AssetChanged(path) => self.reload(&path),
            HostEvent::Quit => {
                hotrod_info!("Quit requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    pub fn has_window(&self) -> bool {
        self.lifecycle.window().is_some()
    }

    /// The current window, after dropping it if its UI process died.
    fn live_window(&mut self) -> Option<&UiEngine> {
        if self.lifecycle.window().is_some_and(|window| !window.is_alive()) {
            hotrod_error!("UI process died; its window is gone until reactivated");
            if let Some(window) = self.lifecycle.window_closed() {
                window.close();
            }
        }
        self.lifecycle.window()
    }

    fn answer_request(&mut self, envelope: HostEnvelope) {
        if self.live_window().is_some() {
            self.broker.handle(envelope);
        } else {
            // Dropping the envelope tells the requester, if any, that no answer is coming.
            hotrod_warn!("No window; dropping {:?}", envelope.request);
        }
    }

    fn forward_port(&mut self, port: InboundPort) {
        match self.live_window() {
            Some(window) => {
                if !window.send_port(port) {
                    hotrod_warn!("UI process stopped before taking the message");
                }
            }
            None => hotrod_warn!("No window; dropping {:?}", port),
        }
    }

    fn reload(&mut self, path: &Path) {
        match self.live_window() {
            Some(window) => {
                hotrod_info!("{:?} changed; reloading UI", path);
                window.reload();
            }
            None => hotrod_debug!("{:?} changed with no UI alive; ignored", path),
        }
    }

    fn close_window(&mut self) -> ControlFlow<()> {
        if let Some(window) = self.lifecycle.window_closed() {
            hotrod_info!("Window closed");
            window.close();
        }
        // Single-window shell: the window closing means all windows closed.
        match self.lifecycle.all_windows_closed() {
            AllClosed::Quit => {
                hotrod_info!("All windows closed; quitting");
                ControlFlow::Break(())
            }
            AllClosed::StayAlive => {
                hotrod_info!("All windows closed; staying alive");
                ControlFlow::Continue(())
            }
        }
    }

    fn activate(&mut self) {
        // A crashed UI process leaves no window behind.
        let _ = self.live_window();
        if !self.lifecycle.should_recreate_on_activate() {
            return;
        }
        if let Err(err) = self.create_window() {
            hotrod_error!("Could not recreate window: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotrod_core::{ManifestTrigger, OutboundPort};
    use std::cell::RefCell;
    use std::fs;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use url::Url;

    const WAIT: Duration = Duration::from_secs(5);
    const QUIET: Duration = Duration::from_millis(200);

    #[derive(Debug, PartialEq)]
    enum Surface {
        Port(OutboundPort),
        Reload,
    }

    struct RecordingPorts {
        surface: mpsc::Sender<Surface>,
        /// Panics inside the UI process on the next delivery.
        crash_next: AtomicBool,
    }

    impl PortSink for RecordingPorts {
        fn send(&self, port: OutboundPort) {
            if self.crash_next.swap(false, Ordering::SeqCst) {
                panic!("surface crashed delivering {}", port.port_name());
            }
            let _ = self.surface.send(Surface::Port(port));
        }

        fn reload(&self) {
            let _ = self.surface.send(Surface::Reload);
        }
    }

    struct ScriptedDialog {
        answer: Vec<PathBuf>,
        shown: Arc<AtomicUsize>,
    }

    impl FileDialog for ScriptedDialog {
        fn show_open(&self, _filter: &DialogFilter) -> Vec<PathBuf> {
            self.shown.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    #[derive(Default)]
    struct RecordingOpener(RefCell<Vec<Url>>);

    impl ExternalOpener for RecordingOpener {
        fn open(&self, url: &Url) -> io::Result<()> {
            self.0.borrow_mut().push(url.clone());
            Ok(())
        }
    }

    struct Harness {
        shell: HostShell<ScriptedDialog, RecordingOpener>,
        events: mpsc::Receiver<HostEvent>,
        surface: mpsc::Receiver<Surface>,
        ports: Arc<RecordingPorts>,
        dialogs_shown: Arc<AtomicUsize>,
        _install: TempDir,
    }

    impl Harness {
        fn wait_for_ui_exit(&self) {
            let deadline = Instant::now() + WAIT;
            while self.shell.lifecycle.window().is_some_and(UiEngine::is_alive) {
                assert!(Instant::now() < deadline, "UI process never stopped");
                thread::sleep(Duration::from_millis(10));
            }
        }
    }

    fn harness(keep_alive: bool, answer: Vec<PathBuf>) -> Harness {
        hotrod_logging::initialize_for_tests();
        let install = TempDir::new().unwrap();
        let config = ShellConfig {
            keep_alive_without_windows: Some(keep_alive),
            manifest_trigger: ManifestTrigger::OnDemand,
            ..ShellConfig::default()
        };
        let (events_tx, events) = mpsc::channel();
        let (surface_tx, surface) = mpsc::channel();
        let ports = Arc::new(RecordingPorts {
            surface: surface_tx,
            crash_next: AtomicBool::new(false),
        });
        let dialogs_shown = Arc::new(AtomicUsize::new(0));
        let dialog = ScriptedDialog {
            answer,
            shown: dialogs_shown.clone(),
        };
        let shell = HostShell::new(
            config,
            install.path(),
            dialog,
            RecordingOpener::default(),
            ports.clone(),
            events_tx,
        );
        Harness {
            shell,
            events,
            surface,
            ports,
            dialogs_shown,
            _install: install,
        }
    }

    #[test]
    fn asset_change_with_live_ui_reloads_once() {
        let mut h = harness(false, Vec::new());
        h.shell.create_window().unwrap();

        let flow = h.shell.handle(HostEvent::AssetChanged(PathBuf::from("elm.js")));
        assert!(flow.is_continue());
        assert_eq!(h.surface.recv_timeout(WAIT).unwrap(), Surface::Reload);
        assert!(h.surface.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn asset_change_without_ui_is_a_quiet_noop() {
        let mut h = harness(true, Vec::new());
        assert!(!h.shell.has_window());

        let flow = h.shell.handle(HostEvent::AssetChanged(PathBuf::from("elm.js")));
        assert!(flow.is_continue());
        assert!(h.surface.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn closing_last_window_quits_without_keep_alive() {
        let mut h = harness(false, Vec::new());
        h.shell.create_window().unwrap();

        assert!(h.shell.handle(HostEvent::WindowClosed).is_break());
        assert!(!h.shell.has_window());
    }

    #[test]
    fn keep_alive_survives_close_and_activate_recreates() {
        let mut h = harness(true, Vec::new());
        h.shell.create_window().unwrap();

        assert!(h.shell.handle(HostEvent::WindowClosed).is_continue());
        assert!(!h.shell.has_window());

        // Reload after close reaches nobody.
        h.shell.handle(HostEvent::AssetChanged(PathBuf::from("index.html")));
        assert!(h.surface.recv_timeout(QUIET).is_err());

        assert!(h.shell.handle(HostEvent::Activate).is_continue());
        assert!(h.shell.has_window());
    }

    #[test]
    fn dialog_fetch_round_trips_through_host_loop() {
        let picked = TempDir::new().unwrap();
        let sample = picked.path().join("sample.json");
        fs::write(&sample, r#"{"a":1}"#).unwrap();

        let mut h = harness(false, vec![sample]);
        h.shell.create_window().unwrap();
        h.shell.handle(HostEvent::Port(InboundPort::FetchFile { path: None }));

        let request = h.events.recv_timeout(WAIT).expect("get-file reaches host");
        assert!(matches!(request, HostEvent::Ui(_)));
        h.shell.handle(request);

        match h.surface.recv_timeout(WAIT).unwrap() {
            Surface::Port(OutboundPort::File(record)) => {
                assert_eq!(record.name(), "sample.json");
                assert_eq!(record.extension(), ".json");
                assert_eq!(record.contents(), r#"{"a":1}"#);
            }
            other => panic!("expected file record, got {other:?}"),
        }
        assert_eq!(h.dialogs_shown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn request_from_closed_window_never_opens_a_dialog() {
        let mut h = harness(true, vec![PathBuf::from("/tmp/sample.json")]);
        h.shell.create_window().unwrap();
        h.shell.handle(HostEvent::Port(InboundPort::FetchFile { path: None }));
        let request = h.events.recv_timeout(WAIT).expect("get-file reaches host");

        assert!(h.shell.handle(HostEvent::WindowClosed).is_continue());
        h.shell.handle(request);

        assert_eq!(h.dialogs_shown.load(Ordering::SeqCst), 0);
        assert!(h.surface.recv_timeout(QUIET).is_err());
    }

    #[test]
    fn activate_recreates_window_after_ui_crash() {
        let mut h = harness(true, Vec::new());
        h.shell.create_window().unwrap();

        h.ports.crash_next.store(true, Ordering::SeqCst);
        h.shell.handle(HostEvent::Port(InboundPort::FetchPackageJson));
        h.wait_for_ui_exit();

        assert!(h.shell.handle(HostEvent::Activate).is_continue());
        let window = h.shell.lifecycle.window().expect("window recreated");
        assert!(window.is_alive());

        h.shell.handle(HostEvent::Port(InboundPort::FetchPackageJson));
        assert!(matches!(
            h.surface.recv_timeout(WAIT).unwrap(),
            Surface::Port(OutboundPort::PackageJson(Err(_)))
        ));
    }

    #[test]
    fn navigation_is_sent_to_external_handler() {
        let mut h = harness(false, Vec::new());

        h.shell
            .handle(HostEvent::WillNavigate("https://package.elm-lang.org".to_string()));
        h.shell.handle(HostEvent::WillNavigate("not a url".to_string()));

        let opened = h.shell.opener.0.borrow();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].host_str(), Some("package.elm-lang.org"));
    }

    #[test]
    fn quit_breaks_the_loop() {
        let mut h = harness(true, Vec::new());
        assert!(h.shell.handle(HostEvent::Quit).is_break());
    }
}
