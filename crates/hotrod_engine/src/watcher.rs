use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use hotrod_logging::{hotrod_debug, hotrod_info, hotrod_warn};
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Fixed set of asset paths whose change triggers a UI reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSet {
    paths: BTreeSet<PathBuf>,
}

impl WatchSet {
    /// Resolves `assets` against `root`. The root is canonicalized when it
    /// exists so that paths match what the OS reports.
    pub fn resolve<I, P>(root: &Path, assets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        Self {
            paths: assets.into_iter().map(|asset| root.join(asset)).collect(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
            || path
                .canonicalize()
                .is_ok_and(|canonical| self.paths.contains(&canonical))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Parent directories to watch; watching directories rather than the
    /// files survives editors that save by replacing the file.
    fn directories(&self) -> BTreeSet<PathBuf> {
        self.paths
            .iter()
            .filter_map(|path| path.parent().map(Path::to_path_buf))
            .collect()
    }
}

/// The watched asset an event touched, if the event is a content change.
///
/// Metadata-only and access events never count.
pub fn changed_asset(watch_set: &WatchSet, event: &Event) -> Option<PathBuf> {
    let is_change = match event.kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Access(_) | EventKind::Remove(_) | EventKind::Any | EventKind::Other => false,
    };
    if !is_change {
        return None;
    }
    event
        .paths
        .iter()
        .find(|path| watch_set.contains(path))
        .cloned()
}

struct ReloadFilter<F> {
    watch_set: WatchSet,
    on_change: F,
}

impl<F: Fn(PathBuf)> ReloadFilter<F> {
    /// At most one callback per notify event.
    fn handle(&self, res: notify::Result<Event>) {
        match res {
            Ok(event) => {
                if let Some(path) = changed_asset(&self.watch_set, &event) {
                    hotrod_debug!("Watched asset changed: {:?} ({:?})", path, event.kind);
                    (self.on_change)(path);
                }
            }
            Err(err) => hotrod_warn!("File watch error: {}", err),
        }
    }
}

/// Watches the asset set and calls back on every change.
///
/// Coalescing is whatever the platform backend does; events it drops are lost.
pub struct ReloadWatcher {
    _watcher: RecommendedWatcher,
}

impl ReloadWatcher {
    pub fn start<F>(watch_set: WatchSet, on_change: F) -> Result<Self, notify::Error>
    where
        F: Fn(PathBuf) + Send + 'static,
    {
        let directories = watch_set.directories();
        let watched = watch_set.len();
        let filter = ReloadFilter {
            watch_set,
            on_change,
        };
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| filter.handle(res),
            Config::default(),
        )?;
        for dir in directories {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        }
        hotrod_info!("Watching {} assets for reload", watched);
        Ok(Self { _watcher: watcher })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RenameMode};
    use std::cell::RefCell;

    fn event(kind: EventKind, paths: Vec<PathBuf>) -> Event {
        Event {
            kind,
            paths,
            attrs: Default::default(),
        }
    }

    fn content_change(path: PathBuf) -> Event {
        event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), vec![path])
    }

    fn abc(root: &Path) -> WatchSet {
        WatchSet::resolve(root, ["a.html", "b.js", "c.css"])
    }

    #[test]
    fn content_and_create_events_on_watched_paths_count() {
        let set = abc(Path::new("/project"));
        let b = PathBuf::from("/project/b.js");

        assert_eq!(changed_asset(&set, &content_change(b.clone())), Some(b.clone()));
        assert_eq!(
            changed_asset(
                &set,
                &event(EventKind::Create(CreateKind::File), vec![b.clone()])
            ),
            Some(b.clone())
        );
        assert_eq!(
            changed_asset(
                &set,
                &event(
                    EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
                    vec![PathBuf::from("/project/.b.js.swp"), b.clone()]
                )
            ),
            Some(b)
        );
    }

    #[test]
    fn unwatched_and_metadata_events_are_ignored() {
        let set = abc(Path::new("/project"));

        assert_eq!(
            changed_asset(&set, &content_change(PathBuf::from("/project/d.txt"))),
            None
        );
        assert_eq!(
            changed_asset(
                &set,
                &event(
                    EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)),
                    vec![PathBuf::from("/project/a.html")]
                )
            ),
            None
        );
        assert_eq!(
            changed_asset(
                &set,
                &event(
                    EventKind::Remove(notify::event::RemoveKind::File),
                    vec![PathBuf::from("/project/a.html")]
                )
            ),
            None
        );
    }

    #[test]
    fn one_event_touching_several_assets_reloads_once() {
        let calls = RefCell::new(Vec::new());
        let filter = ReloadFilter {
            watch_set: abc(Path::new("/project")),
            on_change: |path: PathBuf| calls.borrow_mut().push(path),
        };

        filter.handle(Ok(event(
            EventKind::Modify(ModifyKind::Any),
            vec![
                PathBuf::from("/project/a.html"),
                PathBuf::from("/project/b.js"),
            ],
        )));
        filter.handle(Ok(content_change(PathBuf::from("/project/d.txt"))));
        filter.handle(Err(notify::Error::generic("queue overflow")));

        assert_eq!(calls.into_inner(), vec![PathBuf::from("/project/a.html")]);
    }

    #[test]
    fn relative_assets_resolve_against_root() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let root = dir.path().canonicalize().expect("canonical root");
        std::fs::write(root.join("index.html"), "<html/>").expect("write asset");

        let set = WatchSet::resolve(dir.path(), ["index.html", "styles.css"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&root.join("index.html")));
        assert!(set.contains(&root.join("styles.css")));
        assert_eq!(set.directories(), BTreeSet::from([root]));
    }

    #[test]
    fn live_watcher_reloads_for_watched_asset_only() {
        use std::sync::mpsc;
        use std::time::Duration;

        let dir = tempfile::tempdir().expect("create tempdir");
        let root = dir.path().canonicalize().expect("canonical root");
        for name in ["a.html", "b.js", "c.css", "d.txt"] {
            std::fs::write(root.join(name), "initial").expect("write asset");
        }

        let (tx, rx) = mpsc::channel();
        let _watcher = ReloadWatcher::start(abc(&root), move |path| {
            let _ = tx.send(path);
        })
        .expect("start watcher");

        std::fs::write(root.join("b.js"), "changed").expect("modify b");
        let changed = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("change to b reported");
        assert_eq!(changed, root.join("b.js"));
        // One write can surface as several backend events.
        while rx.recv_timeout(Duration::from_millis(300)).is_ok() {}

        std::fs::write(root.join("d.txt"), "changed").expect("modify d");
        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    }

    #[test]
    fn start_fails_for_missing_directory() {
        let set = WatchSet::resolve(Path::new("/definitely/not/here"), ["index.html"]);
        assert!(ReloadWatcher::start(set, |_| {}).is_err());
    }
}
