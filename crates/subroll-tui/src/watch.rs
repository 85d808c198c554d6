//! Reload-on-change for the open file.
//!
//! Editors often save by writing a temp file and renaming it over the
//! original, which drops a watch placed on the file itself. We watch the
//! parent directory instead and filter events down to our file name.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use std::sync::mpsc;

pub struct FileWatch {
    // Dropping the watcher stops the event stream.
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<notify::Result<Event>>,
    file_name: OsString,
}

impl FileWatch {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("cannot watch {}: not a file path", path.display()))?
            .to_os_string();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(dir = %dir.display(), file = ?file_name, "watch: started");

        Ok(Self { _watcher: watcher, rx, file_name })
    }

    /// Drain pending events; true when any of them touched our file.
    pub fn changed(&self) -> bool {
        let mut changed = false;
        for res in self.rx.try_iter() {
            match res {
                Ok(event) if is_content_change(&event.kind) => {
                    if event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
                    {
                        changed = true;
                    }
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "watch: notify error"),
            }
        }
        changed
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
