//! Headless collaborators for the replay driver.
//!
//! Each one logs what a real platform backend would have done and appends a
//! line to a shared [`Transcript`] so the driver can print it next to the
//! step that caused it.

use std::{mem, sync::Arc};

use config::Action;
use hintmap_engine::{
    ActionSink, ActivateError, Activator, Category, CursorRenderer, ElementHandle, ElementScan,
    LabelBox, OverlayRenderer, Rect, ScanFilter, Services, Target,
};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Ordered record of collaborator calls, shared by every collaborator.
#[derive(Clone, Default)]
pub struct Transcript(Arc<Mutex<Vec<String>>>);

impl Transcript {
    /// Append one line.
    fn push(&self, line: String) {
        self.0.lock().push(line);
    }

    /// Take every line recorded since the last drain.
    pub fn drain(&self) -> Vec<String> {
        mem::take(&mut *self.0.lock())
    }
}

/// Fake 1200x900 window of up to `count` elements in rows of twenty,
/// filtered like a real scan.
///
/// Every seventh element is a pane, which the filter rejects, so a window
/// holds at most 515 targets.
pub fn synthetic_window(count: usize) -> Vec<Target> {
    let window = Rect::new(0, 0, 1200, 900);
    let filter = ScanFilter::new(window);
    let mut out = Vec::new();
    let mut i: u64 = 0;
    while out.len() < count && i < 600 {
        let (col, row) = ((i % 20) as i32, (i / 20) as i32);
        let rect = Rect::new(col * 60, 4 + row * 30, 50 + col * 60, 28 + row * 30);
        let category = if i % 7 == 6 {
            Category::Pane
        } else if i % 3 == 0 {
            Category::Edit
        } else {
            Category::Button
        };
        if filter.accepts(&rect, category) {
            out.push(Target {
                handle: ElementHandle(i),
                rect,
                category,
            });
        }
        i += 1;
    }
    out
}

/// Scanner returning a fixed element list.
struct ScriptScan {
    /// Elements reported by every scan.
    targets: Vec<Target>,
    /// Shared record.
    transcript: Transcript,
}

impl ElementScan for ScriptScan {
    fn scan(&self) -> Vec<Target> {
        info!(found = self.targets.len(), "scan");
        self.transcript
            .push(format!("scan: {} elements", self.targets.len()));
        self.targets.clone()
    }
}

/// Activator that fails for a configured set of handles.
struct LogActivator {
    /// Handles that report as gone.
    stale: Vec<ElementHandle>,
    /// Shared record.
    transcript: Transcript,
}

impl Activator for LogActivator {
    fn activate(&self, target: &Target) -> Result<(), ActivateError> {
        self.transcript
            .push(format!("activate: element {}", target.handle.0));
        if self.stale.contains(&target.handle) {
            return Err(ActivateError::Stale(target.handle));
        }
        info!(handle = target.handle.0, category = ?target.category, "activate");
        Ok(())
    }
}

/// Overlay that lists its labels.
struct LogOverlay {
    /// Shared record.
    transcript: Transcript,
}

impl OverlayRenderer for LogOverlay {
    fn open(&self, boxes: &[LabelBox]) {
        for b in boxes {
            debug!(
                label = b.label.as_str(),
                x = b.origin.x,
                y = b.origin.y,
                "label_box"
            );
        }
        let labels: Vec<&str> = boxes.iter().map(|b| b.label.as_str()).collect();
        self.transcript
            .push(format!("overlay: open [{}]", labels.join(" ")));
    }

    fn close(&self) {
        self.transcript.push("overlay: close".to_string());
    }
}

/// Cursor indicator stand-in.
struct LogCursor {
    /// Shared record.
    transcript: Transcript,
}

impl CursorRenderer for LogCursor {
    fn show(&self) {
        self.transcript.push("cursor: show".to_string());
    }

    fn hide(&self) {
        self.transcript.push("cursor: hide".to_string());
    }
}

/// Action sink that only reports.
struct LogActions {
    /// Shared record.
    transcript: Transcript,
}

impl ActionSink for LogActions {
    fn perform(&self, action: &Action) {
        info!(action = %action, "perform");
        self.transcript.push(format!("action: {action}"));
    }
}

/// Build engine services over `targets`, recording into `transcript`.
pub fn services(
    targets: Vec<Target>,
    stale: Vec<ElementHandle>,
    transcript: &Transcript,
) -> Services {
    Services {
        scan: Arc::new(ScriptScan {
            targets,
            transcript: transcript.clone(),
        }),
        activator: Arc::new(LogActivator {
            stale,
            transcript: transcript.clone(),
        }),
        overlay: Arc::new(LogOverlay {
            transcript: transcript.clone(),
        }),
        cursor: Arc::new(LogCursor {
            transcript: transcript.clone(),
        }),
        actions: Arc::new(LogActions {
            transcript: transcript.clone(),
        }),
    }
}
