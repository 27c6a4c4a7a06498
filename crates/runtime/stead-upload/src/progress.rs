//! Synthetic progress ramp.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::files::{EntryState, UploadEntry};
use crate::manager::UploadEvent;

/// Timer-driven percentage generator for one in-flight entry. The ramp
/// is pure theatre: one percent per tick up to the ceiling, independent
/// of actual transfer bytes. The real outcome overwrites it.
pub struct ProgressSimulator;

impl ProgressSimulator {
    pub const TICK: Duration = Duration::from_millis(50);
    pub const CEILING: u8 = 90;

    /// Spawn the ramp for the entry with the given id. The id stays
    /// valid across removals of other entries; the task stops on its own
    /// once the entry leaves the `Uploading` state or disappears.
    pub fn spawn(
        entries: Arc<Mutex<Vec<UploadEntry>>>,
        id: u64,
        events: mpsc::UnboundedSender<UploadEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Self::TICK);
            interval.tick().await; // first tick is immediate, skip it
            loop {
                interval.tick().await;
                let mut entries = entries.lock().await;
                let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
                    break;
                };
                if entry.state != EntryState::Uploading {
                    break;
                }
                if entry.progress < Self::CEILING {
                    entry.progress += 1;
                    let _ = events.send(UploadEvent::Progress {
                        id,
                        percent: entry.progress,
                    });
                }
            }
        })
    }
}
