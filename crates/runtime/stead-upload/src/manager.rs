//! Sequential upload orchestration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use stead_core::FileMetadata;
use stead_storage::Uploader;

use crate::files::{EntryState, SelectedFile, UploadEntry};
use crate::policy::UploadPolicy;
use crate::progress::ProgressSimulator;

/// What the manager tells its subscriber. Events carry the stable entry
/// id, never a list position: removals shift positions while uploads are
/// in flight. Every `Completed` carries the full accumulated list, not a
/// delta; consumers replace, never merge.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Progress { id: u64, percent: u8 },
    Completed { id: u64, files: Vec<FileMetadata> },
    Failed { id: u64, error: String },
    Removed { files: Vec<FileMetadata> },
}

/// Drives selected files through validation, the progress ramp and the
/// storage gateway, strictly one at a time.
pub struct UploadManager {
    uploader: Arc<dyn Uploader>,
    policy: UploadPolicy,
    entries: Arc<Mutex<Vec<UploadEntry>>>,
    events: mpsc::UnboundedSender<UploadEvent>,
    next_id: AtomicU64,
}

impl UploadManager {
    pub fn new(
        uploader: Arc<dyn Uploader>,
        policy: UploadPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<UploadEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let manager = Self {
            uploader,
            policy,
            entries: Arc::new(Mutex::new(Vec::new())),
            events,
            next_id: AtomicU64::new(0),
        };
        (manager, receiver)
    }

    fn mint_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Pre-populate the list with already-uploaded URLs. These are
    /// display records only; they never re-enter the pipeline.
    pub async fn seed_urls(&self, urls: &[String]) {
        let mut entries = self.entries.lock().await;
        for url in urls {
            entries.push(UploadEntry::seeded(self.mint_id(), url));
        }
    }

    /// Validate and upload each file in selection order. A rejected or
    /// failed file stays in the list with its error; processing moves on
    /// to the next file.
    pub async fn add_files(&self, files: Vec<SelectedFile>) {
        for file in files {
            if let Err(error) = self.policy.validate(&file) {
                let id = self.mint_id();
                self.entries
                    .lock()
                    .await
                    .push(UploadEntry::failed(id, &file, error.clone()));
                let _ = self.events.send(UploadEvent::Failed { id, error });
                continue;
            }
            self.upload_one(file).await;
        }
    }

    async fn upload_one(&self, file: SelectedFile) {
        let id = self.mint_id();
        {
            let mut entries = self.entries.lock().await;
            let mut entry = UploadEntry::pending(id, &file);
            entry.state = EntryState::Uploading;
            entries.push(entry);
        }

        // The ramp ticks while the transfer is in flight; the real
        // outcome overwrites whatever it reached.
        let ramp = ProgressSimulator::spawn(self.entries.clone(), id, self.events.clone());
        let outcome = self
            .uploader
            .upload(&file.bytes, &file.name, &file.content_type)
            .await;
        ramp.abort();

        match outcome {
            Ok(url) => {
                self.set_phase(id, EntryState::Reading, 95).await;
                let _ = self.events.send(UploadEvent::Progress { id, percent: 95 });
                let files = {
                    let mut entries = self.entries.lock().await;
                    if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
                        entry.state = EntryState::Completed;
                        entry.progress = 100;
                        entry.url = Some(url);
                    }
                    completed(&entries)
                };
                let _ = self.events.send(UploadEvent::Completed { id, files });
            }
            Err(err) => {
                let error = err.to_string();
                tracing::warn!(name = %file.name, error = %error, "upload failed");
                self.set_phase(id, EntryState::Failed(error.clone()), 0).await;
                let _ = self.events.send(UploadEvent::Failed { id, error });
            }
        }
    }

    /// Drop the entry at a list position and re-announce the surviving
    /// completed files. Out of range is a no-op. Positions identify rows
    /// only here, at the call boundary; in-flight work is keyed by id and
    /// unaffected by the shift.
    pub async fn remove(&self, index: usize) {
        let files = {
            let mut entries = self.entries.lock().await;
            if index >= entries.len() {
                return;
            }
            entries.remove(index);
            completed(&entries)
        };
        let _ = self.events.send(UploadEvent::Removed { files });
    }

    /// Snapshot of the list, in insertion order.
    pub async fn entries(&self) -> Vec<UploadEntry> {
        self.entries.lock().await.clone()
    }

    /// Completed files only, insertion order, duplicates kept.
    pub async fn completed_files(&self) -> Vec<FileMetadata> {
        completed(&self.entries.lock().await)
    }

    async fn set_phase(&self, id: u64, state: EntryState, progress: u8) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.state = state;
            entry.progress = progress;
        }
    }
}

fn completed(entries: &[UploadEntry]) -> Vec<FileMetadata> {
    entries.iter().filter_map(UploadEntry::metadata).collect()
}
