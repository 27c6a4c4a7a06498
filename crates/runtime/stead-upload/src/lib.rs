//! Stead Upload
//!
//! The client-side upload orchestration, expressed as an explicit state
//! machine. Per-file lifecycle:
//!
//! ```text
//! Pending(0) -> Uploading(1..=90, 50ms ticks) -> Reading(95)
//!            -> Completed(100, url) | Failed(error, 0)
//! ```
//!
//! The progress ramp is synthetic: a timer-driven percentage generator,
//! deliberately decoupled from transfer bytes (the storage client exposes
//! no real progress channel). Files upload sequentially, one at a time,
//! and every success re-emits the entire accumulated completed list.

pub mod files;
pub mod manager;
pub mod policy;
pub mod progress;

pub use files::{infer_content_type, EntryState, SelectedFile, UploadEntry};
pub use manager::{UploadEvent, UploadManager};
pub use policy::UploadPolicy;
pub use progress::ProgressSimulator;
