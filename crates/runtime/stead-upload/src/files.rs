//! Upload entries and the files they track.

use stead_core::FileMetadata;

/// A file the caller has picked for upload: the bytes plus the metadata
/// the picker reported alongside them.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    /// Milliseconds since epoch, as reported by the picker.
    pub last_modified: i64,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        last_modified: i64,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            last_modified,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Lifecycle of a single entry. Transitions only move forward; a failed
/// entry stays failed until removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    Uploading,
    Reading,
    Completed,
    Failed(String),
}

/// One row in the upload list. Seeded entries come from pre-existing
/// URLs and are pure display records: no bytes, no transfer, just the
/// metadata recoverable from the URL itself.
///
/// `id` is the stable handle minted by the manager; list positions shift
/// on removal and must never be held across an await.
#[derive(Debug, Clone)]
pub struct UploadEntry {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub last_modified: i64,
    pub progress: u8,
    pub state: EntryState,
    pub url: Option<String>,
    pub seeded: bool,
}

impl UploadEntry {
    pub fn pending(id: u64, file: &SelectedFile) -> Self {
        Self {
            id,
            name: file.name.clone(),
            size: file.size(),
            content_type: file.content_type.clone(),
            last_modified: file.last_modified,
            progress: 0,
            state: EntryState::Pending,
            url: None,
            seeded: false,
        }
    }

    pub fn failed(id: u64, file: &SelectedFile, error: impl Into<String>) -> Self {
        Self {
            state: EntryState::Failed(error.into()),
            ..Self::pending(id, file)
        }
    }

    /// Display-only entry for a URL that was uploaded in some earlier
    /// session. Size and timestamp are unknowable from the URL alone.
    pub fn seeded(id: u64, url: &str) -> Self {
        let name = url.rsplit('/').next().unwrap_or(url).to_string();
        Self {
            id,
            content_type: infer_content_type(&name),
            name,
            size: 0,
            last_modified: 0,
            progress: 100,
            state: EntryState::Completed,
            url: Some(url.to_string()),
            seeded: true,
        }
    }

    /// Metadata record for a completed entry; `None` while in flight.
    pub fn metadata(&self) -> Option<FileMetadata> {
        let url = self.url.clone()?;
        Some(FileMetadata {
            url,
            name: self.name.clone(),
            size: self.size,
            content_type: self.content_type.clone(),
            last_modified: self.last_modified,
        })
    }
}

/// Content type from a filename extension, for entries recovered from
/// bare URLs.
pub fn infer_content_type(name: &str) -> String {
    let ext = name
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_entry_is_complete_display_record() {
        let entry = UploadEntry::seeded(0, "https://cdn.stead.io/uploads/ab12cd34-photo.png");
        assert_eq!(entry.name, "ab12cd34-photo.png");
        assert_eq!(entry.content_type, "image/png");
        assert_eq!(entry.progress, 100);
        assert_eq!(entry.state, EntryState::Completed);
        assert!(entry.seeded);
    }

    #[test]
    fn test_infer_content_type_covers_known_extensions() {
        assert_eq!(infer_content_type("a.MP3"), "audio/mpeg");
        assert_eq!(infer_content_type("clip.wav"), "audio/wav");
        assert_eq!(infer_content_type("doc.pdf"), "application/pdf");
        assert_eq!(infer_content_type("pic.jpeg"), "image/jpeg");
        assert_eq!(infer_content_type("blob"), "application/octet-stream");
    }

    #[test]
    fn test_metadata_only_for_completed() {
        let file = SelectedFile::new("a.png", "image/png", 7, vec![1, 2, 3]);
        let entry = UploadEntry::pending(0, &file);
        assert!(entry.metadata().is_none());

        let mut done = entry;
        done.url = Some("https://cdn/x".into());
        let meta = done.metadata().unwrap();
        assert_eq!(meta.size, 3);
        assert_eq!(meta.last_modified, 7);
    }
}
