//! Pre-upload validation: size ceilings and accept patterns.

use crate::files::SelectedFile;

const MB: u64 = 1024 * 1024;

/// What the host form allows. Two megabyte ceilings exist because
/// callers configure a per-batch limit and a per-file limit separately;
/// both apply to each file.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size_mb: u64,
    pub max_file_size_mb: u64,
    /// Comma-separated accept patterns: exact types, `prefix/*`
    /// wildcards, or `*/*` for anything.
    pub accept: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_mb: 5,
            max_file_size_mb: 10,
            accept: "*/*".to_string(),
        }
    }
}

impl UploadPolicy {
    /// Checks a file against both ceilings and the accept list. Sizes
    /// exactly at a ceiling pass; one byte over fails.
    pub fn validate(&self, file: &SelectedFile) -> Result<(), String> {
        if file.size() > self.max_file_size_mb * MB {
            return Err(format!("File size exceeds {}MB", self.max_file_size_mb));
        }
        if file.size() > self.max_size_mb * MB {
            return Err(format!("File size exceeds {}MB", self.max_size_mb));
        }
        if !self.accepts(&file.content_type) {
            return Err("File type not accepted".to_string());
        }
        Ok(())
    }

    fn accepts(&self, content_type: &str) -> bool {
        self.accept.split(',').map(str::trim).any(|pattern| {
            if pattern == "*/*" || pattern == "*" {
                true
            } else if let Some(prefix) = pattern.strip_suffix("/*") {
                content_type
                    .split('/')
                    .next()
                    .is_some_and(|main| main == prefix)
            } else {
                pattern == content_type
            }
        })
    }
}
