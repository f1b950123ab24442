use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Size the upload hint advertises. Not enforced.
pub const ADVISORY_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// A file the applicant picked. Only a reference; content is read at send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFile {
    pub name: String,
    pub size_bytes: u64,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let content_type = content_type_for(Path::new(&name)).to_string();
        Self {
            name,
            size_bytes,
            content_type,
            path: None,
        }
    }

    /// Stage a local file, reading only its metadata.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("invalid file name: {}", path.display()))?;
        let meta = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("failed to stat {}", path.display()))?;
        let mut file = StagedFile::new(name, meta.len());
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Images and PDFs only, matching the picker's `image/*,.pdf` filter.
    pub fn is_accepted(&self) -> bool {
        self.content_type.starts_with("image/") || self.content_type == "application/pdf"
    }

    pub fn exceeds_advisory_limit(&self) -> bool {
        self.size_bytes > ADVISORY_MAX_BYTES
    }

    /// Size as shown next to the file name, e.g. `2.50MB`.
    pub fn display_size(&self) -> String {
        format!("{:.2}MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_ascii_lowercase())
    {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
