//! Input capture: normalise picked and dropped files into a candidate file.
//!
//! Both entry points (a file picker and a drag-and-drop target) hand over a
//! [`FileRef`]. Exactly one rule decides acceptance: the declared media type
//! must be `application/pdf`. A rejected file never becomes a
//! [`CandidateFile`], so no network activity can happen for it.
//!
//! The declared type of a local file is derived from its extension, the same
//! information a browser exposes as `File.type`. Content sniffing is an
//! opt-in extra check.

use crate::error::CaptureError;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Media type every accepted file must declare.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A raw file reference from a pick or a drop, not yet validated.
#[derive(Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub declared_type: String,
    pub bytes: Vec<u8>,
}

impl FileRef {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes,
        }
    }

    /// Read a local file, declaring its type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CaptureError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => CaptureError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => CaptureError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let declared_type = media_type_for(&name);
        debug!("Read {} ({} bytes, {})", name, bytes.len(), declared_type);

        Ok(Self {
            name,
            declared_type: declared_type.to_string(),
            bytes,
        })
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRef")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Media type a browser would declare for a file with this name.
pub fn media_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// A file that passed validation and may be uploaded.
///
/// Only constructible through [`CandidateFile::accept`].
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl CandidateFile {
    /// Validate a raw file reference.
    ///
    /// With `verify_magic` the content must additionally start with `%PDF`.
    pub fn accept(file: FileRef, verify_magic: bool) -> Result<Self, CaptureError> {
        if file.declared_type != PDF_MEDIA_TYPE {
            return Err(CaptureError::NotAPdf {
                name: file.name,
                declared_type: file.declared_type,
            });
        }
        if verify_magic && !file.bytes.starts_with(b"%PDF") {
            let magic = file.bytes.iter().take(4).copied().collect();
            return Err(CaptureError::BadMagic {
                name: file.name,
                magic,
            });
        }
        Ok(Self {
            name: file.name,
            mime_type: file.declared_type,
            bytes: file.bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

// ── Drag and drop ────────────────────────────────────────────────────────

/// A drag interaction over the drop target.
#[derive(Debug, Clone)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    /// Files released over the target; only the first one is considered.
    Drop(Vec<FileRef>),
}

impl DragEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DragEvent::Enter => "dragenter",
            DragEvent::Over => "dragover",
            DragEvent::Leave => "dragleave",
            DragEvent::Drop(_) => "drop",
        }
    }
}

/// Whether a drag is currently hovering over the drop target.
///
/// A rendering hint only; it never affects the candidate file or the
/// submission state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub active: bool,
}

/// What the host must do with the originating event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDisposition {
    /// Suppress the host's default handling (e.g. opening the dropped file).
    pub prevent_default: bool,
    /// Stop the event from reaching enclosing targets.
    pub stop_propagation: bool,
    /// Name of the file a drop forwarded into the selection path.
    pub forwarded: Option<String>,
}

impl DragState {
    /// Apply a drag event. Every drag event is fully consumed.
    ///
    /// A drop hands back its first file by value for the selection path.
    pub fn handle(&mut self, event: DragEvent) -> (EventDisposition, Option<FileRef>) {
        debug!("drag event: {}", event.kind());
        let file = match event {
            DragEvent::Enter | DragEvent::Over => {
                self.active = true;
                None
            }
            DragEvent::Leave => {
                self.active = false;
                None
            }
            DragEvent::Drop(files) => {
                self.active = false;
                files.into_iter().next()
            }
        };
        let disposition = EventDisposition {
            prevent_default: true,
            stop_propagation: true,
            forwarded: file.as_ref().map(|f| f.name.clone()),
        };
        (disposition, file)
    }
}
