//! Input channel types: what the form currently holds and what it hands off.

use std::path::{Path, PathBuf};

/// A file chosen through the file control.
///
/// Only the reference is held here; contents are read when the outbound
/// request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Display name (final path component).
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Self { name, path }
    }

    /// Lowercased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// MIME type sent with the file part. The service branches on it.
    pub fn content_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("txt") => "text/plain",
            Some("pdf") => "application/pdf",
            _ => "application/octet-stream",
        }
    }
}

/// The form's single active input channel.
///
/// Text and file can never both be held, so there is nothing to reconcile
/// at validation time beyond "is anything there".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputState {
    #[default]
    Empty,
    /// Raw text as typed, never the empty string.
    Text(String),
    File(SelectedFile),
}

impl InputState {
    pub fn has_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn has_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }
}

/// The chosen input, normalized for transmission. Built only at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedPayload {
    Text(String),
    File(SelectedFile),
}

impl NormalizedPayload {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::File(_) => "file",
        }
    }
}
