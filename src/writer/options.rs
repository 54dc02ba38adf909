//! Write options.

/// Options for saving documents.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Take a `<stem>_before_<operation>` copy of an existing destination
    pub backup: Option<String>,
}

impl WriteOptions {
    /// Create new write options with defaults (no backup).
    pub fn new() -> Self {
        Self::default()
    }

    /// Back up the destination before overwriting, labelled with `operation`.
    pub fn with_backup(mut self, operation: impl Into<String>) -> Self {
        self.backup = Some(operation.into());
        self
    }

    /// Disable backups.
    pub fn without_backup(mut self) -> Self {
        self.backup = None;
        self
    }
}
