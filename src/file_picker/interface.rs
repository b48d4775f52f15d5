use std::path::PathBuf;

/// Source of user-selected image files.
pub trait FilePicker: Send + Sync {
    /// Blocks until the user picks or cancels. Cancel yields an empty list.
    fn pick(&self) -> Vec<PathBuf>;
}
