use crate::file_picker::interface::FilePicker;
use crate::library::logger::interface::Logger;
use std::path::PathBuf;
use std::sync::Arc;

/// Native file dialog. It is opened from an effect thread, which the GTK and
/// Windows backends allow; macOS needs dialogs on the main thread and is not
/// a supported target.
pub struct FilePickerRfd {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FilePickerRfd {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("file_picker"),
        }
    }
}

impl FilePicker for FilePickerRfd {
    fn pick(&self) -> Vec<PathBuf> {
        let picked = rfd::FileDialog::new()
            .set_title("Select a hand sign image")
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .add_filter("All files", &["*"])
            .pick_file();

        match &picked {
            Some(path) => {
                let _ = self.logger.info(&format!("Picked {}", path.display()));
            }
            None => {
                let _ = self.logger.info("Picker cancelled");
            }
        }

        picked.into_iter().collect()
    }
}
