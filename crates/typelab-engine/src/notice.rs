//! User-visible failure notices

/// A failure message tied to one uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub file_name: String,
    pub message: String,
}

impl Notice {
    /// The notice shown when a font cannot be loaded
    pub fn load_failure(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            message: format!(
                "Failed to load {file_name}. The file might be corrupted or unsupported."
            ),
        }
    }
}

/// Where notices are shown
pub trait NoticeSink {
    fn notify(&mut self, notice: Notice);
}

impl NoticeSink for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Notice sink that writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotices;

impl NoticeSink for LogNotices {
    fn notify(&mut self, notice: Notice) {
        tracing::error!(file = %notice.file_name, "{}", notice.message);
    }
}
