use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum DeliverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Hands a finished file to the user (download, save dialog, directory).
pub trait FileSink {
    fn deliver(&mut self, file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), DeliverError>;
}

/// `<prefix>-<YYYY-MM-DD>.docx`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}.docx", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name("draft", date), "draft-2024-03-07.docx");
    }
}
