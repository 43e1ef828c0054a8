//! Export errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("Nothing to export: the project has no clips")]
    EmptyProject,

    #[error("Export is already running")]
    AlreadyRunning,

    #[error("Export backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert!(ExportError::EmptyProject.to_string().contains("no clips"));
        assert!(ExportError::AlreadyRunning.to_string().contains("already"));
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: ExportError = io.into();
        assert!(matches!(&err, ExportError::Backend(msg) if msg.contains("read-only")));
    }
}
