use colored::Colorize;
use std::path::PathBuf;
use std::{fmt, io};

/// Errors that can occur while exporting to a file
#[derive(Debug)]
pub enum ExportError {
    /// The output file could not be created
    Create { path: PathBuf, source: io::Error },
    /// Writing the rendered bytes failed
    Write { path: PathBuf, source: io::Error },
    /// The file could not be flushed to durable storage; callers that need
    /// the original fail-fast behavior can escalate this kind themselves
    Sync { path: PathBuf, source: io::Error },
}

impl ExportError {
    /// True when the written bytes may not have reached durable storage.
    pub fn is_durability_failure(&self) -> bool {
        matches!(self, ExportError::Sync { .. })
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Create { path, source } => {
                writeln!(
                    f,
                    "{}: failed to create file",
                    path.display().to_string().magenta().bold()
                )?;
                write!(f, "\tCause: {}", source)
            }
            ExportError::Write { path, source } => {
                writeln!(
                    f,
                    "{}: failed to write file",
                    path.display().to_string().magenta().bold()
                )?;
                write!(f, "\tCause: {}", source)
            }
            ExportError::Sync { path, source } => {
                writeln!(
                    f,
                    "{}: failed to sync file to durable storage",
                    path.display().to_string().magenta().bold()
                )?;
                write!(f, "\tCause: {}", source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Create { source, .. }
            | ExportError::Write { source, .. }
            | ExportError::Sync { source, .. } => Some(source),
        }
    }
}
