use std::path::{Path, PathBuf};

/// Errors raised while loading a grating dataset or synthesizing a surface.
#[derive(thiserror::Error, Debug)]
pub enum SrgError {
    #[error(
        "failed to read grating dataset{}",
        .path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default()
    )]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed grating dataset at line {line}: {reason}")]
    MalformedDataset { line: usize, reason: String },
    #[error("stretch step {index} is out of range (dataset has {count} stretch steps)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("invalid sampling parameter `{name}` = {value}: must be finite and positive")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl SrgError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedDataset {
            line,
            reason: reason.into(),
        }
    }

    /// Attach the dataset path to an I/O error that does not carry one yet.
    pub(crate) fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Io { path: None, source } => Self::Io {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

impl From<std::io::Error> for SrgError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

pub type Result<T> = std::result::Result<T, SrgError>;
