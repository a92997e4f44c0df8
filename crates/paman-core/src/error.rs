use std::path::{Path, PathBuf};

pub type PamanResult<T> = Result<T, PamanError>;

#[derive(Debug, thiserror::Error)]
pub enum PamanError {
    #[error("cannot {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed credential: {0}")]
    MalformedRecord(String),
    #[error("credential must be unique: {domain} {username} is already stored")]
    DuplicateCredential {
        domain: String,
        username: String,
        /// Stored lines that made the credential collide.
        matches: Vec<String>,
    },
    #[error("cannot lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PamanError {
    pub(crate) fn io(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| PamanError::Io {
            action,
            path,
            source,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        PamanError::MalformedRecord(reason.into())
    }
}
