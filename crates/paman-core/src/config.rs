use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = ".paman_database";
pub const DATABASE_ENV: &str = "PAMAN_DATABASE";
pub const PLAIN_EXPORT_SUFFIX: &str = "_plain.txt";

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}

impl StoreConfig {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
        }
    }

    /// Explicit path first, then `PAMAN_DATABASE`, then `.paman_database` in
    /// the working directory.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(database) = explicit {
            return Self::new(database);
        }
        match std::env::var_os(DATABASE_ENV) {
            Some(value) if !value.is_empty() => Self::new(value),
            _ => Self::default(),
        }
    }

    pub fn plain_export_path(&self) -> PathBuf {
        plain_export_path(&self.database)
    }
}

/// `<database>_plain.txt`, next to the database.
pub fn plain_export_path(database: &Path) -> PathBuf {
    let mut name = database.as_os_str().to_os_string();
    name.push(PLAIN_EXPORT_SUFFIX);
    PathBuf::from(name)
}
